pub mod evaluate;
pub mod health;
pub mod pay;
pub mod payment_tools;
pub mod proposals;
pub mod tasks;
pub mod tenders;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tenders                 GET list (?id= fetches one as a list), POST create
/// /tenders/generate        POST draft a tender from free text
/// /tenders/events          POST receive an externally broadcast tender
/// /webhooks                GET list, POST register
/// /proposals               GET list (?tenderId=), POST submit
/// /evaluate                POST select the best proposal for a tender
/// /pay                     POST run the payment-required retry loop
/// /payment-tools           GET list the payment provider's tools
/// /tasks                   GET recent background task statuses
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tenders", tenders::router())
        .nest("/webhooks", webhooks::router())
        .nest("/proposals", proposals::router())
        .nest("/evaluate", evaluate::router())
        .nest("/pay", pay::router())
        .nest("/payment-tools", payment_tools::router())
        .nest("/tasks", tasks::router())
}
