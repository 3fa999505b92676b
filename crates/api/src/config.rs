use tendermill_core::capability::{
    CapabilityConfig, CapabilityEndpoint, CapabilityKind, InvocationStyle,
};
use tendermill_core::error::CoreError;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the structured-generation oracle.
    pub oracle_url: String,
    /// Bearer token for the oracle, if it requires one.
    pub oracle_api_key: Option<String>,
    /// Base URL of the payment-tool provider.
    pub payment_provider_url: String,
    /// Bearer token for the payment provider, if it requires one.
    pub payment_provider_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `HOST`                     | `0.0.0.0`                      |
    /// | `PORT`                     | `3000`                         |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`        |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                           |
    /// | `ORACLE_URL`               | `http://localhost:8811`        |
    /// | `ORACLE_API_KEY`           | unset                          |
    /// | `PAYMENT_PROVIDER_URL`     | `https://mcp.paywithlocus.com` |
    /// | `PAYMENT_PROVIDER_API_KEY` | unset                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let oracle_url =
            std::env::var("ORACLE_URL").unwrap_or_else(|_| "http://localhost:8811".into());
        let oracle_api_key = std::env::var("ORACLE_API_KEY").ok();

        let payment_provider_url = std::env::var("PAYMENT_PROVIDER_URL")
            .unwrap_or_else(|_| "https://mcp.paywithlocus.com".into());
        let payment_provider_api_key = std::env::var("PAYMENT_PROVIDER_API_KEY").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            oracle_url,
            oracle_api_key,
            payment_provider_url,
            payment_provider_api_key,
        }
    }
}

/// Build the capability-kind → endpoint mapping from the environment
/// and validate it, so misconfiguration fails at startup rather than
/// mid-synthesis.
///
/// | Env Var                 | Default                                   |
/// |-------------------------|-------------------------------------------|
/// | `SEARCH_CAPABILITY_URL` | `https://api.firecrawl.dev/v1/x402/search`|
/// | `SEARCH_PRICE_PER_CALL` | `0.01`                                    |
/// | `NEWS_CAPABILITY_URL`   | `https://api.itsgloria.ai/news`           |
/// | `NEWS_PARAMETER_NAME`   | `feed_categories`                         |
/// | `NEWS_PRICE_PER_CALL`   | `0.01`                                    |
pub fn capability_config_from_env() -> Result<CapabilityConfig, CoreError> {
    let search_url = std::env::var("SEARCH_CAPABILITY_URL")
        .unwrap_or_else(|_| "https://api.firecrawl.dev/v1/x402/search".into());
    let search_price = price_from_env("SEARCH_PRICE_PER_CALL");

    let news_url = std::env::var("NEWS_CAPABILITY_URL")
        .unwrap_or_else(|_| "https://api.itsgloria.ai/news".into());
    let news_parameter =
        std::env::var("NEWS_PARAMETER_NAME").unwrap_or_else(|_| "feed_categories".into());
    let news_price = price_from_env("NEWS_PRICE_PER_CALL");

    let config = CapabilityConfig::new(vec![
        CapabilityEndpoint {
            kind: CapabilityKind::Search,
            endpoint: search_url,
            method: "POST".into(),
            invocation: InvocationStyle::Query,
            price_per_call: search_price,
        },
        CapabilityEndpoint {
            kind: CapabilityKind::News,
            endpoint: news_url,
            method: "GET".into(),
            invocation: InvocationStyle::Parameter {
                name: news_parameter,
            },
            price_per_call: news_price,
        },
    ]);
    config.validate()?;
    Ok(config)
}

fn price_from_env(var: &str) -> f64 {
    std::env::var(var)
        .unwrap_or_else(|_| "0.01".into())
        .parse()
        .unwrap_or_else(|_| panic!("{var} must be a valid price"))
}
