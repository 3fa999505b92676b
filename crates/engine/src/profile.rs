//! Capability profiles: the prompt-facing description of one
//! capability provider.
//!
//! A profile is built from the injected [`CapabilityConfig`], so the
//! endpoint, parameter name, and pricing that reach the oracle always
//! match what the payment loop will actually invoke.

use tendermill_core::capability::{
    CapabilityConfig, CapabilityEndpoint, CapabilityKind, InvocationStyle,
};
use tendermill_core::error::CoreError;

/// Prompt material for one capability provider.
#[derive(Debug, Clone)]
pub struct CapabilityProfile {
    endpoint: CapabilityEndpoint,
    description: String,
}

impl CapabilityProfile {
    /// Build the profile for `kind` from the validated config.
    pub fn from_config(config: &CapabilityConfig, kind: CapabilityKind) -> Result<Self, CoreError> {
        let endpoint = config
            .get(kind)
            .ok_or_else(|| {
                CoreError::Validation(format!("capability '{kind}' is not configured"))
            })?
            .clone();
        let description = describe(&endpoint);
        Ok(Self {
            endpoint,
            description,
        })
    }

    pub fn kind(&self) -> CapabilityKind {
        self.endpoint.kind
    }

    pub fn endpoint(&self) -> &CapabilityEndpoint {
        &self.endpoint
    }

    /// The capabilities text submitted to the oracle in both the
    /// relevance gate and the plan-synthesis prompts.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Recap and keyword lookups cost ten times the feed rate at the news
/// provider.
const PREMIUM_SURFACE_FACTOR: f64 = 10.0;

/// The news provider exposes its recap and keyword surfaces next to
/// the configured feed endpoint, on the same base path.
fn sibling_endpoint(endpoint: &str, segment: &str) -> String {
    match endpoint.rfind('/') {
        Some(idx) => format!("{}/{segment}", &endpoint[..idx]),
        None => format!("{endpoint}/{segment}"),
    }
}

/// Render the capabilities description for a configured endpoint.
fn describe(entry: &CapabilityEndpoint) -> String {
    match (&entry.kind, &entry.invocation) {
        (CapabilityKind::Search, _) => format!(
            "The search capability is a web scraping and search API.\n\
             \n\
             On-Demand Search: search the web using SERP-style queries.\n\
             \n\
             API Details:\n\
             - Endpoint: {endpoint}\n\
             - Method: {method}\n\
             - Required Parameter: \"query\" (string) - the search query\n\
             - Returns: search results with titles, descriptions, and URLs\n\
             \n\
             Pricing: ${price} per search request\n\
             \n\
             Example Use Cases:\n\
             - Finding and extracting content from specific websites\n\
             - Researching information across multiple sources\n\
             - Gathering structured data from web pages",
            endpoint = entry.endpoint,
            method = entry.method,
            price = entry.price_per_call,
        ),
        (CapabilityKind::News, InvocationStyle::Parameter { name }) => format!(
            "The news capability is a news and recap API with the following surfaces:\n\
             \n\
             1. News Feed: get news articles from specific feed categories\n\
             \x20  - Endpoint: {endpoint}\n\
             \x20  - Method: {method}\n\
             \x20  - Required Parameter: \"{param}\" (string) - comma separated list of feed categories\n\
             \x20  - Pricing: ${price} per request\n\
             \n\
             2. Recaps: get generated recaps for a specific feed category\n\
             \x20  - Endpoint: {recaps}\n\
             \x20  - Method: GET\n\
             \x20  - Required Parameter: \"feed_category\" (string) - the feed category to recap\n\
             \x20  - Pricing: ${premium:.2} per request\n\
             \n\
             3. News By Keyword: search for news by keyword\n\
             \x20  - Endpoint: {keyword}\n\
             \x20  - Method: GET\n\
             \x20  - Required Parameter: \"keyword\" (string) - the keyword to search for\n\
             \x20  - Pricing: ${premium:.2} per request\n\
             \n\
             Example Use Cases:\n\
             - Finding news articles from specific categories\n\
             - Getting generated summaries of news topics\n\
             - Searching for news by specific keywords",
            endpoint = entry.endpoint,
            method = entry.method,
            param = name,
            price = entry.price_per_call,
            recaps = sibling_endpoint(&entry.endpoint, "recaps"),
            keyword = sibling_endpoint(&entry.endpoint, "news-by-keyword"),
            premium = entry.price_per_call * PREMIUM_SURFACE_FACTOR,
        ),
        // A news capability configured with query-style invocation is
        // unusual but expressible; describe it generically.
        (CapabilityKind::News, InvocationStyle::Query) => format!(
            "The news capability is a news API.\n\
             - Endpoint: {endpoint}\n\
             - Method: {method}\n\
             - Required Parameter: \"query\" (string)\n\
             Pricing: ${price} per request",
            endpoint = entry.endpoint,
            method = entry.method,
            price = entry.price_per_call,
        ),
    }
}
