use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL operation {operation} returned no data: {}", .messages.join("; "))]
    GraphQl {
        operation: String,
        messages: Vec<String>,
    },

    #[error("{operation} rejected: {message}")]
    UserErrors { operation: String, message: String },

    #[error("{operation}: customer access token is invalid or expired")]
    InvalidCustomerToken { operation: String },

    #[error("pagination limit reached for {operation}: exceeded {max_pages} pages")]
    PaginationLimit { operation: String, max_pages: usize },

    #[error("invalid Storefront API endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
