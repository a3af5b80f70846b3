#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DermaScanError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "No prediction endpoint configured.\n\nTo set:\n  export {env_var}=https://your-backend.example\n\nor pass --endpoint."
    )]
    EndpointNotConfigured { env_var: String },

    #[error("Image rejected: {0}")]
    ImageRejected(String),

    #[error("{entity} '{id}' not found.\n\n{suggestion}")]
    NotFound {
        entity: String,
        id: String,
        suggestion: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Time formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
