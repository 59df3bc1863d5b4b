use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("reading has status \"ok\" but `{0}` is missing or invalid")]
    MissingField(&'static str),
}

/// Failures talking to the weather backend.
///
/// Application-level errors (`status != "ok"`) are not in here: they decode
/// fine and are rendered as a degraded display.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to send request to {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {endpoint} response (HTTP {status}): {body}")]
    Decode {
        endpoint: String,
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid weather reading")]
    Model(#[from] ModelError),

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),
}
