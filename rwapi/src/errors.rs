/// Error types for building, sending and decoding API queries
#[derive(Debug)]
pub enum RwApiError {
    /// The query payload could not be turned into JSON.
    Serialization(serde_json::Error),
    /// A facet carries an inconsistent set of options.
    InvalidFacet { field: String, reason: String },
    /// A filter condition was built without a field name.
    EmptyFilterField,
    /// The request never produced a response (connection, timeout, redirect, body read).
    Transport { url: String, source: reqwest::Error },
    /// The API answered with a non-success status code.
    UnexpectedStatus {
        url: String,
        payload: String,
        status: u16,
        body: String,
    },
    /// The response body does not match the response envelope.
    EnvelopeDecode {
        body: String,
        source: serde_json::Error,
    },
    /// One item's fields could not be decoded into the requested type.
    ItemDecode {
        index: usize,
        id: String,
        source: serde_json::Error,
    },
    /// The client configuration could not be read or parsed.
    Config(String),
}

impl From<serde_json::Error> for RwApiError {
    fn from(err: serde_json::Error) -> Self {
        RwApiError::Serialization(err)
    }
}

impl std::fmt::Display for RwApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RwApiError::Serialization(err) => {
                write!(f, "Unable to serialize query payload: {}", err)
            }
            RwApiError::InvalidFacet { field, reason } => {
                write!(f, "Invalid facet on field '{}': {}", field, reason)
            }
            RwApiError::EmptyFilterField => {
                write!(f, "Filter condition requires a non-empty field name")
            }
            RwApiError::Transport { url, source } => {
                write!(f, "Unable to query API with request {}: {}", url, source)
            }
            RwApiError::UnexpectedStatus {
                url,
                payload,
                status,
                body,
            } => write!(
                f,
                "Unexpected API response (HTTP {}) for request {} with payload {}: {}",
                status, url, payload, body
            ),
            RwApiError::EnvelopeDecode { body, source } => {
                write!(f, "Unable to decode API response {}: {}", body, source)
            }
            RwApiError::ItemDecode { index, id, source } => write!(
                f,
                "Unable to decode fields of item {} (id {}): {}",
                index, id, source
            ),
            RwApiError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for RwApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RwApiError::Serialization(err) => Some(err),
            RwApiError::Transport { source, .. } => Some(source),
            RwApiError::EnvelopeDecode { source, .. } => Some(source),
            RwApiError::ItemDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}
