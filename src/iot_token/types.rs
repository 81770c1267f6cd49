use std::fmt;
use std::path::PathBuf;

/// Cloud IoT token error type
///
/// Represents everything that can go wrong while minting a device JWT or
/// exchanging it for an access token.
#[derive(Debug)]
pub enum IotTokenError {
    /// The device JWT could not be signed (unknown algorithm, bad key, etc.)
    Signing(String),
    /// The private key file could not be read
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid or incomplete configuration
    Config(String),
    /// Token exchange request failed
    Api(ApiError),
}

impl fmt::Display for IotTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IotTokenError::Signing(msg) => write!(f, "JWT signing failed: {}", msg),
            IotTokenError::KeyFile { path, source } => {
                write!(f, "Failed to read key file {}: {}", path.display(), source)
            }
            IotTokenError::Config(msg) => write!(f, "Configuration error: {}", msg),
            IotTokenError::Api(err) => write!(f, "API error: {}", err),
        }
    }
}

impl std::error::Error for IotTokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IotTokenError::KeyFile { source, .. } => Some(source),
            IotTokenError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for IotTokenError {
    fn from(err: ApiError) -> Self {
        IotTokenError::Api(err)
    }
}

impl From<jsonwebtoken::errors::Error> for IotTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        IotTokenError::Signing(err.to_string())
    }
}

/// Token exchange errors
#[derive(Debug)]
pub enum ApiError {
    /// Network error (connection, timeout, etc.)
    Network(String),
    /// Non-2xx response from the token service
    Http { status: u16, message: String },
    /// Request could not be built or the body could not be read
    Request(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            ApiError::Network(format!("Connection failed: {}", err))
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Access token returned by the token service
///
/// Holds the response body exactly as received. The library never looks
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangedToken(String);

impl ExchangedToken {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Raw response body
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Parse the body as JSON, for callers that want to pick fields out of it
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for ExchangedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
