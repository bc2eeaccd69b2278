use std::fmt;

/// Non-2xx answer from the backend. Carries the raw response text verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub path: String,
    pub status_code: u16,
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.path, self.body)
    }
}

impl std::error::Error for ApiError {}

/// Error type for every backend call.
#[derive(Debug)]
pub enum TransportError {
    Status(ApiError),
    Network { path: String, message: String },
    Decode { path: String, message: String },
    InvalidUrl(String),
    InvalidHeader(String),
}

impl TransportError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            TransportError::Status(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Status(err) => write!(f, "{} (status {})", err, err.status_code),
            TransportError::Network { path, message } => {
                write!(f, "{path} request failed: {message}")
            }
            TransportError::Decode { path, message } => {
                write!(f, "{path} returned invalid json: {message}")
            }
            TransportError::InvalidUrl(message) => write!(f, "invalid url: {message}"),
            TransportError::InvalidHeader(message) => write!(f, "invalid header: {message}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Status(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        TransportError::Status(err)
    }
}
