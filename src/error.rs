use std::fmt;

/// All failures surfaced by this crate.
///
/// Nothing is retried or swallowed internally: a failing call returns the
/// first error it hits and leaves the entity's prior state untouched.
#[derive(Debug)]
pub enum Error {
    /// No HTTP session was passed to the call or stored at construction.
    Config(String),
    /// The server accepted the request but rejected the credentials;
    /// carries the server-supplied message.
    Auth(String),
    /// A mutation argument was outside its documented range. Raised before
    /// any request is issued.
    Validation(String),
    /// The cached snapshot lacks an expected field, or carries a value the
    /// fixed lookup tables do not recognize.
    Snapshot(String),
    /// Transport failure or a non-2xx response status, unchanged.
    Http(reqwest::Error),
    /// A response body did not parse as the expected shape.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Auth(msg) => write!(f, "Authentication error: {}", msg),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
