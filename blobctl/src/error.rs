use std::fmt;
use thiserror::Error;

/// The error type for blob operations.
///
/// Every failure surfaced by [`BlobClient`](crate::BlobClient) falls into
/// one of three kinds, see [`ErrorKind`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing, malformed or refused by its source.
    Auth,
    /// Local filesystem failure.
    Io,
    /// Transport failure or a non-success response from the service.
    Request,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    /// Create an io error
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Create a request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Request, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Auth => write!(f, "auth error"),
            ErrorKind::Io => write!(f, "io error"),
            ErrorKind::Request => write!(f, "request error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<blobctl_core::Error> for Error {
    fn from(err: blobctl_core::Error) -> Self {
        let kind = if err.is_credential_error() {
            ErrorKind::Auth
        } else {
            ErrorKind::Request
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request(err.to_string()).with_source(err)
    }
}
