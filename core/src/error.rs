use std::fmt;
use thiserror::Error;

/// The error type for apisign operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
///
/// None of these are transient: every kind points at a mistake in how the
/// signer was called or configured, so retrying the same call is pointless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument is absent or empty
    MissingArgument,

    /// An argument was supplied that is forbidden in the requested mode
    UnsupportedArgumentCombination,

    /// The requested operation is not valid for this request
    InvalidOperation,

    /// A value cannot be encoded into the canonical form
    Encoding,

    /// An argument is present but malformed or out of range
    InvalidArgument,

    /// Unexpected errors (formatting, http conversions, etc.)
    Unexpected,
}

impl ErrorKind {
    /// Stable symbolic code of this kind, suitable for matching across versions.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingArgument => "missing_argument",
            ErrorKind::UnsupportedArgumentCombination => "unsupported_argument_combination",
            ErrorKind::InvalidOperation => "invalid_operation",
            ErrorKind::Encoding => "encoding_error",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Unexpected => "unexpected",
        }
    }
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

    /// Get the stable code of the error kind
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the error message without the kind prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

// Convenience constructors
impl Error {
    /// Create a missing argument error
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingArgument, message)
    }

    /// Create an unsupported argument combination error
    pub fn unsupported_argument_combination(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedArgumentCombination, message)
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, message)
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encoding, message)
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingArgument => write!(f, "missing argument"),
            ErrorKind::UnsupportedArgumentCombination => {
                write!(f, "unsupported argument combination")
            }
            ErrorKind::InvalidOperation => write!(f, "invalid operation"),
            ErrorKind::Encoding => write!(f, "encoding error"),
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::encoding(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::encoding(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
