use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for populate and repository operations.
///
/// The first four kinds are the ones a populate call can fail with. The rest are raised by the
/// document model, the repository and the bundled in-memory backend.
///
/// # Examples
///
/// ```rust,ignore
/// use populate::errors::{ErrorKind, PopulateError, PopulateResult};
///
/// fn example() -> PopulateResult<()> {
///     Err(PopulateError::new("segment 'order' is null", ErrorKind::BrokenPath))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The destination type cannot be built from the mapped source
    ConfigurationError,
    /// An intermediate path segment is absent, null or not a document
    BrokenPath,
    /// The last path segment does not name a field of its parent
    UnknownField,
    /// The database query behind a lookup could not be executed
    LookupFailure,

    /// A populate plan failed validation
    InvalidPlan,
    /// A value could not be converted to or from a Rust type
    ObjectMappingError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The provided id is invalid
    InvalidId,
    /// The requested resource was not found
    NotFound,
    /// A document with the same id already exists
    UniqueConstraintViolation,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::BrokenPath => write!(f, "Broken path"),
            ErrorKind::UnknownField => write!(f, "Unknown field"),
            ErrorKind::LookupFailure => write!(f, "Lookup failure"),
            ErrorKind::InvalidPlan => write!(f, "Invalid plan"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::UniqueConstraintViolation => write!(f, "Unique constraint violation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type shared by every fallible operation of the crate.
///
/// `PopulateError` carries a message, an [ErrorKind], an optional cause and the backtrace
/// captured where it was created.
///
/// # Examples
///
/// ```rust,ignore
/// use populate::errors::{ErrorKind, PopulateError};
///
/// let cause = PopulateError::new("connection reset", ErrorKind::LookupFailure);
/// let err = PopulateError::new_with_cause("lookup on 'authors' failed", ErrorKind::LookupFailure, cause);
/// ```
#[derive(Clone)]
pub struct PopulateError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PopulateError>>,
    backtrace: Atomic<Backtrace>,
}

impl PopulateError {
    /// Creates a new `PopulateError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PopulateError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `PopulateError` wrapping a cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PopulateError) -> Self {
        PopulateError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&PopulateError> {
        self.cause.as_deref()
    }
}

impl Display for PopulateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PopulateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for PopulateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for populate operations.
pub type PopulateResult<T> = Result<T, PopulateError>;

impl From<std::fmt::Error> for PopulateError {
    fn from(err: std::fmt::Error) -> Self {
        PopulateError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for PopulateError {
    fn from(msg: String) -> Self {
        PopulateError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for PopulateError {
    fn from(msg: &str) -> Self {
        PopulateError::new(msg, ErrorKind::InternalError)
    }
}
