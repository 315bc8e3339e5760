use backtrace::Backtrace;
use mongodb::error::{ErrorKind as DriverErrorKind, WriteFailure};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::{Arc, Mutex};

/// Server error code reported for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Error kinds for repository operations.
///
/// Every failure surfaced by a [`Repository`](crate::repository::Repository) or a
/// [`Connector`](crate::connector::Connector) falls into exactly one of these
/// categories, so callers can branch on "document absent" without string matching.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::ErrorKind;
///
/// match users.find_one(&ctx, doc! { "email": "alice@test.com" }, None).await {
///     Ok(user) => println!("{:?}", user),
///     Err(e) if e.kind() == &ErrorKind::NotFound => println!("no such user"),
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A database handle could not be obtained
    Connection,
    /// The server rejected a write (constraint violation, validation failure)
    Write,
    /// `find_one` matched no document
    NotFound,
    /// A stored document could not populate the requested read model
    Decode,
    /// A write model could not be encoded into a document
    Encode,
    /// Network or server-selection failure during an operation
    Transport,
    /// The operation context was cancelled before the call completed
    Canceled,
    /// The operation context deadline passed before the call completed
    Timeout,
    /// The server rejected a command (bad operator, bad option combination)
    Command,
    /// Missing or invalid connector configuration
    Configuration,
    /// Anything the driver reports that fits no other category
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Connection => write!(f, "Connection error"),
            ErrorKind::Write => write!(f, "Write error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::Decode => write!(f, "Decode error"),
            ErrorKind::Encode => write!(f, "Encode error"),
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Canceled => write!(f, "Canceled"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Command => write!(f, "Command error"),
            ErrorKind::Configuration => write!(f, "Configuration error"),
            ErrorKind::Internal => write!(f, "Internal error"),
        }
    }
}

/// Error type for all repository and connector operations.
///
/// `RepoError` carries a message, an [`ErrorKind`], the operation and collection it
/// happened on (when known), and the underlying driver or codec error as its cause.
/// A backtrace is captured on creation and resolved lazily when the error is
/// debug-printed.
#[derive(Clone)]
pub struct RepoError {
    message: String,
    error_kind: ErrorKind,
    operation: Option<&'static str>,
    collection: Option<String>,
    cause: Option<Arc<dyn Error + Send + Sync>>,
    backtrace: Arc<Mutex<Backtrace>>,
}

impl RepoError {
    /// Creates a new `RepoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            operation: None,
            collection: None,
            cause: None,
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `RepoError` that wraps the error which caused it.
    ///
    /// The cause is reachable through [`Error::source`].
    pub fn new_with_cause<E>(message: &str, error_kind: ErrorKind, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        RepoError {
            cause: Some(Arc::new(cause)),
            ..RepoError::new(message, error_kind)
        }
    }

    /// Attaches the operation name and collection the error occurred on.
    pub fn with_context(mut self, operation: &'static str, collection: &str) -> Self {
        self.operation = Some(operation);
        self.collection = Some(collection.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.error_kind == ErrorKind::NotFound
    }

    /// Returns `true` when the server rejected a write because of a unique index,
    /// including the `_id` index.
    pub fn is_duplicate_key(&self) -> bool {
        self.cause
            .as_deref()
            .and_then(|cause| cause.downcast_ref::<mongodb::error::Error>())
            .map(|err| match err.kind.as_ref() {
                DriverErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
                DriverErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
                _ => false,
            })
            .unwrap_or(false)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.operation, &self.collection) {
            (Some(operation), Some(collection)) => {
                write!(f, "{} on {}: {}", operation, collection, self.message)
            }
            _ => write!(f, "{}", self.message),
        }
    }
}

impl Debug for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_kind, self)?;
        match &self.cause {
            Some(cause) => write!(f, "\nCaused by: {:?}", cause),
            None => match self.backtrace.lock() {
                Ok(mut backtrace) => {
                    backtrace.resolve();
                    write!(f, "\n{:?}", backtrace)
                }
                Err(_) => Ok(()),
            },
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Maps a driver error onto the repository's error taxonomy.
pub(crate) fn classify(err: &mongodb::error::Error) -> ErrorKind {
    match err.kind.as_ref() {
        DriverErrorKind::Write { .. } => ErrorKind::Write,
        DriverErrorKind::BsonDeserialization { .. } => ErrorKind::Decode,
        DriverErrorKind::BsonSerialization { .. } => ErrorKind::Encode,
        DriverErrorKind::Io { .. }
        | DriverErrorKind::ServerSelection { .. }
        | DriverErrorKind::ConnectionPoolCleared { .. } => ErrorKind::Transport,
        DriverErrorKind::DnsResolve { .. }
        | DriverErrorKind::InvalidTlsConfig { .. }
        | DriverErrorKind::Authentication { .. } => ErrorKind::Connection,
        DriverErrorKind::Command { .. } => ErrorKind::Command,
        _ => ErrorKind::Internal,
    }
}

impl From<mongodb::error::Error> for RepoError {
    fn from(err: mongodb::error::Error) -> Self {
        let kind = classify(&err);
        RepoError::new_with_cause(&err.to_string(), kind, err)
    }
}

impl From<bson::de::Error> for RepoError {
    fn from(err: bson::de::Error) -> Self {
        RepoError::new_with_cause(
            &format!("failed to decode document: {}", err),
            ErrorKind::Decode,
            err,
        )
    }
}

impl From<bson::ser::Error> for RepoError {
    fn from(err: bson::ser::Error) -> Self {
        RepoError::new_with_cause(
            &format!("failed to encode document: {}", err),
            ErrorKind::Encode,
            err,
        )
    }
}
