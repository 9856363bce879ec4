use thiserror::Error;

/// Errors raised while parsing or resolving a query.
///
/// Display strings for the access errors are stable: callers match on the
/// wording to render user-facing messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Unbalanced quote, bracket or paren in an argument list or chain
    #[error("Malformed argument: {0}")]
    MalformedArgument(String),

    /// Empty or non-identifier chain segment (`a..b`)
    #[error("Invalid segment \"{0}\"")]
    InvalidSegment(String),

    /// Member access on a scalar or null
    #[error("Access to method \"{name}\" on {target}")]
    InvalidTarget { name: String, target: &'static str },

    #[error("Access to non-existing property \"{name}\" on {target}")]
    UnknownProperty { name: String, target: &'static str },

    #[error("Access to non-existing method \"{name}\" on {target}")]
    UnknownMethod { name: String, target: &'static str },

    #[error("Access to non-existing method/property \"{name}\" on {target}")]
    UnknownMember { name: String, target: &'static str },

    /// A mapping entry was called with arguments but holds plain data
    #[error("Access to non-callable entry \"{name}\" on {target}")]
    NotCallable { name: String, target: &'static str },

    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// Failure reported by a host callable or entity
    #[error("Call to \"{name}\" failed: {message}")]
    Callback { name: String, message: String },
}

/// Coarse classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedArgument,
    InvalidSegment,
    InvalidTarget,
    UnknownProperty,
    UnknownMethod,
    UnknownMember,
    NotCallable,
    DepthExceeded,
    Callback,
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::MalformedArgument(_) => ErrorKind::MalformedArgument,
            QueryError::InvalidSegment(_) => ErrorKind::InvalidSegment,
            QueryError::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            QueryError::UnknownProperty { .. } => ErrorKind::UnknownProperty,
            QueryError::UnknownMethod { .. } => ErrorKind::UnknownMethod,
            QueryError::UnknownMember { .. } => ErrorKind::UnknownMember,
            QueryError::NotCallable { .. } => ErrorKind::NotCallable,
            QueryError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            QueryError::Callback { .. } => ErrorKind::Callback,
        }
    }

    /// Builds the error a host callable returns to report its own failure.
    pub fn callback(name: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Callback {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
