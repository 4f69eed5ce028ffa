use std::fmt;

/// Classification of an extended client error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A required configuration value is missing.
    Configuration,
    /// An object store call failed.
    Storage,
    /// A queue service call failed.
    Queue,
    /// A pointer attribute or a compatibility body is present but unparsable.
    MalformedPointer,
}

/// Represents an error of an extended client operation. The `kind` tells
/// which collaborator failed or which precondition was violated.
#[derive(Clone, Debug)]
pub struct ExtendedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ExtendedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtendedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ExtendedError {}

/// Shorthand for creating errors in async functions.
#[macro_export]
macro_rules! extended_error {
    ($kind:expr, $message:expr) => {
        ::std::result::Result::Err(anyhow::Error::new($crate::error::ExtendedError {
            kind: $kind,
            message: ::std::string::String::from($message),
        }))
    };
}

pub(crate) fn storage_error(error: anyhow::Error) -> anyhow::Error {
    anyhow::Error::new(ExtendedError::new(ErrorKind::Storage, format!("{:#}", error)))
}

pub(crate) fn queue_error(error: anyhow::Error) -> anyhow::Error {
    anyhow::Error::new(ExtendedError::new(ErrorKind::Queue, format!("{:#}", error)))
}

pub(crate) fn pointer_error(error: extendmq_codec::Error) -> anyhow::Error {
    anyhow::Error::new(ExtendedError::new(ErrorKind::MalformedPointer, error.to_string()))
}
