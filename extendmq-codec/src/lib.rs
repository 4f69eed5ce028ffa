//! Data structures and converter functions for dealing with offloaded payload
//! pointers.
//!
//! The message and attribute types are in the `message` module, the `pointer`
//! module implements the pointer encoding and decoding, and `size` implements
//! the wire size estimation which decides whether a message gets offloaded.
pub mod message;
pub mod pointer;
pub mod size;

#[cfg(test)]
mod tests;

use std::fmt;

/// Type alias for a sync and send error.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
/// Type alias for a simplified Result with Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised when a pointer attribute or a compatibility-mode body is
/// present but cannot be parsed.
#[derive(Debug)]
pub struct MalformedPointerError {
    pub message: String,
}

impl fmt::Display for MalformedPointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &self)
    }
}

impl std::error::Error for MalformedPointerError {}

/// Shorthand for making malformed pointer errors with an error message.
///
/// ```no_run
/// use extendmq_codec::malformed_pointer;
/// use extendmq_codec::MalformedPointerError;
///
/// fn bucket_of(value: &str) -> Result<&str, Box<dyn std::error::Error + Send + Sync>> {
///     if let Some(rest) = value.strip_prefix('(') {
///         if let Some(end) = rest.find(')') {
///             return Ok(&rest[..end]);
///         }
///     }
///
///     malformed_pointer!("Pointer value is not in (<bucket>)<key> form")
/// }
/// ```
#[macro_export]
macro_rules! malformed_pointer {
    ($message:expr) => {
        ::std::result::Result::Err(::std::boxed::Box::new($crate::MalformedPointerError {
            message: ::std::string::String::from($message),
        }))
    };
}
