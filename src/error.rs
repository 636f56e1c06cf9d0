//! Error types.
//!
//! The error surface is intentionally small: malformed or truncated input is
//! the only failure the codecs report. Conversion accessors never fail (they
//! coerce or fall back to defaults) and out-of-range access yields the shared
//! undefined value.

use std::fmt;

use thiserror::Error;

/// A parse failure, carrying the byte offset of the first unprocessed byte.
///
/// The offset is relative to the full input handed to the one-shot wrappers
/// ([`parse`](crate::parse) / [`unbinarize`](crate::unbinarize)). With the
/// incremental parsers the same information is available through
/// [`Parser::unprocessed_len`](crate::Parser::unprocessed_len).
///
/// # Examples
///
/// ```rust
/// let err = incjson::parse("{\"a\": nope}").unwrap_err();
/// assert_eq!(err.offset, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("JSON parse error at byte {offset}")]
pub struct ParseError {
    /// Byte offset of the first byte the parser did not consume.
    pub offset: usize,
}

/// Crate-level error: a parse failure, or a message raised while crossing
/// serde (`Value` implements `Serialize`/`Deserialize`, and serde formats
/// report their own failures through [`Error::custom`]).
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed or truncated input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Custom error with a display message.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error from a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use incjson::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_wrap() {
        let parse = ParseError { offset: 12 };
        let err = Error::from(parse);
        assert_eq!(err.to_string(), "JSON parse error at byte 12");
    }

    #[test]
    fn custom_messages_pass_through() {
        let err = Error::custom(format_args!("bad {}", "thing"));
        assert_eq!(err.to_string(), "bad thing");
    }
}
