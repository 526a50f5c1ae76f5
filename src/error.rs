//! Error types for HiPack decoding and encoding.
//!
//! HiPack has two failure modes, and both abort the whole call: there is no
//! recovery, no partial result and no resynchronization.
//!
//! - **Decode errors** carry the message together with the byte offset, line
//!   and column at which the grammar was violated.
//! - **Encode errors** are raised for values the text format cannot carry
//!   (null, non-finite floats, keys with reserved characters, ...).
//!
//! The serde bridge adds two more variants: I/O failures from readers and
//! writers, and data-model mismatches while turning a decoded tree into a
//! user type.
//!
//! ## Examples
//!
//! ```rust
//! use hipack::{load, Error};
//!
//! let err = load("value: [1, 2").unwrap_err();
//! assert!(err.is_decode());
//!
//! if let Error::Decode { line, column, .. } = err {
//!     assert_eq!(line, 1);
//!     assert_eq!(column, 13);
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every error that can occur while loading or dumping HiPack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input text is not valid HiPack.
    #[error("{message} at line {line}, column {column}")]
    Decode {
        message: String,
        /// Byte offset of the offending character.
        position: usize,
        line: usize,
        column: usize,
    },

    /// The value cannot be represented as HiPack text.
    #[error("{0}")]
    Encode(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A decoded value does not fit the requested Rust type.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a decode error at the given location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hipack::Error;
    ///
    /// let err = Error::decode("missing separator", 12, 2, 5);
    /// assert_eq!(err.to_string(), "missing separator at line 2, column 5");
    /// ```
    pub fn decode(message: impl Into<String>, position: usize, line: usize, column: usize) -> Self {
        Error::Decode {
            message: message.into(),
            position,
            line,
            column,
        }
    }

    /// Creates an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode(message.into())
    }

    /// Creates the encode error raised for a kind of value that cannot be dumped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hipack::Error;
    ///
    /// let err = Error::cannot_dump("null");
    /// assert_eq!(err.to_string(), "values of type 'null' cannot be dumped");
    /// ```
    pub fn cannot_dump(kind: &str) -> Self {
        Error::Encode(format!("values of type '{}' cannot be dumped", kind))
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Returns `true` for errors raised by the decoder.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }

    /// Returns `true` for errors raised by the encoder.
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_))
    }

    /// Line and column of a decode error.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Error::Decode { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
