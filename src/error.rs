//! Error types for CSF encoding and decoding.
//!
//! Every failure is local to a single call and carries enough context to act on
//! it: the field name, the offending value, or the segment index on the wire.
//!
//! ## Error Categories
//!
//! - **Configuration**: a schema table that is not a bijection (raised at construction)
//! - **Missing fields / type mismatches**: the record handed to the encoder has the wrong shape
//! - **Invalid values**: a value contains a reserved character or violates a codec policy
//! - **Malformed input**: the wire string has the wrong field count or an unparseable segment
//!
//! ## Examples
//!
//! ```rust
//! use serde_csf::{Codec, ErrorKind, SchemaTable};
//!
//! let schema = SchemaTable::standard();
//! let codec = Codec::new(&schema);
//!
//! let err = codec.decode("1|John_Doe|too|short").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MalformedInput);
//! assert!(err.to_string().contains("expected 12 fields, found 4"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during CSF encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The schema table could not be constructed
    #[error("Invalid schema: {0}")]
    Configuration(String),

    /// A field required by the schema is absent from the record
    #[error("Missing field `{field}`")]
    MissingField { field: String },

    /// A field holds a value of the wrong shape
    #[error("Type mismatch for field `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A value cannot be represented on the wire under the active options
    #[error("Invalid value for field `{field}`: {msg}")]
    InvalidValue { field: String, msg: String },

    /// The wire string does not split into the expected number of positional fields
    #[error("Malformed input: expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A positional segment failed its type-specific decoding rule
    #[error("Malformed input at segment {index} (`{field}`): {msg} (segment: {segment:?})")]
    InvalidSegment {
        index: usize,
        field: String,
        segment: String,
        msg: String,
    },

    /// Unsupported type for the serde bridge
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    MissingField,
    TypeMismatch,
    InvalidValue,
    MalformedInput,
    Unsupported,
    Io,
    Custom,
}

impl Error {
    /// Creates a schema configuration error.
    pub fn configuration<T: fmt::Display>(msg: T) -> Self {
        Error::Configuration(msg.to_string())
    }

    /// Creates a missing field error naming the absent field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::Error;
    ///
    /// let err = Error::missing_field("email");
    /// assert_eq!(err.to_string(), "Missing field `email`");
    /// ```
    pub fn missing_field(field: &str) -> Self {
        Error::MissingField {
            field: field.to_string(),
        }
    }

    /// Creates a type mismatch error for an encoder input of the wrong shape.
    pub fn type_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn invalid_value(field: &str, msg: &str) -> Self {
        Error::InvalidValue {
            field: field.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn field_count(expected: usize, found: usize) -> Self {
        Error::FieldCount { expected, found }
    }

    /// Creates a malformed segment error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::Error;
    ///
    /// let err = Error::invalid_segment(3, "is_active", "yes", "expected `1` or `0`");
    /// assert!(err.to_string().contains("segment 3"));
    /// ```
    pub fn invalid_segment(index: usize, field: &str, segment: &str, msg: &str) -> Self {
        Error::InvalidSegment {
            index,
            field: field.to_string(),
            segment: segment.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::InvalidValue { .. } => ErrorKind::InvalidValue,
            Error::FieldCount { .. } | Error::InvalidSegment { .. } => ErrorKind::MalformedInput,
            Error::UnsupportedType(_) => ErrorKind::Unsupported,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns `true` for errors raised while decoding a wire string.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedInput
    }

    /// Qualifies an error raised inside the value of `key`.
    ///
    /// Nested calls build dotted paths from the inside out, so an error in
    /// `zip_code` surfacing through `address` reads `address.zip_code`.
    pub(crate) fn in_field(self, key: &str) -> Self {
        let join = |field: String| format!("{}.{}", key, field);
        match self {
            Error::Custom(msg) => Error::InvalidValue {
                field: key.to_string(),
                msg,
            },
            Error::InvalidValue { field, msg } => Error::InvalidValue {
                field: join(field),
                msg,
            },
            Error::TypeMismatch {
                field,
                expected,
                found,
            } => Error::TypeMismatch {
                field: join(field),
                expected,
                found,
            },
            Error::MissingField { field } => Error::MissingField { field: join(field) },
            other => other,
        }
    }

    /// Dotted field path this error is attached to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::MissingField { field }
            | Error::TypeMismatch { field, .. }
            | Error::InvalidValue { field, .. }
            | Error::InvalidSegment { field, .. } => Some(field),
            _ => None,
        }
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

    fn missing_field(field: &'static str) -> Self {
        Error::missing_field(field)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::field_count(12, 11).kind(), ErrorKind::MalformedInput);
        assert_eq!(
            Error::invalid_segment(0, "id", "x", "bad").kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(Error::missing_field("id").kind(), ErrorKind::MissingField);
        assert_eq!(
            Error::type_mismatch("roles", "array", "string").kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(Error::configuration("dup").kind(), ErrorKind::Configuration);
        assert!(!Error::invalid_value("name", "pipe").is_malformed());
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = Error::type_mismatch("address", "object", "string");
        assert_eq!(
            err.to_string(),
            "Type mismatch for field `address`: expected object, found string"
        );

        let err = Error::invalid_segment(10, "roles", "7", "unknown role code 7");
        let msg = err.to_string();
        assert!(msg.contains("segment 10"));
        assert!(msg.contains("`roles`"));
        assert!(msg.contains("\"7\""));
    }

    #[test]
    fn test_serde_missing_field_maps_to_missing_field() {
        let err = <Error as serde::de::Error>::missing_field("age");
        assert_eq!(err, Error::missing_field("age"));
    }

    #[test]
    fn test_in_field_builds_dotted_paths() {
        let err = Error::custom("invalid digit").in_field("zip_code").in_field("address");
        assert_eq!(err, Error::invalid_value("address.zip_code", "invalid digit"));
        assert_eq!(err.field(), Some("address.zip_code"));

        let err = Error::missing_field("city").in_field("address");
        assert_eq!(err, Error::missing_field("address.city"));

        assert_eq!(Error::io("closed").in_field("id"), Error::io("closed"));
        assert_eq!(Error::io("closed").field(), None);
    }
}
