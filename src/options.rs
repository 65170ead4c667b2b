//! Codec policies for CSF encoding and decoding.
//!
//! - [`CsfOptions`]: main configuration struct
//! - [`UnknownRolePolicy`]: what happens to role names missing from the role table
//!
//! ## Examples
//!
//! ```rust
//! use serde_csf::{CsfOptions, UnknownRolePolicy};
//!
//! // Default: unknown roles travel as literal strings, `_` in text is lossy
//! let options = CsfOptions::new();
//! assert_eq!(options.unknown_roles, UnknownRolePolicy::PassThrough);
//!
//! // Reject anything that would not round-trip exactly
//! let options = CsfOptions::strict();
//! assert_eq!(options.unknown_roles, UnknownRolePolicy::Reject);
//! assert!(options.strict_placeholder);
//! ```

use serde::{Deserialize, Serialize};

/// Policy for role names that have no integer code in the schema's role table.
///
/// Whichever policy is active, an all-digit token in the roles segment is always
/// read as a role code, so a literal role name made only of digits can never be
/// passed through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRolePolicy {
    /// Unknown role names are written and read back as literal strings.
    #[default]
    PassThrough,
    /// Unknown role names are an error on encode and on decode.
    Reject,
}

/// Configuration options for a [`Codec`](crate::Codec).
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsfOptions {
    pub unknown_roles: UnknownRolePolicy,
    /// Reject `_` inside space-substituted text fields instead of accepting the lossy encoding.
    pub strict_placeholder: bool,
}

impl CsfOptions {
    /// Creates default options (pass-through roles, lossy placeholder).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject every input which would not round-trip exactly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::{Codec, CsfOptions, SchemaTable};
    ///
    /// let schema = SchemaTable::standard();
    /// let codec = Codec::with_options(&schema, CsfOptions::strict());
    /// assert!(codec.decode("1|A|a@b.c|1|3|S|C|IL|1||0,guest|t").is_err());
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        CsfOptions {
            unknown_roles: UnknownRolePolicy::Reject,
            strict_placeholder: true,
        }
    }

    /// Sets the policy for roles missing from the role table.
    #[must_use]
    pub fn with_unknown_roles(mut self, policy: UnknownRolePolicy) -> Self {
        self.unknown_roles = policy;
        self
    }

    /// Enables or disables rejection of `_` in space-substituted text fields.
    #[must_use]
    pub fn with_strict_placeholder(mut self, strict: bool) -> Self {
        self.strict_placeholder = strict;
        self
    }
}
