//! # serde_csf
//!
//! A Serde-compatible implementation of CSF (Compact Serializer Format), a
//! schema-based record encoding for sending structured data to Large Language Models.
//!
//! ## What is CSF?
//!
//! CSF trades self-description for a fixed, externally agreed field order. Keys
//! are replaced by short codes, nesting is flattened into positional fields, and
//! categorical values are replaced by small integers. The record
//!
//! ```text
//! {"id":1,"name":"John Doe","email":"john.doe@example.com","is_active":true,"age":30,
//!  "address":{"street":"123 Main St","city":"Springfield","state":"IL","zip_code":"62704"},
//!  "phone_numbers":["+1-555-123-4567","+1-555-987-6543"],"roles":["admin","editor"],
//!  "created_at":"2025-11-11T10:00:00Z"}
//! ```
//!
//! becomes
//!
//! ```text
//! 1|John_Doe|john.doe@example.com|1|30|123_Main_St|Springfield|IL|62704|+1-555-123-4567,+1-555-987-6543|0,1|2025-11-11T10:00:00Z
//! ```
//!
//! ## Key Features
//!
//! - **Explicit schema**: a [`SchemaTable`] is built once and passed into every call
//! - **Round-trip decoding**: [`Codec::decode`] reverses [`Codec::encode`]
//! - **Strict wire rules**: reserved characters are rejected instead of silently corrupting the field count
//! - **Named policies**: unknown roles pass through or are rejected per [`UnknownRolePolicy`]
//! - **Serde compatible**: typed structs go through [`to_string`] and [`from_str`]
//! - **Prompt support**: [`prompt::describe`] explains a schema to the receiving model
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_csf::{from_str, to_string, Record, SchemaTable};
//!
//! let schema = SchemaTable::standard();
//! let record = Record::sample();
//!
//! let csf = to_string(&record, &schema).unwrap();
//! assert!(csf.starts_with("1|John_Doe|"));
//!
//! let back: Record = from_str(&csf, &schema).unwrap();
//! assert_eq!(back, record);
//! ```
//!
//! ### Dynamic records
//!
//! ```rust
//! use serde_csf::{csf, Codec, SchemaTable};
//!
//! let schema = SchemaTable::standard();
//! let codec = Codec::new(&schema);
//!
//! let short = codec.unflatten("1|John_Doe|j@d.com|1|30|1_Main|X|IL|1||0,guest|t").unwrap();
//! assert_eq!(short.as_object().and_then(|o| o.get("r")), Some(&csf!([0, "guest"])));
//!
//! let record = codec.from_short_keys(&short).unwrap();
//! assert_eq!(record.as_object().and_then(|o| o.get("roles")), Some(&csf!(["admin", "guest"])));
//! ```
//!
//! ## Thread Safety
//!
//! Encoding and decoding are pure functions of their input and the schema table.
//! [`SchemaTable`] is immutable after construction and [`Codec`] holds only a
//! shared reference to it, so both can be used from any number of threads.
//!
//! ## Wire Format
//!
//! See the [`format`] module for the wire format, reserved characters and edge cases.

pub mod codec;
pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod prompt;
pub mod record;
pub mod schema;
pub mod ser;
pub mod value;

pub use codec::Codec;
pub use de::ValueDeserializer;
pub use error::{Error, ErrorKind, Result};
pub use map::Map;
pub use options::{CsfOptions, UnknownRolePolicy};
pub use record::{Address, Record};
pub use schema::{
    FieldConfig, FieldDef, FieldKind, GroupBuilder, RoleConfig, SchemaBuilder, SchemaConfig,
    SchemaTable,
};
pub use ser::ValueSerializer;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a CSF string.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_csf::{to_string, FieldKind, SchemaTable};
///
/// #[derive(Serialize)]
/// struct Item { sku: String, qty: u32, tags: Vec<String> }
///
/// let schema = SchemaTable::builder()
///     .field("sku", "k", FieldKind::Plain)
///     .field("qty", "q", FieldKind::Integer)
///     .field("tags", "t", FieldKind::List)
///     .build()
///     .unwrap();
///
/// let item = Item { sku: "A-1".into(), qty: 3, tags: vec!["red".into(), "xl".into()] };
/// assert_eq!(to_string(&item, &schema).unwrap(), "A-1|3|red,xl");
/// ```
///
/// # Errors
///
/// Returns an error if the value does not match the schema's shape or contains
/// a reserved character.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T, schema: &SchemaTable) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, schema, CsfOptions::default())
}

/// Serialize any `T: Serialize` to a CSF string with custom options.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, schema: &SchemaTable, options: CsfOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Codec::with_options(schema, options).encode(&to_value(value)?)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Errors
///
/// Returns an error for floats, byte arrays, data-carrying enum variants and
/// non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer in CSF format.
///
/// # Examples
///
/// ```rust
/// use serde_csf::{to_writer, Record, SchemaTable};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Record::sample(), &SchemaTable::standard()).unwrap();
/// assert!(buffer.starts_with(b"1|John_Doe|"));
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T, schema: &SchemaTable) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, schema, CsfOptions::default())
}

/// Serialize any `T: Serialize` to a writer in CSF format with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(
    mut writer: W,
    value: &T,
    schema: &SchemaTable,
    options: CsfOptions,
) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let csf = to_string_with_options(value, schema, options)?;
    writer
        .write_all(csf.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a CSF string.
///
/// # Errors
///
/// Returns an error if the input is not a valid CSF string for `schema`, or the
/// decoded record cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str, schema: &SchemaTable) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, schema, CsfOptions::default())
}

/// Deserialize an instance of type `T` from a CSF string with custom options.
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, schema: &SchemaTable, options: CsfOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let record = Codec::with_options(schema, options).decode(s)?;
    from_value(record).map_err(|err| segment_error(err, s, schema))
}

/// Re-anchors a typed decoding failure on the wire segment it came from.
fn segment_error(err: Error, input: &str, schema: &SchemaTable) -> Error {
    let msg = match &err {
        Error::InvalidValue { msg, .. } => msg.clone(),
        Error::TypeMismatch {
            expected, found, ..
        } => format!("expected {}, found {}", expected, found),
        _ => return err,
    };
    let field = err.field().and_then(|path| schema.position_by_path(path));
    match field.and_then(|f| f.position().map(|index| (f, index))) {
        Some((field, index)) => {
            let segment = input
                .split(crate::schema::FIELD_DELIMITER)
                .nth(index)
                .unwrap_or_default();
            Error::invalid_segment(index, &schema.field_path(field), segment, &msg)
        }
        None => err,
    }
}

/// Deserialize an instance of type `T` from bytes of CSF text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a valid CSF string.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8], schema: &SchemaTable) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s, schema)
}

/// Deserialize an instance of type `T` from an I/O stream of CSF text.
///
/// Trailing line endings are ignored, so a record read from a line-oriented
/// file decodes the same as the bare string.
///
/// # Examples
///
/// ```rust
/// use serde_csf::{from_reader, Record, SchemaTable};
/// use std::io::Cursor;
///
/// let line = "1|John_Doe|john.doe@example.com|1|30|123_Main_St|Springfield|IL|62704|+1-555-123-4567,+1-555-987-6543|0,1|2025-11-11T10:00:00Z\n";
/// let record: Record = from_reader(Cursor::new(line), &SchemaTable::standard()).unwrap();
/// assert_eq!(record, Record::sample());
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the text is not a valid CSF string.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R, schema: &SchemaTable) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(string.trim_end_matches(['\r', '\n']), schema)
}

/// Interpret a [`Value`] as an instance of type `T`.
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}
