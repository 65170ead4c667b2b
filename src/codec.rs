//! The CSF encode/decode pair.
//!
//! Encoding runs in two stages:
//!
//! 1. [`Codec::to_short_keys`]: record → short-key record. Keys become short
//!    codes and known role names become their integer codes.
//! 2. [`Codec::flatten`]: short-key record → `|`-delimited string, one segment
//!    per positional field.
//!
//! Decoding mirrors them with [`Codec::unflatten`] and [`Codec::from_short_keys`].
//!
//! ## Segment rules
//!
//! | Kind | Encode | Decode |
//! |------|--------|--------|
//! | `Integer` | decimal | canonical decimal only (`+5`, `007` rejected) |
//! | `Text` | space → `_` | `_` → space |
//! | `Plain` | unchanged | unchanged |
//! | `Bool` | `1` / `0` | `1` / `0`, anything else rejected |
//! | `List` | items joined with `,` | split on `,`; empty segment is `[]` |
//! | `Roles` | role code, or literal under pass-through | all-digit tokens are role codes |
//!
//! `|` is rejected in every value and `,` in list items, so a string produced
//! by [`Codec::encode`] always has exactly [`SchemaTable::position_count`] segments.
//!
//! ## Examples
//!
//! ```rust
//! use serde_csf::{csf, Codec, SchemaTable};
//!
//! let schema = SchemaTable::standard();
//! let codec = Codec::new(&schema);
//!
//! let record = csf!({
//!     "id": 7,
//!     "name": "Ada Lovelace",
//!     "email": "ada@example.com",
//!     "is_active": false,
//!     "age": 36,
//!     "address": { "street": "12 St James Sq", "city": "London", "state": "LDN", "zip_code": "SW1Y" },
//!     "phone_numbers": [],
//!     "roles": ["editor", "guest"],
//!     "created_at": "1843-07-10T00:00:00Z"
//! });
//!
//! let wire = codec.encode(&record).unwrap();
//! assert_eq!(
//!     wire,
//!     "7|Ada_Lovelace|ada@example.com|0|36|12_St_James_Sq|London|LDN|SW1Y||1,guest|1843-07-10T00:00:00Z"
//! );
//! assert_eq!(codec.decode(&wire).unwrap(), record);
//! ```

use crate::schema::{FieldDef, FieldKind, FIELD_DELIMITER, ITEM_DELIMITER, SPACE_PLACEHOLDER};
use crate::{CsfOptions, Error, Map, Result, SchemaTable, UnknownRolePolicy, Value};

/// Stateless CSF encoder/decoder bound to one schema table.
///
/// A codec borrows its table; every call is independent, so one codec can be
/// shared freely across threads.
#[derive(Clone, Debug)]
pub struct Codec<'s> {
    schema: &'s SchemaTable,
    options: CsfOptions,
}

impl<'s> Codec<'s> {
    /// Creates a codec with default options (pass-through roles, lossy placeholder).
    #[must_use]
    pub fn new(schema: &'s SchemaTable) -> Self {
        Self::with_options(schema, CsfOptions::default())
    }

    #[must_use]
    pub fn with_options(schema: &'s SchemaTable, options: CsfOptions) -> Self {
        Codec { schema, options }
    }

    #[must_use]
    pub fn schema(&self) -> &'s SchemaTable {
        self.schema
    }

    #[must_use]
    pub fn options(&self) -> &CsfOptions {
        &self.options
    }

    /// Encodes a full-name record into a CSF string.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingField`] if a declared field is absent
    /// - [`Error::TypeMismatch`] if a field has the wrong shape
    /// - [`Error::InvalidValue`] if a value contains a reserved character or
    ///   violates the role or placeholder policy
    pub fn encode(&self, record: &Value) -> Result<String> {
        let short = self.to_short_keys(record)?;
        let output = self.flatten(&short)?;
        tracing::trace!(target: "serde_csf", bytes = output.len(), "encoded record");
        Ok(output)
    }

    /// Decodes a CSF string into a full-name record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCount`] if the string does not have exactly one
    /// segment per positional field, or [`Error::InvalidSegment`] for the first
    /// segment that fails its decoding rule.
    pub fn decode(&self, input: &str) -> Result<Value> {
        let short = self.unflatten(input)?;
        let record = self.from_short_keys(&short)?;
        tracing::trace!(target: "serde_csf", bytes = input.len(), "decoded record");
        Ok(record)
    }

    /// Translates a full-name record into its short-key form.
    ///
    /// Keys the schema does not declare are dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::{Codec, Record, SchemaTable, to_value};
    ///
    /// let schema = SchemaTable::standard();
    /// let codec = Codec::new(&schema);
    /// let short = codec.to_short_keys(&to_value(&Record::sample()).unwrap()).unwrap();
    ///
    /// let json = serde_json::to_string(&short).unwrap();
    /// assert!(json.starts_with(r#"{"i":1,"n":"John Doe","#));
    /// assert!(json.contains(r#""ad":{"s":"123 Main St","c":"Springfield","st":"IL","z":"62704"}"#));
    /// assert!(json.contains(r#""r":[0,1]"#));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] or [`Error::TypeMismatch`] for records of
    /// the wrong shape, and [`Error::InvalidValue`] for unknown roles under
    /// [`UnknownRolePolicy::Reject`].
    pub fn to_short_keys(&self, record: &Value) -> Result<Value> {
        let obj = expect_object("record", record)?;
        self.log_undeclared(obj, self.schema.fields(), "record");

        let mut short = Map::with_capacity(obj.len());
        for field in self.schema.fields() {
            let value = obj
                .get(field.name())
                .ok_or_else(|| Error::missing_field(field.name()))?;
            short.insert(field.short().to_string(), self.shorten(field, value)?);
        }
        Ok(Value::Object(short))
    }

    fn shorten(&self, field: &FieldDef, value: &Value) -> Result<Value> {
        match field.kind() {
            FieldKind::Group => {
                let obj = expect_object(field.name(), value)?;
                self.log_undeclared(obj, self.schema.children(field), field.name());

                let mut short = Map::with_capacity(obj.len());
                for child in self.schema.children(field) {
                    let path = self.path(child);
                    let value = obj.get(child.name()).ok_or_else(|| Error::missing_field(&path))?;
                    short.insert(child.short().to_string(), self.shorten(child, value)?);
                }
                Ok(Value::Object(short))
            }
            FieldKind::Roles => {
                let path = self.path(field);
                check_leaf(&path, FieldKind::Roles, value)?;
                let mut codes = Vec::new();
                for role in value.as_array().into_iter().flatten() {
                    let name = role.as_str().unwrap_or_default();
                    match self.schema.role_code(name) {
                        Some(code) => codes.push(Value::Integer(i64::from(code))),
                        None => {
                            self.check_unknown_role(&path, name)?;
                            codes.push(role.clone());
                        }
                    }
                }
                Ok(Value::Array(codes))
            }
            kind => {
                check_leaf(&self.path(field), kind, value)?;
                Ok(value.clone())
            }
        }
    }

    /// Writes a short-key record as a `|`-delimited string in wire order.
    ///
    /// # Errors
    ///
    /// See [`Codec::encode`].
    pub fn flatten(&self, short: &Value) -> Result<String> {
        let obj = expect_object("record", short)?;
        let mut output = String::with_capacity(128);

        for (index, field) in self.schema.positions().enumerate() {
            if index > 0 {
                output.push(FIELD_DELIMITER);
            }
            let value = self.lookup_short(obj, field)?;
            self.write_segment(&mut output, field, value)?;
        }
        Ok(output)
    }

    fn lookup_short<'v>(&self, obj: &'v Map, field: &FieldDef) -> Result<&'v Value> {
        let scope = match self.schema.parent(field) {
            Some(group) => {
                let value = obj
                    .get(group.short())
                    .ok_or_else(|| Error::missing_field(group.name()))?;
                expect_object(group.name(), value)?
            }
            None => obj,
        };
        scope
            .get(field.short())
            .ok_or_else(|| Error::missing_field(&self.path(field)))
    }

    fn write_segment(&self, output: &mut String, field: &FieldDef, value: &Value) -> Result<()> {
        let path = self.path(field);
        match (field.kind(), value) {
            (FieldKind::Integer, Value::Integer(n)) => output.push_str(&n.to_string()),
            (FieldKind::Bool, Value::Bool(b)) => output.push(if *b { '1' } else { '0' }),
            (FieldKind::Text, Value::String(s)) => {
                check_text(&path, s)?;
                if self.options.strict_placeholder && s.contains(SPACE_PLACEHOLDER) {
                    return Err(Error::invalid_value(
                        &path,
                        "contains the space placeholder `_`, which would decode as a space",
                    ));
                }
                output.extend(s.chars().map(|c| if c == ' ' { SPACE_PLACEHOLDER } else { c }));
            }
            (FieldKind::Plain, Value::String(s)) => {
                check_text(&path, s)?;
                output.push_str(s);
            }
            (FieldKind::List, Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let s = item
                        .as_str()
                        .ok_or_else(|| Error::type_mismatch(&path, "array of strings", item.type_name()))?;
                    check_item(&path, s)?;
                    if i > 0 {
                        output.push(ITEM_DELIMITER);
                    }
                    output.push_str(s);
                }
            }
            (FieldKind::Roles, Value::Array(roles)) => {
                for (i, role) in roles.iter().enumerate() {
                    if i > 0 {
                        output.push(ITEM_DELIMITER);
                    }
                    output.push_str(&self.role_token(&path, role)?);
                }
            }
            (kind, value) => {
                return Err(Error::type_mismatch(&path, kind.expected(), value.type_name()));
            }
        }
        Ok(())
    }

    fn role_token(&self, path: &str, role: &Value) -> Result<String> {
        match role {
            Value::Integer(code) => {
                let known = u32::try_from(*code)
                    .ok()
                    .filter(|&c| self.schema.role_name(c).is_some());
                match known {
                    Some(code) => Ok(code.to_string()),
                    None => Err(Error::invalid_value(
                        path,
                        &format!("role code {} is not in the role table", code),
                    )),
                }
            }
            Value::String(name) => match self.schema.role_code(name) {
                Some(code) => Ok(code.to_string()),
                None => {
                    self.check_unknown_role(path, name)?;
                    check_item(path, name)?;
                    Ok(name.clone())
                }
            },
            other => Err(Error::type_mismatch(path, "role name or code", other.type_name())),
        }
    }

    fn check_unknown_role(&self, path: &str, name: &str) -> Result<()> {
        if self.options.unknown_roles == UnknownRolePolicy::Reject {
            return Err(Error::invalid_value(
                path,
                &format!("unknown role `{}`", name),
            ));
        }
        if is_code_token(name) {
            return Err(Error::invalid_value(
                path,
                &format!(
                    "unknown role `{}` is all digits and would be read back as a role code",
                    name
                ),
            ));
        }
        Ok(())
    }

    /// Splits a CSF string into its short-key record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::{Codec, SchemaTable};
    ///
    /// let schema = SchemaTable::standard();
    /// let codec = Codec::new(&schema);
    /// let short = codec
    ///     .unflatten("1|John_Doe|j@d.com|1|30|1_Main|X|IL|1||0,guest|t")
    ///     .unwrap();
    /// assert_eq!(
    ///     serde_json::to_string(&short).unwrap(),
    ///     r#"{"i":1,"n":"John Doe","e":"j@d.com","ia":true,"a":30,"ad":{"s":"1 Main","c":"X","st":"IL","z":"1"},"pn":[],"r":[0,"guest"],"ca":"t"}"#
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Codec::decode`].
    pub fn unflatten(&self, input: &str) -> Result<Value> {
        let segments: Vec<&str> = input.split(FIELD_DELIMITER).collect();
        let expected = self.schema.position_count();
        if segments.len() != expected {
            tracing::debug!(
                target: "serde_csf",
                expected,
                found = segments.len(),
                "rejecting input with wrong field count"
            );
            return Err(Error::field_count(expected, segments.len()));
        }

        let mut short = Map::new();
        for field in self.schema.fields() {
            let value = if field.is_group() {
                let mut group = Map::new();
                for child in self.schema.children(field) {
                    let value = self.read_position(child, &segments)?;
                    group.insert(child.short().to_string(), value);
                }
                Value::Object(group)
            } else {
                self.read_position(field, &segments)?
            };
            short.insert(field.short().to_string(), value);
        }
        Ok(Value::Object(short))
    }

    fn read_position(&self, field: &FieldDef, segments: &[&str]) -> Result<Value> {
        let index = field
            .position()
            .ok_or_else(|| Error::custom(format!("`{}` has no wire position", field.name())))?;
        self.read_segment(field, index, segments[index]).map_err(|err| {
            tracing::debug!(target: "serde_csf", index, field = field.name(), error = %err, "rejecting segment");
            err
        })
    }

    fn read_segment(&self, field: &FieldDef, index: usize, segment: &str) -> Result<Value> {
        let path = self.path(field);
        let bad = |msg: &str| Error::invalid_segment(index, &path, segment, msg);

        match field.kind() {
            FieldKind::Integer => segment
                .parse::<i64>()
                .ok()
                .filter(|n| n.to_string() == segment)
                .map(Value::Integer)
                .ok_or_else(|| bad("expected a decimal integer")),
            FieldKind::Bool => match segment {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                _ => Err(bad("expected `1` or `0`")),
            },
            FieldKind::Text => Ok(Value::String(segment.replace(SPACE_PLACEHOLDER, " "))),
            FieldKind::Plain => Ok(Value::String(segment.to_string())),
            FieldKind::List => split_items(segment)
                .map(|item| {
                    if item.is_empty() {
                        Err(bad("empty list item"))
                    } else {
                        Ok(Value::String(item.to_string()))
                    }
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            FieldKind::Roles => split_items(segment)
                .map(|token| self.read_role(token).map_err(|msg| bad(&msg)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            FieldKind::Group => Err(bad("groups have no segment")),
        }
    }

    fn read_role(&self, token: &str) -> std::result::Result<Value, String> {
        if token.is_empty() {
            return Err("empty role".to_string());
        }
        if is_code_token(token) {
            return token
                .parse::<u32>()
                .ok()
                .filter(|code| code.to_string() == token && self.schema.role_name(*code).is_some())
                .map(|code| Value::Integer(i64::from(code)))
                .ok_or_else(|| format!("unknown role code {}", token));
        }
        match self.options.unknown_roles {
            UnknownRolePolicy::PassThrough => Ok(Value::String(token.to_string())),
            UnknownRolePolicy::Reject => Err(format!("unknown role `{}`", token)),
        }
    }

    /// Translates a short-key record back into full field names and role names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] or [`Error::TypeMismatch`] for short-key
    /// records of the wrong shape, and [`Error::InvalidValue`] for role codes
    /// missing from the role table.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_short_keys(&self, short: &Value) -> Result<Value> {
        let obj = expect_object("record", short)?;

        let mut record = Map::with_capacity(obj.len());
        for field in self.schema.fields() {
            let value = obj
                .get(field.short())
                .ok_or_else(|| Error::missing_field(field.name()))?;
            record.insert(field.name().to_string(), self.expand(field, value)?);
        }
        Ok(Value::Object(record))
    }

    fn expand(&self, field: &FieldDef, value: &Value) -> Result<Value> {
        let path = self.path(field);
        match field.kind() {
            FieldKind::Group => {
                let obj = expect_object(field.name(), value)?;
                let mut group = Map::with_capacity(obj.len());
                for child in self.schema.children(field) {
                    let value = obj
                        .get(child.short())
                        .ok_or_else(|| Error::missing_field(&self.path(child)))?;
                    group.insert(child.name().to_string(), self.expand(child, value)?);
                }
                Ok(Value::Object(group))
            }
            FieldKind::Roles => {
                let roles = value
                    .as_array()
                    .ok_or_else(|| Error::type_mismatch(&path, "array", value.type_name()))?;
                roles
                    .iter()
                    .map(|role| self.role_name(&path, role))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            kind => {
                check_leaf(&path, kind, value)?;
                Ok(value.clone())
            }
        }
    }

    fn role_name(&self, path: &str, role: &Value) -> Result<Value> {
        match role {
            Value::Integer(code) => u32::try_from(*code)
                .ok()
                .and_then(|c| self.schema.role_name(c))
                .map(Value::from)
                .ok_or_else(|| {
                    Error::invalid_value(path, &format!("role code {} is not in the role table", code))
                }),
            Value::String(name) => {
                if self.schema.role_code(name).is_none() {
                    self.check_unknown_role(path, name)?;
                }
                Ok(role.clone())
            }
            other => Err(Error::type_mismatch(path, "role name or code", other.type_name())),
        }
    }

    fn path(&self, field: &FieldDef) -> String {
        self.schema.field_path(field)
    }

    fn log_undeclared<'a>(
        &self,
        obj: &Map,
        declared: impl Iterator<Item = &'a FieldDef>,
        scope: &str,
    ) {
        let declared: Vec<&str> = declared.map(FieldDef::name).collect();
        for key in obj.keys() {
            if !declared.contains(&key.as_str()) {
                tracing::debug!(target: "serde_csf", scope, key = key.as_str(), "dropping undeclared field");
            }
        }
    }
}

fn expect_object<'v>(field: &str, value: &'v Value) -> Result<&'v Map> {
    value
        .as_object()
        .ok_or_else(|| Error::type_mismatch(field, "object", value.type_name()))
}

fn check_leaf(path: &str, kind: FieldKind, value: &Value) -> Result<()> {
    let ok = match kind {
        FieldKind::Integer => value.is_integer(),
        FieldKind::Text | FieldKind::Plain => value.is_string(),
        FieldKind::Bool => value.is_bool(),
        FieldKind::List | FieldKind::Roles => match value.as_array() {
            Some(items) => {
                if let Some(item) = items.iter().find(|item| !item.is_string()) {
                    return Err(Error::type_mismatch(path, kind.expected(), item.type_name()));
                }
                true
            }
            None => false,
        },
        FieldKind::Group => value.is_object(),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::type_mismatch(path, kind.expected(), value.type_name()))
    }
}

/// A record is one line: `|` and line breaks never reach the wire.
fn check_text(path: &str, s: &str) -> Result<()> {
    if s.contains(FIELD_DELIMITER) {
        return Err(Error::invalid_value(path, "contains the field delimiter `|`"));
    }
    if s.contains(['\r', '\n']) {
        return Err(Error::invalid_value(path, "contains a line break"));
    }
    Ok(())
}

fn check_item(path: &str, s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::invalid_value(path, "list items must not be empty"));
    }
    if s.contains(ITEM_DELIMITER) {
        return Err(Error::invalid_value(path, "list item contains the item delimiter `,`"));
    }
    check_text(path, s)
}

/// An empty segment is an empty list, never a list holding one empty string.
fn split_items(segment: &str) -> impl Iterator<Item = &str> {
    let items = if segment.is_empty() { None } else { Some(segment) };
    items.into_iter().flat_map(|s| s.split(ITEM_DELIMITER))
}

fn is_code_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
