//! The schema table shared by encoder and decoder.
//!
//! A [`SchemaTable`] is the externally agreed contract behind a CSF string:
//!
//! - a bijection between full field names and short codes,
//! - the positional order of fields on the wire (the leaves of the field tree,
//!   depth first),
//! - a bijection between role names and small integer codes.
//!
//! Tables are immutable once built. Pass them by reference into a
//! [`Codec`](crate::Codec); there is no process-wide schema.
//!
//! ## Examples
//!
//! ```rust
//! use serde_csf::{FieldKind, SchemaTable};
//!
//! let schema = SchemaTable::standard();
//! assert_eq!(schema.short_code("phone_numbers"), Some("pn"));
//! assert_eq!(schema.full_name("ca"), Some("created_at"));
//! assert_eq!(schema.role_code("editor"), Some(1));
//! assert_eq!(schema.position_count(), 12);
//!
//! let custom = SchemaTable::builder()
//!     .field("sku", "k", FieldKind::Plain)
//!     .field("qty", "q", FieldKind::Integer)
//!     .build()
//!     .unwrap();
//! assert_eq!(custom.position_count(), 2);
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Characters with structural meaning in the wire form.
pub(crate) const FIELD_DELIMITER: char = '|';
pub(crate) const ITEM_DELIMITER: char = ',';
pub(crate) const SPACE_PLACEHOLDER: char = '_';

/// How a field's value is represented in its positional segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Signed decimal integer.
    Integer,
    /// Free text; spaces become `_` on the wire.
    Text,
    /// String written unchanged.
    #[default]
    Plain,
    /// `1` for true, `0` for false.
    Bool,
    /// Array of strings joined with `,`.
    List,
    /// Array of role names, written as role codes where the role table has one.
    Roles,
    /// Nested object whose children occupy consecutive positions.
    Group,
}

impl FieldKind {
    /// Shape expected in the record, for type mismatch messages.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Text | FieldKind::Plain => "string",
            FieldKind::Bool => "boolean",
            FieldKind::List | FieldKind::Roles => "array of strings",
            FieldKind::Group => "object",
        }
    }
}

/// A field declared in a [`SchemaTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    short: String,
    kind: FieldKind,
    parent: Option<usize>,
    children: Vec<usize>,
    position: Option<usize>,
}

impl FieldDef {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short(&self) -> &str {
        &self.short
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Index of this field on the wire; `None` for groups.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == FieldKind::Group
    }
}

/// Serde-friendly declaration of one field, used by [`SchemaConfig`] and the builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub short: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
}

impl FieldConfig {
    fn new(name: impl Into<String>, short: impl Into<String>, kind: FieldKind) -> Self {
        FieldConfig {
            name: name.into(),
            short: short.into(),
            kind,
            fields: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub name: String,
    pub code: u32,
}

/// Declarative schema, loadable from any serde format.
///
/// # Examples
///
/// ```rust
/// use serde_csf::{SchemaConfig, SchemaTable};
///
/// let config: SchemaConfig = serde_json::from_str(r#"{
///     "fields": [
///         { "name": "id", "short": "i", "kind": "integer" },
///         { "name": "tags", "short": "t", "kind": "roles" }
///     ],
///     "roles": [{ "name": "owner", "code": 0 }]
/// }"#).unwrap();
///
/// let schema = SchemaTable::from_config(config).unwrap();
/// assert_eq!(schema.role_name(0), Some("owner"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
}

/// Immutable, bidirectional registry of field names, short codes and role codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaTable {
    fields: Vec<FieldDef>,
    roots: Vec<usize>,
    positions: Vec<usize>,
    by_name: IndexMap<String, usize>,
    by_short: IndexMap<String, usize>,
    roles: IndexMap<String, u32>,
    role_names: IndexMap<u32, String>,
}

impl SchemaTable {
    /// The published 12-position user record schema.
    ///
    /// Wire order: `id|name|email|is_active|age|street|city|state|zip_code|phone_numbers|roles|created_at`,
    /// with roles `admin = 0` and `editor = 1`.
    #[must_use]
    pub fn standard() -> Self {
        Self::assemble(standard_config())
    }

    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builds a table from a declarative config, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if names or short codes are duplicated or
    /// empty, a short code contains a reserved character, a group is empty or
    /// nested, the role table is not a bijection, or no positional field exists.
    pub fn from_config(config: SchemaConfig) -> Result<Self> {
        validate(&config)?;
        let table = Self::assemble(config);
        tracing::debug!(
            target: "serde_csf",
            fields = table.fields.len(),
            positions = table.positions.len(),
            roles = table.roles.len(),
            "schema table constructed"
        );
        Ok(table)
    }

    /// Builds a flat table of [`FieldKind::Plain`] fields from parallel lists of
    /// full names and short codes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_csf::{ErrorKind, SchemaTable};
    ///
    /// let schema = SchemaTable::from_columns(&["city", "state"], &["c", "st"]).unwrap();
    /// assert_eq!(schema.short_code("state"), Some("st"));
    ///
    /// let err = SchemaTable::from_columns(&["city", "state"], &["c"]).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the lists differ in length or fail the
    /// checks of [`SchemaTable::from_config`].
    pub fn from_columns<N, S>(names: &[N], shorts: &[S]) -> Result<Self>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        if names.len() != shorts.len() {
            return Err(Error::configuration(format!(
                "{} field names but {} short codes",
                names.len(),
                shorts.len()
            )));
        }
        let fields = names
            .iter()
            .zip(shorts)
            .map(|(n, s)| FieldConfig::new(n.as_ref(), s.as_ref(), FieldKind::Plain))
            .collect();
        Self::from_config(SchemaConfig {
            fields,
            roles: Vec::new(),
        })
    }

    fn assemble(config: SchemaConfig) -> Self {
        let mut table = SchemaTable {
            fields: Vec::new(),
            roots: Vec::new(),
            positions: Vec::new(),
            by_name: IndexMap::new(),
            by_short: IndexMap::new(),
            roles: IndexMap::new(),
            role_names: IndexMap::new(),
        };

        for decl in config.fields {
            let index = table.push(decl, None);
            table.roots.push(index);
        }
        for role in config.roles {
            table.role_names.insert(role.code, role.name.clone());
            table.roles.insert(role.name, role.code);
        }
        table
    }

    fn push(&mut self, decl: FieldConfig, parent: Option<usize>) -> usize {
        let index = self.fields.len();
        let position = if decl.kind == FieldKind::Group {
            None
        } else {
            self.positions.push(index);
            Some(self.positions.len() - 1)
        };

        self.by_name.insert(decl.name.clone(), index);
        self.by_short.insert(decl.short.clone(), index);
        self.fields.push(FieldDef {
            name: decl.name,
            short: decl.short,
            kind: decl.kind,
            parent,
            children: Vec::new(),
            position,
        });

        for child in decl.fields {
            let child_index = self.push(child, Some(index));
            self.fields[index].children.push(child_index);
        }
        index
    }

    /// Returns the short code for a full field name.
    #[must_use]
    pub fn short_code(&self, name: &str) -> Option<&str> {
        self.field(name).map(FieldDef::short)
    }

    /// Returns the full field name for a short code.
    #[must_use]
    pub fn full_name(&self, short: &str) -> Option<&str> {
        self.field_by_short(short).map(FieldDef::name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn field_by_short(&self, short: &str) -> Option<&FieldDef> {
        self.by_short.get(short).map(|&i| &self.fields[i])
    }

    /// Top-level fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.roots.iter().map(move |&i| &self.fields[i])
    }

    /// Child fields of a group in declaration order; empty for leaves.
    pub fn children<'a>(&'a self, field: &'a FieldDef) -> impl Iterator<Item = &'a FieldDef> + 'a {
        field.children.iter().map(move |&i| &self.fields[i])
    }

    /// The group a field is nested in, if any.
    #[must_use]
    pub fn parent(&self, field: &FieldDef) -> Option<&FieldDef> {
        field.parent.map(|i| &self.fields[i])
    }

    /// Dotted full name of a field, e.g. `address.street`.
    #[must_use]
    pub fn field_path(&self, field: &FieldDef) -> String {
        match self.parent(field) {
            Some(group) => format!("{}.{}", group.name(), field.name()),
            None => field.name().to_string(),
        }
    }

    /// The positional field whose dotted path is `path`.
    #[must_use]
    pub fn position_by_path(&self, path: &str) -> Option<&FieldDef> {
        self.positions().find(|f| self.field_path(f) == path)
    }

    /// Positional fields in wire order.
    pub fn positions(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.positions.iter().map(move |&i| &self.fields[i])
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn role_code(&self, role: &str) -> Option<u32> {
        self.roles.get(role).copied()
    }

    #[must_use]
    pub fn role_name(&self, code: u32) -> Option<&str> {
        self.role_names.get(&code).map(String::as_str)
    }

    /// Role names and codes in declaration order.
    pub fn roles(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.roles.iter().map(|(name, &code)| (name.as_str(), code))
    }

    /// Converts the table back into its declarative form.
    #[must_use]
    pub fn to_config(&self) -> SchemaConfig {
        fn decl(table: &SchemaTable, field: &FieldDef) -> FieldConfig {
            FieldConfig {
                name: field.name.clone(),
                short: field.short.clone(),
                kind: field.kind,
                fields: table.children(field).map(|c| decl(table, c)).collect(),
            }
        }

        SchemaConfig {
            fields: self.fields().map(|f| decl(self, f)).collect(),
            roles: self
                .roles()
                .map(|(name, code)| RoleConfig {
                    name: name.to_string(),
                    code,
                })
                .collect(),
        }
    }
}

impl Default for SchemaTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for custom [`SchemaTable`]s.
///
/// # Examples
///
/// ```rust
/// use serde_csf::{FieldKind, SchemaTable};
///
/// let schema = SchemaTable::builder()
///     .field("id", "i", FieldKind::Integer)
///     .group("geo", "g", |g| {
///         g.field("lat", "la", FieldKind::Plain)
///             .field("lon", "lo", FieldKind::Plain)
///     })
///     .field("roles", "r", FieldKind::Roles)
///     .role("viewer", 0)
///     .build()
///     .unwrap();
///
/// let wire: Vec<_> = schema.positions().map(|f| f.short()).collect();
/// assert_eq!(wire, vec!["i", "la", "lo", "r"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    config: SchemaConfig,
}

impl SchemaBuilder {
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, short: impl Into<String>, kind: FieldKind) -> Self {
        self.config.fields.push(FieldConfig::new(name, short, kind));
        self
    }

    /// Declares a nested object; its children take consecutive wire positions.
    #[must_use]
    pub fn group<F>(mut self, name: impl Into<String>, short: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(GroupBuilder) -> GroupBuilder,
    {
        let mut decl = FieldConfig::new(name, short, FieldKind::Group);
        decl.fields = build(GroupBuilder::default()).fields;
        self.config.fields.push(decl);
        self
    }

    #[must_use]
    pub fn role(mut self, name: impl Into<String>, code: u32) -> Self {
        self.config.roles.push(RoleConfig {
            name: name.into(),
            code,
        });
        self
    }

    /// Validates the declarations and builds the table.
    ///
    /// # Errors
    ///
    /// See [`SchemaTable::from_config`].
    pub fn build(self) -> Result<SchemaTable> {
        SchemaTable::from_config(self.config)
    }
}

/// Collects the children of a group declared through [`SchemaBuilder::group`].
#[derive(Clone, Debug, Default)]
pub struct GroupBuilder {
    fields: Vec<FieldConfig>,
}

impl GroupBuilder {
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, short: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldConfig::new(name, short, kind));
        self
    }
}

fn standard_config() -> SchemaConfig {
    let address = FieldConfig {
        fields: vec![
            FieldConfig::new("street", "s", FieldKind::Text),
            FieldConfig::new("city", "c", FieldKind::Plain),
            FieldConfig::new("state", "st", FieldKind::Plain),
            FieldConfig::new("zip_code", "z", FieldKind::Plain),
        ],
        ..FieldConfig::new("address", "ad", FieldKind::Group)
    };

    SchemaConfig {
        fields: vec![
            FieldConfig::new("id", "i", FieldKind::Integer),
            FieldConfig::new("name", "n", FieldKind::Text),
            FieldConfig::new("email", "e", FieldKind::Plain),
            FieldConfig::new("is_active", "ia", FieldKind::Bool),
            FieldConfig::new("age", "a", FieldKind::Integer),
            address,
            FieldConfig::new("phone_numbers", "pn", FieldKind::List),
            FieldConfig::new("roles", "r", FieldKind::Roles),
            FieldConfig::new("created_at", "ca", FieldKind::Plain),
        ],
        roles: vec![
            RoleConfig {
                name: "admin".to_string(),
                code: 0,
            },
            RoleConfig {
                name: "editor".to_string(),
                code: 1,
            },
        ],
    }
}

fn validate(config: &SchemaConfig) -> Result<()> {
    let mut names = IndexMap::new();
    let mut shorts = IndexMap::new();
    let mut positions = 0usize;

    fn visit(
        decl: &FieldConfig,
        nested: bool,
        names: &mut IndexMap<String, ()>,
        shorts: &mut IndexMap<String, ()>,
        positions: &mut usize,
    ) -> Result<()> {
        if decl.name.is_empty() {
            return Err(Error::configuration("field name must not be empty"));
        }
        if decl.short.is_empty() {
            return Err(Error::configuration(format!(
                "short code for `{}` must not be empty",
                decl.name
            )));
        }
        if let Some(ch) = decl.short.chars().find(|&c| is_reserved(c) || c.is_whitespace()) {
            return Err(Error::configuration(format!(
                "short code `{}` contains reserved character {:?}",
                decl.short, ch
            )));
        }
        if names.insert(decl.name.clone(), ()).is_some() {
            return Err(Error::configuration(format!(
                "duplicate field name `{}`",
                decl.name
            )));
        }
        if shorts.insert(decl.short.clone(), ()).is_some() {
            return Err(Error::configuration(format!(
                "duplicate short code `{}`",
                decl.short
            )));
        }

        match decl.kind {
            FieldKind::Group => {
                if nested {
                    return Err(Error::configuration(format!(
                        "group `{}` cannot be nested inside another group",
                        decl.name
                    )));
                }
                if decl.fields.is_empty() {
                    return Err(Error::configuration(format!(
                        "group `{}` declares no fields",
                        decl.name
                    )));
                }
                for child in &decl.fields {
                    visit(child, true, names, shorts, positions)?;
                }
            }
            _ => {
                if !decl.fields.is_empty() {
                    return Err(Error::configuration(format!(
                        "field `{}` is not a group but declares children",
                        decl.name
                    )));
                }
                *positions += 1;
            }
        }
        Ok(())
    }

    for decl in &config.fields {
        visit(decl, false, &mut names, &mut shorts, &mut positions)?;
    }
    if positions == 0 {
        return Err(Error::configuration("schema declares no positional fields"));
    }

    let mut role_names = IndexMap::new();
    let mut role_codes = IndexMap::new();
    for role in &config.roles {
        if role.name.is_empty() {
            return Err(Error::configuration("role name must not be empty"));
        }
        if let Some(ch) = role.name.chars().find(|&c| is_reserved(c)) {
            return Err(Error::configuration(format!(
                "role `{}` contains reserved character {:?}",
                role.name, ch
            )));
        }
        if role_names.insert(role.name.as_str(), ()).is_some() {
            return Err(Error::configuration(format!(
                "duplicate role name `{}`",
                role.name
            )));
        }
        if role_codes.insert(role.code, ()).is_some() {
            return Err(Error::configuration(format!(
                "duplicate role code {}",
                role.code
            )));
        }
    }
    Ok(())
}

fn is_reserved(c: char) -> bool {
    c == FIELD_DELIMITER || c == ITEM_DELIMITER
}
