use crate::value::Value;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldType
///
/// Canonical semantic column types. Raw driver type strings are mapped onto
/// these by case-insensitive prefix; anything unrecognized keeps its raw
/// string and is treated as text for literal purposes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Text,
    Tinyint,
}

impl FieldType {
    /// Map a raw column-type string (`varchar(100)`, `INT(11)`, ...) to a
    /// canonical type and optional length. Unrecognized strings map to
    /// nothing; the caller keeps them as-is.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<(Self, Option<u32>)> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();

        // tinyint before int: prefix match.
        let ty = if lower.starts_with("varchar") {
            Self::String
        } else if lower.starts_with("tinyint") {
            Self::Tinyint
        } else if lower.starts_with("int") {
            Self::Integer
        } else if lower.starts_with("text") {
            Self::Text
        } else {
            return None;
        };

        Some((ty, parse_length(trimmed)))
    }

    /// String-typed columns take quoted literals and UUID primary keys.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Tinyint => "tinyint",
        };
        write!(f, "{label}")
    }
}

fn parse_length(raw: &str) -> Option<u32> {
    let open = raw.find('(')?;
    let close = raw.find(')')?;
    raw.get(open + 1..close)?.trim().parse().ok()
}

///
/// DisplayTemplate
///
/// Rendering hints for admin/form surfaces. Not consulted by the compiler.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DisplayTemplate {
    pub kind: String,
    pub control: String,
}

impl Default for DisplayTemplate {
    fn default() -> Self {
        Self {
            kind: "text".to_string(),
            control: "text".to_string(),
        }
    }
}

///
/// TemplateConfig
/// Loose template options, normalized into [`DisplayTemplate`].
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub control: Option<String>,
}

impl TemplateConfig {
    fn into_template(self) -> DisplayTemplate {
        let defaults = DisplayTemplate::default();

        DisplayTemplate {
            kind: self.kind.unwrap_or(defaults.kind),
            control: self.control.unwrap_or(defaults.control),
        }
    }
}

///
/// ForeignKey
///
/// Join metadata: target table/field, an optional label column on the
/// target, and the remote fields to project through the join.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKey {
    pub table: String,
    pub field: String,
    pub label_field: Option<String>,
    pub fields: Vec<String>,
}

///
/// FieldConfig
///
/// Loose per-field options as supplied by explicit schema configuration or
/// introspection. Every option is absent-able; [`FieldConfig::into_spec`]
/// fills the defaults table. Serde enforces option typing strictly, so a
/// string where a bool belongs fails at deserialization.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub ty: Option<FieldType>,
    /// Raw driver type string, mapped by prefix when `type` is absent.
    pub raw_type: Option<String>,
    pub length: Option<u32>,
    pub label: Option<String>,
    pub unique: Option<bool>,
    pub notnull: Option<bool>,
    pub primary: Option<bool>,
    pub autoinc: Option<bool>,
    pub enable: Option<bool>,
    #[serde(rename = "virtual")]
    pub is_virtual: Option<bool>,
    #[serde(alias = "create")]
    pub insertable: Option<bool>,
    #[serde(alias = "update")]
    pub updatable: Option<bool>,
    pub created: Option<bool>,
    pub updated: Option<bool>,
    pub deleted: Option<bool>,
    pub sort: Option<i32>,
    pub default: Option<Value>,
    pub template: Option<TemplateConfig>,
    pub foreign: Option<ForeignKey>,
}

impl FieldConfig {
    /// Normalize into a [`FieldSpec`], filling every missing option from the
    /// defaults table and applying the `{prefix}created/updated/deleted`
    /// naming convention.
    #[must_use]
    pub fn into_spec(self, name: &str, prefix: &str) -> FieldSpec {
        let (mapped_ty, mapped_len) = self
            .raw_type
            .as_deref()
            .and_then(FieldType::from_raw)
            .map_or((None, None), |(ty, len)| (Some(ty), len));

        let ty = self.ty.or(mapped_ty).unwrap_or(FieldType::Text);
        let length = self.length.or(mapped_len);

        let label = self
            .label
            .unwrap_or_else(|| derive_label(name, prefix));

        let mut created = self.created.unwrap_or(false);
        let mut updated = self.updated.unwrap_or(false);
        let mut deleted = self.deleted.unwrap_or(false);

        // Convention fields are stamped by the runtime, never by callers.
        if name == format!("{prefix}created") {
            created = true;
        }
        if name == format!("{prefix}updated") {
            updated = true;
        }
        if name == format!("{prefix}deleted") {
            deleted = true;
        }

        let auto = created || updated || deleted;
        let insertable = !auto && self.insertable.unwrap_or(true);
        let updatable = !auto && self.updatable.unwrap_or(true);

        let default = match self.default {
            Some(value) if matches!(
                ty,
                FieldType::Integer | FieldType::Tinyint | FieldType::Float | FieldType::Boolean
            ) =>
            {
                value.coerce(ty, name).unwrap_or(Value::Null)
            }
            Some(value) => value,
            None => Value::Null,
        };

        FieldSpec {
            name: name.to_string(),
            ty,
            raw_type: self.raw_type,
            length,
            label,
            unique: self.unique.unwrap_or(false),
            notnull: self.notnull.unwrap_or(false),
            primary: self.primary.unwrap_or(false),
            autoinc: self.autoinc.unwrap_or(false),
            enable: self.enable.unwrap_or(true),
            is_virtual: self.is_virtual.unwrap_or(false),
            insertable,
            updatable,
            created,
            updated,
            deleted,
            sort: self.sort.unwrap_or(0),
            default,
            template: self.template.unwrap_or_default().into_template(),
            foreign: self.foreign,
        }
    }
}

///
/// FieldSpec
///
/// Normalized per-field metadata. Read-only after catalog construction.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: FieldType,
    pub raw_type: Option<String>,
    pub length: Option<u32>,
    pub label: String,
    pub unique: bool,
    pub notnull: bool,
    pub primary: bool,
    pub autoinc: bool,
    pub enable: bool,
    pub is_virtual: bool,
    pub insertable: bool,
    pub updatable: bool,
    pub created: bool,
    pub updated: bool,
    pub deleted: bool,
    pub sort: i32,
    pub default: Value,
    pub template: DisplayTemplate,
    pub foreign: Option<ForeignKey>,
}

impl FieldSpec {
    #[must_use]
    pub const fn is_foreign(&self) -> bool {
        self.foreign.is_some()
    }

    /// Auto-stamped fields are owned by the runtime.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        self.created || self.updated || self.deleted
    }
}

/// Derive a display label from a field name: `{prefix}id` is "ID", anything
/// else drops the prefix and underscores and goes Title Case.
fn derive_label(name: &str, prefix: &str) -> String {
    let stripped = name.strip_prefix(prefix).unwrap_or(name);

    if stripped == "id" {
        "ID".to_string()
    } else {
        stripped.replace('_', " ").to_case(Case::Title)
    }
}

///
/// TESTS
///
