use crate::{
    error::{Error, SchemaError},
    executor::{ColumnDef, Executor},
    schema::field::{FieldConfig, FieldSpec},
};
use std::collections::BTreeMap;

///
/// SchemaProvider
///
/// Capability surface the compiler depends on: table identity, ordered
/// field metadata, and the discovered primary key. Implemented per concrete
/// table binding; the compiler never reaches for shared static state.
///

pub trait SchemaProvider {
    fn table(&self) -> &str;

    fn fields(&self) -> &[FieldSpec];

    fn primary_key(&self) -> Result<&str, SchemaError>;

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

///
/// SchemaCatalog
///
/// Per-table field metadata, built once per binding and read-only during
/// compilation. Field order is preserved from configuration (after the
/// sort-key ordering pass) and drives default projection order.
///

#[derive(Clone, Debug)]
pub struct SchemaCatalog {
    table: String,
    prefix: String,
    fields: Vec<FieldSpec>,
    primary_key: Option<String>,
    views: BTreeMap<String, Vec<String>>,
}

impl SchemaCatalog {
    /// Build from explicit per-field configuration.
    #[must_use]
    pub fn build(
        table: impl Into<String>,
        prefix: impl Into<String>,
        configs: Vec<(String, FieldConfig)>,
    ) -> Self {
        let prefix = prefix.into();
        let mut fields = format_fields(configs, &prefix);
        let primary_key = discover_primary_key(&mut fields);

        Self {
            table: table.into(),
            prefix,
            fields,
            primary_key,
            views: BTreeMap::new(),
        }
    }

    /// Build by introspecting column definitions through the executor.
    pub fn introspect(
        table: impl Into<String>,
        prefix: impl Into<String>,
        executor: &mut dyn Executor,
    ) -> Result<Self, Error> {
        let table = table.into();
        let configs = executor
            .describe_columns(&table)?
            .into_iter()
            .map(|col| {
                let name = col.name.clone();
                (name, column_config(col))
            })
            .collect();

        Ok(Self::build(table, prefix, configs))
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a named view: an alternate field subset for scoped
    /// projection and validation.
    pub fn define_view(
        &mut self,
        name: impl Into<String>,
        fields: Vec<String>,
    ) -> Result<(), SchemaError> {
        for field in &fields {
            if !self.contains(field) {
                return Err(SchemaError::unknown_field(&self.table, field));
            }
        }

        self.views.insert(name.into(), fields);
        Ok(())
    }

    /// Materialize a view as a subset catalog over the same table.
    pub fn view(&self, name: &str) -> Result<Self, SchemaError> {
        let members = self.views.get(name).ok_or_else(|| SchemaError::UnknownView {
            table: self.table.clone(),
            view: name.to_string(),
        })?;

        let fields: Vec<FieldSpec> = self
            .fields
            .iter()
            .filter(|f| members.contains(&f.name))
            .cloned()
            .collect();

        let primary_key = self
            .primary_key
            .as_ref()
            .filter(|pk| members.contains(pk))
            .cloned();

        Ok(Self {
            table: self.table.clone(),
            prefix: self.prefix.clone(),
            fields,
            primary_key,
            views: BTreeMap::new(),
        })
    }
}

impl SchemaProvider for SchemaCatalog {
    fn table(&self) -> &str {
        &self.table
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn primary_key(&self) -> Result<&str, SchemaError> {
        self.primary_key
            .as_deref()
            .ok_or_else(|| SchemaError::NoPrimaryKey {
                table: self.table.clone(),
            })
    }
}

/// Normalize loose configuration into ordered field specs: stable sort
/// descending by sort key (ties keep configuration order), defaults filled,
/// auto flags re-derived, declared defaults coerced.
#[must_use]
pub fn format_fields(configs: Vec<(String, FieldConfig)>, prefix: &str) -> Vec<FieldSpec> {
    let mut fields: Vec<FieldSpec> = configs
        .into_iter()
        .map(|(name, config)| config.into_spec(&name, prefix))
        .collect();

    fields.sort_by(|a, b| b.sort.cmp(&a.sort));

    fields
}

/// The first field seen with `primary` set becomes the table's primary key
/// for the catalog's lifetime. The key never takes manual updates, and
/// autoincrement keys never take manual inserts either.
fn discover_primary_key(fields: &mut [FieldSpec]) -> Option<String> {
    let field = fields.iter_mut().find(|f| f.primary)?;

    field.updatable = false;
    if field.autoinc {
        field.insertable = false;
    }

    Some(field.name.clone())
}

fn column_config(col: ColumnDef) -> FieldConfig {
    FieldConfig {
        raw_type: Some(col.raw_type),
        unique: Some(col.unique),
        notnull: Some(col.notnull),
        primary: Some(col.primary),
        autoinc: Some(col.autoinc),
        default: (!col.default.is_null()).then_some(col.default),
        ..FieldConfig::default()
    }
}

///
/// TESTS
///
