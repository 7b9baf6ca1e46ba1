//! Per-table schema metadata: field specs, catalog construction (explicit
//! or introspected), primary-key discovery, views, and the shared registry.

mod catalog;
mod field;
mod registry;

pub use catalog::{SchemaCatalog, SchemaProvider, format_fields};
pub use field::{DisplayTemplate, FieldConfig, FieldSpec, FieldType, ForeignKey, TemplateConfig};
pub use registry::CatalogRegistry;
