//! Core runtime for MasonDB: per-table schema catalogs, the
//! query-description compiler, the executor contract, model orchestration,
//! and the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod error;
pub mod executor;
pub mod model;
pub mod obs;
pub mod query;
pub mod schema;
pub mod types;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::Model,
        query::{
            Aggregate, Clause, FieldExpr, Limit, Logic, ProjectionField, QueryDescription, Rhs,
            SortDirection, WhereExpr,
        },
        schema::{FieldConfig, FieldType, ForeignKey, SchemaCatalog, SchemaProvider},
        value::Value,
    };
}
