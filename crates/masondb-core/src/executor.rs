use crate::{error::ExecutionError, query::compile::quote_identifier, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One result row, keyed by column (or alias) name.
pub type Row = BTreeMap<String, Value>;

///
/// ColumnDef
///
/// Introspected column definition, as reported by the driver. Only consumed
/// when a catalog is built without explicit configuration.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub raw_type: String,
    pub unique: bool,
    pub notnull: bool,
    pub default: Value,
    pub primary: bool,
    pub autoinc: bool,
}

///
/// Executor
///
/// The single collaborator contract the core depends on. All blocking I/O
/// lives behind it; the compiler hands it finished SQL text and nothing
/// else.
///
/// Transaction nesting is reentrant-counted by the implementation: a nested
/// `begin` is a no-op, and `commit`/`rollback` only take effect at nesting
/// depth zero.
///

pub trait Executor {
    /// Quote one identifier for the target dialect.
    fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name)
    }

    /// Run a statement, returning the affected-row count.
    fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError>;

    /// Run a query, returning rows keyed by column name.
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, ExecutionError>;

    /// Run a query, returning rows as positional value lists.
    fn query_positional(&mut self, sql: &str) -> Result<Vec<Vec<Value>>, ExecutionError>;

    fn begin(&mut self) -> Result<(), ExecutionError>;

    fn commit(&mut self) -> Result<(), ExecutionError>;

    fn rollback(&mut self) -> Result<(), ExecutionError>;

    /// Introspect a table's column definitions.
    fn describe_columns(&mut self, table: &str) -> Result<Vec<ColumnDef>, ExecutionError>;

    /// Identifier generated by the last insert, when the driver reports one.
    fn last_insert_id(&mut self) -> Option<Value> {
        None
    }
}

///
/// TEST SUPPORT
///
