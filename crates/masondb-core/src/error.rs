use crate::query::compile::WriteAction;
use thiserror::Error as ThisError;

///
/// Error
///
/// Umbrella error for compilation and execution. Compilation failures are
/// fail-fast: no partial SQL is ever returned once one is detected.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Grammar(#[from] GrammarError),

    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

///
/// SchemaError
///
/// A clause referenced something the catalog does not declare.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("unknown field '{field}' on table '{table}'")]
    UnknownField { table: String, field: String },

    #[error("table '{table}' has no primary key")]
    NoPrimaryKey { table: String },

    #[error("unknown view '{view}' on table '{table}'")]
    UnknownView { table: String, view: String },
}

impl SchemaError {
    pub(crate) fn unknown_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            table: table.into(),
            field: field.into(),
        }
    }
}

///
/// GrammarError
///
/// The query description itself is malformed, independent of any schema.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum GrammarError {
    #[error("BETWEEN on field '{field}' expects exactly 2 values, found {found}")]
    BetweenArity { field: String, found: usize },

    #[error("filter expression produced no conditions")]
    EmptyFilter,

    #[error("no writable fields remain for {action} on table '{table}'")]
    NoWritableFields { table: String, action: WriteAction },

    #[error("field '{field}' expects a scalar value, found {found}")]
    ScalarExpected {
        field: String,
        found: &'static str,
    },
}

///
/// ExecutionError
///
/// Driver-side failure surfaced unchanged from the executor. The compiler
/// never retries; retry policy belongs to the executor.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
