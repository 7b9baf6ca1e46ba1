//! Observability: structured diagnostics from the compiler and sink
//! abstractions.
//!
//! Compilation logic MUST NOT print or log directly. Every dropped operator,
//! empty IN list, or discarded write field flows through [`Diagnostic`] and
//! [`DiagnosticSink`]; the SQL result is unchanged either way.

pub(crate) mod sink;

pub use sink::{CollectSink, DiagnosticSink, with_diagnostic_sink};

use serde::Serialize;

///
/// Diagnostic
///
/// One silently-dropped construct. The original input stays typo-compatible
/// (the drop still happens); the diagnostic makes it observable.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Diagnostic {
    /// An operator name outside the whitelist was skipped.
    UnknownOperator { field: String, operator: String },

    /// An IN/NOT IN condition with an empty list contributed nothing.
    EmptyInList { field: String },

    /// A write key absent from the schema was dropped.
    UnknownWriteField { table: String, field: String },
}
