//! Query surface: the structured description DSL, the boolean filter
//! grammar, and the SQL compiler.

pub mod compile;
pub mod description;
pub mod predicate;

pub use compile::SqlCompiler;
pub use description::{
    Aggregate, Clause, FieldExpr, Limit, ProjectionField, QueryDescription, SortDirection,
};
pub use predicate::{Logic, Rhs, WhereExpr};
