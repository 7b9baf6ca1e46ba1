//! ## Crate layout
//! - `core`: schema catalogs, the query-description compiler, the executor
//!   contract, model orchestration, and observability sinks.
//!
//! The `prelude` module mirrors the surface used inside application code.

pub use masondb_core as core;

pub use masondb_core::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use masondb_core::prelude::*;
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn prelude_compiles_a_query_end_to_end() {
        let catalog = SchemaCatalog::build(
            "user",
            "user_",
            vec![
                (
                    "user_id".to_string(),
                    FieldConfig {
                        ty: Some(FieldType::Integer),
                        primary: Some(true),
                        ..FieldConfig::default()
                    },
                ),
                (
                    "user_name".to_string(),
                    FieldConfig {
                        ty: Some(FieldType::String),
                        ..FieldConfig::default()
                    },
                ),
            ],
        );

        let compiler = crate::core::query::SqlCompiler::new(&catalog);
        let query = QueryDescription::new()
            .filter(WhereExpr::field("user_name", Rhs::value("alice")))
            .limit(Limit::count(1));

        let sql = compiler.select(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `user`.* FROM `user` WHERE (`user`.`user_name` = 'alice') LIMIT 1"
        );
    }

    #[test]
    fn version_is_exported() {
        assert!(!crate::VERSION.is_empty());
    }
}
