#![allow(dead_code)]

//! Shared test support: a scriptable executor double and fixture catalogs.

use masondb_core::{
    error::ExecutionError,
    executor::{ColumnDef, Executor, Row},
    schema::{FieldConfig, FieldType, ForeignKey, SchemaCatalog},
    value::Value,
};
use std::collections::VecDeque;

///
/// MockExecutor
///
/// Records every statement and transaction transition, plays back scripted
/// result sets, and injects execution failures. Transactions are
/// reentrant-counted: only depth-zero transitions reach the log.
///

#[derive(Debug, Default)]
pub struct MockExecutor {
    pub statements: Vec<String>,
    pub transitions: Vec<&'static str>,
    rows: VecDeque<Vec<Row>>,
    positional: VecDeque<Vec<Vec<Value>>>,
    affected: u64,
    last_id: Option<Value>,
    fail_execute: bool,
    depth: u32,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows.push_back(rows);
        self
    }

    pub fn with_positional(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.positional.push_back(rows);
        self
    }

    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub fn with_last_id(mut self, id: Value) -> Self {
        self.last_id = Some(id);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_execute = true;
        self
    }
}

impl Executor for MockExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError> {
        self.statements.push(sql.to_string());

        if self.fail_execute {
            return Err(ExecutionError::new("duplicate key"));
        }

        Ok(self.affected)
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.statements.push(sql.to_string());

        Ok(self.rows.pop_front().unwrap_or_default())
    }

    fn query_positional(&mut self, sql: &str) -> Result<Vec<Vec<Value>>, ExecutionError> {
        self.statements.push(sql.to_string());

        Ok(self.positional.pop_front().unwrap_or_default())
    }

    fn begin(&mut self) -> Result<(), ExecutionError> {
        if self.depth == 0 {
            self.transitions.push("begin");
        }
        self.depth += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ExecutionError> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.transitions.push("commit");
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ExecutionError> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.transitions.push("rollback");
        }
        Ok(())
    }

    fn describe_columns(&mut self, table: &str) -> Result<Vec<ColumnDef>, ExecutionError> {
        Err(ExecutionError::new(format!(
            "no scripted columns for '{table}'"
        )))
    }

    fn last_insert_id(&mut self) -> Option<Value> {
        self.last_id.clone()
    }
}

fn field(ty: FieldType) -> FieldConfig {
    FieldConfig {
        ty: Some(ty),
        ..FieldConfig::default()
    }
}

/// A blog-post table with an autoincrement key, a foreign key, auto
/// timestamps, and one virtual field.
pub fn post_catalog() -> SchemaCatalog {
    SchemaCatalog::build(
        "post",
        "post_",
        vec![
            (
                "post_id".to_string(),
                FieldConfig {
                    ty: Some(FieldType::Integer),
                    primary: Some(true),
                    autoinc: Some(true),
                    notnull: Some(true),
                    ..FieldConfig::default()
                },
            ),
            ("post_title".to_string(), field(FieldType::String)),
            ("post_views".to_string(), field(FieldType::Integer)),
            ("post_public".to_string(), field(FieldType::Boolean)),
            (
                "post_author_id".to_string(),
                FieldConfig {
                    ty: Some(FieldType::Integer),
                    foreign: Some(ForeignKey {
                        table: "users".to_string(),
                        field: "id".to_string(),
                        label_field: Some("name".to_string()),
                        fields: vec!["email".to_string()],
                    }),
                    ..FieldConfig::default()
                },
            ),
            (
                "post_word_count".to_string(),
                FieldConfig {
                    ty: Some(FieldType::Integer),
                    is_virtual: Some(true),
                    ..FieldConfig::default()
                },
            ),
            ("post_created".to_string(), field(FieldType::Integer)),
            ("post_updated".to_string(), field(FieldType::Integer)),
        ],
    )
}

/// A session table with a string primary key (UUID territory).
pub fn session_catalog() -> SchemaCatalog {
    SchemaCatalog::build(
        "session",
        "session_",
        vec![
            (
                "session_id".to_string(),
                FieldConfig {
                    ty: Some(FieldType::String),
                    primary: Some(true),
                    notnull: Some(true),
                    ..FieldConfig::default()
                },
            ),
            ("session_user".to_string(), field(FieldType::String)),
        ],
    )
}
