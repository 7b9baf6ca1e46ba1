//! SQL text emission: one compiler per statement family, all schema
//! validation against a [`SchemaProvider`], no hidden state. Compiling the
//! same description against the same catalog twice yields identical text.

mod literal;
mod write;

pub use literal::{escape_text, quote_identifier, text_literal};
pub use write::WriteAction;

use crate::{
    error::{Error, GrammarError, SchemaError},
    query::{
        description::{Clause, FieldExpr, Limit, ProjectionField, QueryDescription, SortDirection},
        predicate::{self, Condition, Predicate, WhereExpr},
    },
    schema::SchemaProvider,
    types::Timestamp,
    value::Value,
};

///
/// SqlCompiler
///
/// Pure function from (description, schema) to SQL text. All blocking I/O
/// and retry policy live behind the executor; the compiler never suspends,
/// never retries, and never returns partial SQL.
///

pub struct SqlCompiler<'a> {
    schema: &'a dyn SchemaProvider,
}

///
/// JoinClauses
/// Synthesized join text plus the projections it makes visible.
///

#[derive(Default)]
struct JoinClauses {
    sql: String,
    projection: Vec<String>,
}

impl<'a> SqlCompiler<'a> {
    #[must_use]
    pub const fn new(schema: &'a dyn SchemaProvider) -> Self {
        Self { schema }
    }

    pub fn select(&self, query: &QueryDescription) -> Result<String, Error> {
        // Joins run first so joined aliases are visible to the projection.
        let join = self.compile_joins(query.join.as_deref())?;
        let projection = self.compile_projection(
            query.fields.as_ref(),
            query.distinct.as_deref(),
            &join.projection,
        )?;

        let mut sql = format!("SELECT {projection} FROM {}", self.table_q());
        sql.push_str(&join.sql);
        self.append_filter(&mut sql, query.filter.as_ref())?;
        self.append_group(&mut sql, query.group.as_ref())?;
        self.append_having(&mut sql, query.having.as_ref())?;
        self.append_order(&mut sql, query.order.as_ref())?;
        Self::append_limit(&mut sql, query.limit.as_ref());

        Ok(sql)
    }

    pub fn insert(&self, data: &[(String, Value)], now: Timestamp) -> Result<String, Error> {
        let normalized = write::normalize(self.schema, data, WriteAction::Insert, now)?;

        let cols: Vec<String> = normalized
            .iter()
            .map(|(name, _)| quote_identifier(name))
            .collect();
        let vals = normalized
            .iter()
            .map(|(name, value)| self.literal(value, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_q(),
            cols.join(", "),
            vals.join(", ")
        ))
    }

    pub fn update(
        &self,
        data: &[(String, Value)],
        query: &QueryDescription,
        now: Timestamp,
    ) -> Result<String, Error> {
        let normalized = write::normalize(self.schema, data, WriteAction::Update, now)?;

        let sets = normalized
            .iter()
            .map(|(name, value)| {
                Ok(format!(
                    "{} = {}",
                    quote_identifier(name),
                    self.literal(value, name)?
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut sql = format!("UPDATE {} SET {}", self.table_q(), sets.join(", "));
        self.append_filter(&mut sql, query.filter.as_ref())?;
        self.append_order(&mut sql, query.order.as_ref())?;
        Self::append_limit(&mut sql, query.limit.as_ref());

        Ok(sql)
    }

    pub fn delete(&self, query: &QueryDescription) -> Result<String, Error> {
        let mut sql = format!("DELETE FROM {}", self.table_q());
        self.append_filter(&mut sql, query.filter.as_ref())?;
        self.append_order(&mut sql, query.order.as_ref())?;
        Self::append_limit(&mut sql, query.limit.as_ref());

        Ok(sql)
    }

    // ---- identifiers -----------------------------------------------------

    fn table_q(&self) -> String {
        quote_identifier(self.schema.table())
    }

    fn qualify_known(&self, name: &str) -> String {
        format!("{}.{}", self.table_q(), quote_identifier(name))
    }

    fn qualify(&self, name: &str) -> Result<String, Error> {
        if self.schema.contains(name) {
            Ok(self.qualify_known(name))
        } else {
            Err(SchemaError::unknown_field(self.schema.table(), name).into())
        }
    }

    // ---- joins -----------------------------------------------------------

    fn compile_joins(&self, fields: Option<&[String]>) -> Result<JoinClauses, Error> {
        let mut out = JoinClauses::default();
        let Some(fields) = fields else {
            return Ok(out);
        };

        for name in fields {
            let field = self
                .schema
                .field(name)
                .ok_or_else(|| SchemaError::unknown_field(self.schema.table(), name))?;

            // Join requests on non-foreign fields contribute nothing.
            let Some(fk) = &field.foreign else {
                continue;
            };

            let alias = format!("{name}_{}", fk.table);
            let alias_q = quote_identifier(&alias);

            out.sql.push_str(&format!(
                " LEFT JOIN {} AS {alias_q} ON {alias_q}.{}={}.{}",
                quote_identifier(&fk.table),
                quote_identifier(&fk.field),
                self.table_q(),
                quote_identifier(name),
            ));

            if fk.fields.is_empty() {
                out.projection.push(format!("{alias_q}.*"));
            } else {
                for remote in &fk.fields {
                    out.projection.push(format!(
                        "{alias_q}.{} AS {}",
                        quote_identifier(remote),
                        quote_identifier(&format!("{name}_{remote}")),
                    ));
                }
                if let Some(label) = &fk.label_field {
                    if !fk.fields.contains(label) {
                        out.projection.push(format!(
                            "{alias_q}.{} AS {}",
                            quote_identifier(label),
                            quote_identifier(&format!("{name}_{label}")),
                        ));
                    }
                }
            }
        }

        Ok(out)
    }

    // ---- projection ------------------------------------------------------

    fn compile_projection(
        &self,
        fields: Option<&Clause<Vec<ProjectionField>>>,
        distinct: Option<&[String]>,
        join_projection: &[String],
    ) -> Result<String, Error> {
        let mut prefix = "";
        let mut parts: Vec<String> = Vec::new();

        if let Some(list) = distinct {
            prefix = "DISTINCT ";
            for name in list {
                parts.push(self.qualify(name)?);
            }
        } else {
            match fields {
                None => parts.push(self.default_projection()),
                Some(Clause::Raw(fragment)) => parts.push(fragment.clone()),
                Some(Clause::Typed(list)) => {
                    for field in list {
                        parts.push(self.projection_field(field)?);
                    }
                }
            }
        }

        parts.extend(join_projection.iter().cloned());

        Ok(format!("{prefix}{}", parts.join(", ")))
    }

    /// The implicit projection. Virtual and disabled fields never appear in
    /// it, so a catalog carrying any expands to an explicit column list
    /// instead of `table.*`.
    fn default_projection(&self) -> String {
        let fields = self.schema.fields();

        if fields.iter().any(|f| f.is_virtual || !f.enable) {
            let parts: Vec<String> = fields
                .iter()
                .filter(|f| !f.is_virtual && f.enable)
                .map(|f| self.qualify_known(&f.name))
                .collect();

            if !parts.is_empty() {
                return parts.join(", ");
            }
        }

        format!("{}.*", self.table_q())
    }

    fn projection_field(&self, field: &ProjectionField) -> Result<String, Error> {
        match field {
            // Bare references pass through raw when schema-unknown, which is
            // how aggregate fragments enter an explicit projection.
            ProjectionField::Plain(name) => Ok(if self.schema.contains(name) {
                self.qualify_known(name)
            } else {
                name.clone()
            }),
            ProjectionField::Aliased { expr, alias } => Ok(format!(
                "{} AS {}",
                self.field_expr(expr)?,
                quote_identifier(alias)
            )),
        }
    }

    fn field_expr(&self, expr: &FieldExpr) -> Result<String, Error> {
        match expr {
            FieldExpr::Column(name) => self.qualify(name),
            FieldExpr::Aggregate { func, column } => {
                Ok(format!("{func}({})", self.qualify(column)?))
            }
            FieldExpr::Raw(fragment) => Ok(fragment.clone()),
        }
    }

    // ---- boolean clauses -------------------------------------------------

    fn bool_clause(&self, clause: &Clause<WhereExpr>) -> Result<String, Error> {
        match clause {
            Clause::Raw(fragment) => Ok(fragment.clone()),
            Clause::Typed(expr) => {
                let parsed = predicate::parse(expr).map_err(Error::Grammar)?;

                self.emit_predicate(&parsed)?
                    .ok_or(Error::Grammar(GrammarError::EmptyFilter))
            }
        }
    }

    fn emit_predicate(&self, predicate: &Predicate) -> Result<Option<String>, Error> {
        match predicate {
            Predicate::And(children) | Predicate::Or(children) => {
                let keyword = if matches!(predicate, Predicate::Or(_)) {
                    " OR "
                } else {
                    " AND "
                };

                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(text) = self.emit_predicate(child)? {
                        parts.push(text);
                    }
                }

                if parts.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(format!("({})", parts.join(keyword))))
                }
            }
            Predicate::Condition(condition) => self.emit_condition(condition).map(Some),
        }
    }

    fn emit_condition(&self, condition: &Condition) -> Result<String, Error> {
        match condition {
            Condition::Compare { field, op, value } => Ok(format!(
                "{} {} {}",
                self.qualify(field)?,
                op.sql(),
                self.literal(value, field)?
            )),
            Condition::In {
                field,
                negated,
                values,
            } => {
                let items = values
                    .iter()
                    .map(|value| self.literal(value, field))
                    .collect::<Result<Vec<_>, _>>()?;
                let keyword = if *negated { "NOT IN" } else { "IN" };

                Ok(format!(
                    "{} {keyword} ({})",
                    self.qualify(field)?,
                    items.join(", ")
                ))
            }
            Condition::Between {
                field,
                negated,
                low,
                high,
            } => {
                let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };

                Ok(format!(
                    "{} {keyword} {} AND {}",
                    self.qualify(field)?,
                    self.literal(low, field)?,
                    self.literal(high, field)?
                ))
            }
            Condition::Fragment(fragment) => Ok(fragment.clone()),
        }
    }

    // ---- literals --------------------------------------------------------

    /// Serialize one literal. `Column` references qualify against the
    /// schema when known and stay bare-quoted otherwise; `Raw` fragments
    /// are the caller's problem by type.
    fn literal(&self, value: &Value, field: &str) -> Result<String, Error> {
        let text = match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Uint(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => text_literal(s),
            Value::Column(name) => {
                if self.schema.contains(name) {
                    self.qualify_known(name)
                } else {
                    quote_identifier(name)
                }
            }
            Value::Raw(fragment) => fragment.clone(),
            Value::List(_) => {
                return Err(GrammarError::ScalarExpected {
                    field: field.to_string(),
                    found: value.type_name(),
                }
                .into());
            }
        };

        Ok(text)
    }

    // ---- trailing clauses ------------------------------------------------

    fn append_filter(
        &self,
        sql: &mut String,
        clause: Option<&Clause<WhereExpr>>,
    ) -> Result<(), Error> {
        if let Some(clause) = clause {
            sql.push_str(" WHERE ");
            sql.push_str(&self.bool_clause(clause)?);
        }
        Ok(())
    }

    fn append_having(
        &self,
        sql: &mut String,
        clause: Option<&Clause<WhereExpr>>,
    ) -> Result<(), Error> {
        if let Some(clause) = clause {
            sql.push_str(" HAVING ");
            sql.push_str(&self.bool_clause(clause)?);
        }
        Ok(())
    }

    fn append_group(
        &self,
        sql: &mut String,
        clause: Option<&Clause<Vec<String>>>,
    ) -> Result<(), Error> {
        if let Some(clause) = clause {
            sql.push_str(" GROUP BY ");
            match clause {
                Clause::Raw(fragment) => sql.push_str(fragment),
                Clause::Typed(fields) => {
                    let parts = fields
                        .iter()
                        .map(|field| self.qualify(field))
                        .collect::<Result<Vec<_>, _>>()?;
                    sql.push_str(&parts.join(", "));
                }
            }
        }
        Ok(())
    }

    fn append_order(
        &self,
        sql: &mut String,
        clause: Option<&Clause<Vec<(String, SortDirection)>>>,
    ) -> Result<(), Error> {
        if let Some(clause) = clause {
            sql.push_str(" ORDER BY ");
            match clause {
                Clause::Raw(fragment) => sql.push_str(fragment),
                Clause::Typed(fields) => {
                    let parts = fields
                        .iter()
                        .map(|(field, direction)| {
                            Ok(format!("{} {}", self.qualify(field)?, direction.keyword()))
                        })
                        .collect::<Result<Vec<_>, Error>>()?;
                    sql.push_str(&parts.join(", "));
                }
            }
        }
        Ok(())
    }

    fn append_limit(sql: &mut String, clause: Option<&Clause<Limit>>) {
        if let Some(clause) = clause {
            sql.push_str(" LIMIT ");
            match clause {
                Clause::Raw(fragment) => sql.push_str(fragment),
                Clause::Typed(limit) => match limit.offset {
                    Some(offset) => sql.push_str(&format!("{offset}, {}", limit.count)),
                    None => sql.push_str(&limit.count.to_string()),
                },
            }
        }
    }
}

///
/// TESTS
///
