//! Table gateway: binds one catalog and one executor, compiles through
//! [`SqlCompiler`], and wraps mutations in transaction + lifecycle events.

mod event;

pub use event::{EventSink, ModelEvent, RecordingSink};

use crate::{
    error::Error,
    executor::{Executor, Row},
    query::{
        Aggregate, Clause, FieldExpr, Limit, ProjectionField, QueryDescription, SqlCompiler,
    },
    schema::{SchemaCatalog, SchemaProvider},
    types::{Clock, SystemClock},
    value::Value,
};
use std::{rc::Rc, sync::Arc};
use uuid::Uuid;

///
/// Model
///
/// One caller thread drives one compile-then-execute sequence to
/// completion; the catalog is shared and read-only here.
///
/// Mutations run `begin → begin-event → execute → after-event → commit`;
/// an execution failure rolls back and re-throws immediately, so commit is
/// unreachable after a rollback.
///

pub struct Model<X: Executor> {
    catalog: Arc<SchemaCatalog>,
    executor: X,
    clock: Box<dyn Clock>,
    sinks: Vec<Rc<dyn EventSink>>,
}

impl<X: Executor> Model<X> {
    #[must_use]
    pub fn new(catalog: Arc<SchemaCatalog>, executor: X) -> Self {
        Self {
            catalog,
            executor,
            clock: Box::new(SystemClock),
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_event_sink(mut self, sink: Rc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn executor(&self) -> &X {
        &self.executor
    }

    fn compiler(&self) -> SqlCompiler<'_> {
        SqlCompiler::new(self.catalog.as_ref())
    }

    fn fire(&self, event: &ModelEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }

    // ---- reads -----------------------------------------------------------

    pub fn select(&mut self, query: &QueryDescription) -> Result<Vec<Row>, Error> {
        let sql = self.compiler().select(query)?;

        self.executor.query(&sql).map_err(Error::Execution)
    }

    /// First matching row; forces `LIMIT 1`.
    pub fn first(&mut self, query: &QueryDescription) -> Result<Option<Row>, Error> {
        let mut query = query.clone();
        query.limit = Some(Clause::Typed(Limit::count(1)));

        Ok(self.select(&query)?.into_iter().next())
    }

    /// One column of the first matching row.
    pub fn field(
        &mut self,
        column: &str,
        query: &QueryDescription,
    ) -> Result<Option<Value>, Error> {
        let mut query = query.clone();
        query.fields = Some(Clause::Typed(vec![ProjectionField::aliased(
            FieldExpr::column(column),
            column,
        )]));
        query.limit = Some(Clause::Typed(Limit::count(1)));

        let sql = self.compiler().select(&query)?;
        let rows = self.executor.query_positional(&sql)?;

        Ok(rows.into_iter().next().and_then(|row| row.into_iter().next()))
    }

    /// Row count over the primary key.
    pub fn count(&mut self, query: &QueryDescription) -> Result<u64, Error> {
        let pk = self.catalog.primary_key()?.to_string();
        let value = self.aggregate(Aggregate::Count, &pk, query)?;

        Ok(value.as_ref().and_then(Value::as_u64).unwrap_or(0))
    }

    pub fn sum(&mut self, column: &str, query: &QueryDescription) -> Result<Option<Value>, Error> {
        self.aggregate(Aggregate::Sum, column, query)
    }

    pub fn avg(&mut self, column: &str, query: &QueryDescription) -> Result<Option<Value>, Error> {
        self.aggregate(Aggregate::Avg, column, query)
    }

    pub fn min(&mut self, column: &str, query: &QueryDescription) -> Result<Option<Value>, Error> {
        self.aggregate(Aggregate::Min, column, query)
    }

    pub fn max(&mut self, column: &str, query: &QueryDescription) -> Result<Option<Value>, Error> {
        self.aggregate(Aggregate::Max, column, query)
    }

    fn aggregate(
        &mut self,
        func: Aggregate,
        column: &str,
        query: &QueryDescription,
    ) -> Result<Option<Value>, Error> {
        let mut query = query.clone();
        query.fields = Some(Clause::Typed(vec![ProjectionField::aliased(
            FieldExpr::aggregate(func, column),
            func.to_string().to_ascii_lowercase(),
        )]));

        let sql = self.compiler().select(&query)?;
        let rows = self.executor.query_positional(&sql)?;

        Ok(rows.into_iter().next().and_then(|row| row.into_iter().next()))
    }

    // ---- mutations -------------------------------------------------------

    /// Insert one row. A string-typed primary key absent from the input is
    /// auto-generated as a UUIDv4. Returns the generated key, else the
    /// executor-reported id, else the affected count.
    pub fn insert(&mut self, data: Vec<(String, Value)>) -> Result<Value, Error> {
        let mut data = data;
        let mut generated = None;

        if let Ok(pk) = self.catalog.primary_key() {
            let pk = pk.to_string();
            let missing = !data.iter().any(|(name, _)| *name == pk);
            let textual = self
                .catalog
                .field(&pk)
                .is_some_and(|field| field.ty.is_textual());

            if missing && textual {
                let id = Uuid::new_v4().to_string();
                data.insert(0, (pk, Value::Text(id.clone())));
                generated = Some(id);
            }
        }

        let table = self.catalog.table().to_string();
        let sql = self.compiler().insert(&data, self.clock.now())?;

        let affected = self.execute_mutation(
            &sql,
            ModelEvent::InsertBegin {
                table: table.clone(),
                sql: sql.clone(),
            },
            ModelEvent::InsertAfter {
                table,
                sql: sql.clone(),
            },
        )?;

        let id = generated
            .map(Value::Text)
            .or_else(|| self.executor.last_insert_id())
            .unwrap_or(Value::Uint(affected));

        Ok(id)
    }

    /// Update matching rows, returning the affected count.
    pub fn update(
        &mut self,
        data: Vec<(String, Value)>,
        query: &QueryDescription,
    ) -> Result<u64, Error> {
        let table = self.catalog.table().to_string();
        let sql = self.compiler().update(&data, query, self.clock.now())?;

        self.execute_mutation(
            &sql,
            ModelEvent::UpdateBegin {
                table: table.clone(),
                sql: sql.clone(),
            },
            ModelEvent::UpdateAfter {
                table,
                sql: sql.clone(),
            },
        )
    }

    /// Delete matching rows, returning the affected count.
    pub fn delete(&mut self, query: &QueryDescription) -> Result<u64, Error> {
        let table = self.catalog.table().to_string();
        let sql = self.compiler().delete(query)?;

        self.execute_mutation(
            &sql,
            ModelEvent::DeleteBegin {
                table: table.clone(),
                sql: sql.clone(),
            },
            ModelEvent::DeleteAfter {
                table,
                sql: sql.clone(),
            },
        )
    }

    /// Shared transactional shape for all mutations.
    fn execute_mutation(
        &mut self,
        sql: &str,
        begin: ModelEvent,
        after: ModelEvent,
    ) -> Result<u64, Error> {
        self.executor.begin()?;
        self.fire(&begin);

        let affected = match self.executor.execute(sql) {
            Ok(count) => count,
            Err(err) => {
                // Abort before commit; a rollback failure cannot mask the
                // execution error.
                let _ = self.executor.rollback();
                return Err(err.into());
            }
        };

        self.fire(&after);
        self.executor.commit()?;

        Ok(affected)
    }
}
