use crate::query::predicate::WhereExpr;
use std::fmt;

///
/// Clause
///
/// Every clause slot accepts a raw pass-through fragment or a structured
/// value that is compiled and validated against the catalog.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Clause<T> {
    /// Verbatim SQL fragment, emitted after the clause keyword.
    Raw(String),
    /// Structured value, compiled and schema-validated.
    Typed(T),
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Descending only on a case-insensitive match; anything else sorts
    /// ascending.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// Limit
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limit {
    pub offset: Option<u64>,
    pub count: u64,
}

impl Limit {
    #[must_use]
    pub const fn count(count: u64) -> Self {
        Self {
            offset: None,
            count,
        }
    }

    #[must_use]
    pub const fn offset(offset: u64, count: u64) -> Self {
        Self {
            offset: Some(offset),
            count,
        }
    }
}

///
/// Aggregate
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        };
        write!(f, "{label}")
    }
}

///
/// FieldExpr
///
/// Typed projection expression. Column references are schema-validated;
/// raw fragments pass through verbatim.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldExpr {
    Column(String),
    Aggregate { func: Aggregate, column: String },
    Raw(String),
}

impl FieldExpr {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    #[must_use]
    pub fn aggregate(func: Aggregate, column: impl Into<String>) -> Self {
        Self::Aggregate {
            func,
            column: column.into(),
        }
    }

    #[must_use]
    pub fn raw(fragment: impl Into<String>) -> Self {
        Self::Raw(fragment.into())
    }
}

///
/// ProjectionField
///

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionField {
    /// Bare reference: table-qualified and quoted when schema-known, else
    /// passed through raw (fragments, aggregates).
    Plain(String),
    /// `expr AS alias`.
    Aliased { expr: FieldExpr, alias: String },
}

impl ProjectionField {
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(name.into())
    }

    #[must_use]
    pub fn aliased(expr: FieldExpr, alias: impl Into<String>) -> Self {
        Self::Aliased {
            expr,
            alias: alias.into(),
        }
    }
}

///
/// QueryDescription
///
/// The structured query DSL consumed by the compiler. Absent clauses
/// contribute nothing to the generated text. Built by callers, consumed
/// once per compile.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryDescription {
    pub fields: Option<Clause<Vec<ProjectionField>>>,
    pub join: Option<Vec<String>>,
    pub filter: Option<Clause<WhereExpr>>,
    pub group: Option<Clause<Vec<String>>>,
    pub having: Option<Clause<WhereExpr>>,
    pub order: Option<Clause<Vec<(String, SortDirection)>>>,
    pub limit: Option<Clause<Limit>>,
    pub distinct: Option<Vec<String>>,
}

impl QueryDescription {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<ProjectionField>) -> Self {
        self.fields = Some(Clause::Typed(fields));
        self
    }

    #[must_use]
    pub fn raw_fields(mut self, fragment: impl Into<String>) -> Self {
        self.fields = Some(Clause::Raw(fragment.into()));
        self
    }

    #[must_use]
    pub fn join<N: Into<String>>(mut self, fields: Vec<N>) -> Self {
        self.join = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn filter(mut self, expr: WhereExpr) -> Self {
        self.filter = Some(Clause::Typed(expr));
        self
    }

    #[must_use]
    pub fn raw_filter(mut self, fragment: impl Into<String>) -> Self {
        self.filter = Some(Clause::Raw(fragment.into()));
        self
    }

    #[must_use]
    pub fn group<N: Into<String>>(mut self, fields: Vec<N>) -> Self {
        self.group = Some(Clause::Typed(
            fields.into_iter().map(Into::into).collect(),
        ));
        self
    }

    #[must_use]
    pub fn having(mut self, expr: WhereExpr) -> Self {
        self.having = Some(Clause::Typed(expr));
        self
    }

    #[must_use]
    pub fn raw_having(mut self, fragment: impl Into<String>) -> Self {
        self.having = Some(Clause::Raw(fragment.into()));
        self
    }

    #[must_use]
    pub fn order<N: Into<String>>(mut self, fields: Vec<(N, SortDirection)>) -> Self {
        self.order = Some(Clause::Typed(
            fields
                .into_iter()
                .map(|(name, dir)| (name.into(), dir))
                .collect(),
        ));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(Clause::Typed(limit));
        self
    }

    #[must_use]
    pub fn distinct<N: Into<String>>(mut self, fields: Vec<N>) -> Self {
        self.distinct = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

///
/// TESTS
///
