use crate::value::Value;

///
/// Predicate AST
///
/// Pure, schema-agnostic representation of boolean filter expressions.
/// Built by the parser from caller input; field validation and text
/// emission happen in later passes.
///

///
/// Logic
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    /// Case-insensitive match on "or"; anything else is And.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("or") {
            Self::Or
        } else {
            Self::And
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    IsNot,
    Like,
    NotLike,
    Regexp,
    NotRegexp,
}

impl CompareOp {
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
        }
    }
}

///
/// OperatorToken
///
/// Parser-level view of the operator whitelist. Names outside the
/// whitelist parse to nothing and the condition is skipped.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperatorToken {
    Compare(CompareOp),
    In { negated: bool },
    Between { negated: bool },
}

pub(crate) fn parse_operator(raw: &str) -> Option<OperatorToken> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();

    let token = match normalized.as_str() {
        "=" => OperatorToken::Compare(CompareOp::Eq),
        "!=" => OperatorToken::Compare(CompareOp::Ne),
        ">" => OperatorToken::Compare(CompareOp::Gt),
        ">=" => OperatorToken::Compare(CompareOp::Gte),
        "<" => OperatorToken::Compare(CompareOp::Lt),
        "<=" => OperatorToken::Compare(CompareOp::Lte),
        "IS" => OperatorToken::Compare(CompareOp::Is),
        "IS NOT" => OperatorToken::Compare(CompareOp::IsNot),
        "LIKE" => OperatorToken::Compare(CompareOp::Like),
        "NOT LIKE" => OperatorToken::Compare(CompareOp::NotLike),
        "REGEXP" | "RLIKE" => OperatorToken::Compare(CompareOp::Regexp),
        "NOTREGEXP" | "NOT RLIKE" => OperatorToken::Compare(CompareOp::NotRegexp),
        "IN" => OperatorToken::In { negated: false },
        "NOT IN" => OperatorToken::In { negated: true },
        "BETWEEN" => OperatorToken::Between { negated: false },
        "NOT BETWEEN" => OperatorToken::Between { negated: true },
        _ => return None,
    };

    Some(token)
}

///
/// Condition
///

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    In {
        field: String,
        negated: bool,
        values: Vec<Value>,
    },
    Between {
        field: String,
        negated: bool,
        low: Value,
        high: Value,
    },
    /// Bare fragment emitted verbatim (raw right-hand side).
    Fragment(String),
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    And(Vec<Self>),
    Or(Vec<Self>),
    Condition(Condition),
}

impl Predicate {
    /// Total leaf conditions. A top-level expression carrying none failed
    /// to parse.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().map(Self::condition_count).sum()
            }
            Self::Condition(_) => 1,
        }
    }
}

///
/// TESTS
///
