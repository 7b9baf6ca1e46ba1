use crate::{
    error::GrammarError,
    obs::{Diagnostic, sink},
    query::predicate::ast::{CompareOp, Condition, Logic, OperatorToken, Predicate, parse_operator},
    value::Value,
};

///
/// WhereExpr
///
/// Caller-facing filter grammar: a flat field→rhs group joined by an
/// entry-local logic, or a list of sub-expressions joined by a list-level
/// logic. Lowered into a [`Predicate`] by [`parse`].
///

#[derive(Clone, Debug, PartialEq)]
pub enum WhereExpr {
    Group {
        logic: Logic,
        entries: Vec<(String, Rhs)>,
    },
    List {
        logic: Logic,
        items: Vec<WhereExpr>,
    },
}

impl WhereExpr {
    /// Flat group joined with AND.
    #[must_use]
    pub fn group<N: Into<String>>(entries: Vec<(N, Rhs)>) -> Self {
        Self::Group {
            logic: Logic::And,
            entries: entries
                .into_iter()
                .map(|(name, rhs)| (name.into(), rhs))
                .collect(),
        }
    }

    /// Single-entry group.
    #[must_use]
    pub fn field(name: impl Into<String>, rhs: Rhs) -> Self {
        Self::group(vec![(name.into(), rhs)])
    }

    /// Sub-expressions joined with AND.
    #[must_use]
    pub const fn all(items: Vec<Self>) -> Self {
        Self::List {
            logic: Logic::And,
            items,
        }
    }

    /// Sub-expressions joined with OR.
    #[must_use]
    pub const fn any(items: Vec<Self>) -> Self {
        Self::List {
            logic: Logic::Or,
            items,
        }
    }

    /// Override the joining logic of this node.
    #[must_use]
    pub fn with_logic(mut self, logic: Logic) -> Self {
        match &mut self {
            Self::Group { logic: slot, .. } | Self::List { logic: slot, .. } => *slot = logic,
        }
        self
    }
}

///
/// Rhs
///
/// Right-hand side of one group entry: a scalar (implicit equality, or a
/// bare fragment when the value is raw) or an operator mapping with
/// stringly-typed names matched against the whitelist.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Rhs {
    Value(Value),
    Ops(Vec<(String, Value)>),
}

impl Rhs {
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    #[must_use]
    pub fn op(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ops(vec![(name.into(), value.into())])
    }

    #[must_use]
    pub fn ops<N: Into<String>, V: Into<Value>>(pairs: Vec<(N, V)>) -> Self {
        Self::Ops(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Lower a filter expression into a predicate.
///
/// Unknown operator names and empty IN lists are skipped (with a
/// diagnostic); a BETWEEN without exactly two values is a grammar error; a
/// top-level expression that lowers to zero conditions is a grammar error.
pub fn parse(expr: &WhereExpr) -> Result<Predicate, GrammarError> {
    let predicate = parse_node(expr)?;

    if predicate.condition_count() == 0 {
        return Err(GrammarError::EmptyFilter);
    }

    Ok(predicate)
}

fn parse_node(expr: &WhereExpr) -> Result<Predicate, GrammarError> {
    match expr {
        WhereExpr::Group { logic, entries } => parse_group(*logic, entries),
        WhereExpr::List { logic, items } => {
            let children = items
                .iter()
                .map(parse_node)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(combine(*logic, children))
        }
    }
}

fn parse_group(logic: Logic, entries: &[(String, Rhs)]) -> Result<Predicate, GrammarError> {
    let mut conditions = Vec::new();

    for (field, rhs) in entries {
        match rhs {
            // A raw scalar is a bare, un-equated fragment.
            Rhs::Value(Value::Raw(fragment)) => {
                conditions.push(Predicate::Condition(Condition::Fragment(fragment.clone())));
            }
            Rhs::Value(value) => {
                conditions.push(Predicate::Condition(Condition::Compare {
                    field: field.clone(),
                    op: CompareOp::Eq,
                    value: value.clone(),
                }));
            }
            Rhs::Ops(pairs) => {
                for (name, value) in pairs {
                    if let Some(condition) = parse_op_entry(field, name, value)? {
                        conditions.push(Predicate::Condition(condition));
                    }
                }
            }
        }
    }

    Ok(combine(logic, conditions))
}

fn parse_op_entry(
    field: &str,
    name: &str,
    value: &Value,
) -> Result<Option<Condition>, GrammarError> {
    let Some(token) = parse_operator(name) else {
        sink::record(Diagnostic::UnknownOperator {
            field: field.to_string(),
            operator: name.to_string(),
        });
        return Ok(None);
    };

    let condition = match token {
        OperatorToken::Compare(op) => Some(Condition::Compare {
            field: field.to_string(),
            op,
            value: value.clone(),
        }),
        OperatorToken::In { negated } => {
            let values = as_list(value);
            if values.is_empty() {
                sink::record(Diagnostic::EmptyInList {
                    field: field.to_string(),
                });
                None
            } else {
                Some(Condition::In {
                    field: field.to_string(),
                    negated,
                    values,
                })
            }
        }
        OperatorToken::Between { negated } => {
            let values = as_list(value);
            if values.len() != 2 {
                return Err(GrammarError::BetweenArity {
                    field: field.to_string(),
                    found: values.len(),
                });
            }

            let mut iter = values.into_iter();
            Some(Condition::Between {
                field: field.to_string(),
                negated,
                low: iter.next().unwrap_or(Value::Null),
                high: iter.next().unwrap_or(Value::Null),
            })
        }
    };

    Ok(condition)
}

/// IN accepts a singleton scalar; BETWEEN counts it as arity 1.
fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}

const fn combine(logic: Logic, children: Vec<Predicate>) -> Predicate {
    match logic {
        Logic::And => Predicate::And(children),
        Logic::Or => Predicate::Or(children),
    }
}

///
/// TESTS
///
