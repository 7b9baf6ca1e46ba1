use crate::{
    error::{Error, GrammarError},
    obs::{Diagnostic, sink},
    schema::{FieldSpec, SchemaProvider},
    types::Timestamp,
    value::Value,
};
use std::fmt;

///
/// WriteAction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteAction {
    Insert,
    Update,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Insert => "insert",
            Self::Update => "update",
        };
        write!(f, "{label}")
    }
}

impl WriteAction {
    const fn allows(self, field: &FieldSpec) -> bool {
        match self {
            Self::Insert => field.insertable,
            Self::Update => field.updatable,
        }
    }
}

/// Normalize caller-supplied write data for one action.
///
/// Input order is preserved; back-filled defaults and auto timestamps are
/// appended in schema order. Keys absent from the schema are dropped with a
/// diagnostic; fields whose spec disables the action (or that are virtual
/// or disabled) are dropped silently; surviving values are coerced to the
/// declared type. Zero surviving fields is a grammar error.
pub(crate) fn normalize(
    schema: &dyn SchemaProvider,
    data: &[(String, Value)],
    action: WriteAction,
    now: Timestamp,
) -> Result<Vec<(String, Value)>, Error> {
    let mut out: Vec<(String, Value)> = Vec::with_capacity(data.len());

    for (name, value) in data {
        let Some(field) = schema.field(name) else {
            sink::record(Diagnostic::UnknownWriteField {
                table: schema.table().to_string(),
                field: name.clone(),
            });
            continue;
        };

        if field.is_virtual || !field.enable || field.is_auto() || !action.allows(field) {
            continue;
        }

        let coerced = value
            .clone()
            .coerce(field.ty, name)
            .map_err(Error::Grammar)?;
        out.push((name.clone(), coerced));
    }

    if matches!(action, WriteAction::Insert) {
        backfill_defaults(schema, &mut out);
    }

    // Zero surviving caller fields is an error even though auto stamps
    // would still have something to write.
    if out.is_empty() {
        return Err(GrammarError::NoWritableFields {
            table: schema.table().to_string(),
            action,
        }
        .into());
    }

    stamp_auto_fields(schema, action, now, &mut out);

    Ok(out)
}

/// On insert, a notnull field that arrived absent or empty takes its
/// declared default when one exists.
fn backfill_defaults(schema: &dyn SchemaProvider, out: &mut Vec<(String, Value)>) {
    for field in schema.fields() {
        if !field.notnull
            || field.default.is_null()
            || field.is_virtual
            || !field.enable
            || field.is_auto()
            || !field.insertable
        {
            continue;
        }

        match out.iter_mut().find(|(name, _)| *name == field.name) {
            Some((_, value)) if value.is_empty() => {
                *value = field.default.clone();
            }
            Some(_) => {}
            None => out.push((field.name.clone(), field.default.clone())),
        }
    }
}

/// Auto-timestamp fields are owned by the runtime: `created` fields are
/// stamped on insert, `updated` fields on both actions, regardless of any
/// caller-supplied value (those were already dropped above).
fn stamp_auto_fields(
    schema: &dyn SchemaProvider,
    action: WriteAction,
    now: Timestamp,
    out: &mut Vec<(String, Value)>,
) {
    for field in schema.fields() {
        if field.is_virtual || !field.enable {
            continue;
        }

        let stamp = match action {
            WriteAction::Insert => field.created || field.updated,
            WriteAction::Update => field.updated,
        };

        if stamp {
            out.push((field.name.clone(), Value::Uint(now.get())));
        }
    }
}

///
/// TESTS
///
