use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tudu_core::{AppError, AppResult};
use tudu_domain::timestamp::{default_form_value, from_form, from_wire, to_form, to_wire};
use tudu_domain::{Entity, FieldKind};

use crate::relation_mapping::{json_id, map_id_list, resolve_reference};

/// Form values keyed by field wire name.
pub type FormValues = Map<String, Value>;

/// Loaded candidate lists for single-valued relation pickers, keyed by target slice name.
#[derive(Debug, Clone, Default)]
pub struct RelationCandidates {
    by_target: HashMap<String, Vec<Value>>,
}

impl RelationCandidates {
    /// Creates an empty candidate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the loaded candidates of one target.
    pub fn insert<T: Serialize>(&mut self, target: &str, candidates: &[T]) -> AppResult<()> {
        let values = candidates
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to serialize '{target}' relation candidates: {error}"
                ))
            })?;
        self.by_target.insert(target.to_owned(), values);
        Ok(())
    }

    /// Returns the candidates of a target, when loaded.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<&[Value]> {
        self.by_target.get(target).map(Vec::as_slice)
    }
}

/// Builds the values a create or edit form starts from.
///
/// New forms only prefill date-time inputs with the start of today. Edit
/// forms apply select defaults, then the entity's own values, with
/// timestamps in form format and relations reduced to id strings.
pub fn initial_values<E: Entity>(entity: &E, is_new: bool, now: DateTime<Utc>) -> AppResult<FormValues> {
    let schema = E::form_schema();
    let mut values = FormValues::new();

    if is_new {
        for field in schema.fields() {
            if field.kind() == FieldKind::DateTime {
                values.insert(field.name().to_owned(), Value::String(default_form_value(now)));
            }
        }
        return Ok(values);
    }

    for field in schema.fields() {
        if let FieldKind::Select { default, .. } = field.kind() {
            values.insert(field.name().to_owned(), Value::String(default.to_owned()));
        }
    }

    let serialized = entity_object(entity)?;
    for (name, value) in serialized {
        if value.is_null() {
            continue;
        }
        let converted = match schema.field(name.as_str()).map(|field| field.kind()) {
            Some(FieldKind::DateTime) => match value.as_str() {
                Some(raw) => Value::String(to_form(&from_wire(raw)?)),
                None => Value::Null,
            },
            Some(FieldKind::OneRelation { .. }) => json_id(&value)
                .map(|id| Value::String(id.to_string()))
                .unwrap_or(Value::Null),
            Some(FieldKind::ManyRelation { .. }) => Value::Array(
                value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(json_id)
                            .map(|id| Value::String(id.to_string()))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            _ => value,
        };
        values.insert(name, converted);
    }

    Ok(values)
}

/// Merges a submitted draft over the current entity and returns the typed result.
///
/// Date-time inputs are converted to the wire format, many-valued relations
/// become id-only references and single-valued relations are replaced by
/// the matching loaded candidate, or cleared when none matches. The
/// identifier always comes from `base`.
pub fn submit<E: Entity>(base: &E, draft: &FormValues, candidates: &RelationCandidates) -> AppResult<E> {
    let entity = merge_draft(base, draft, candidates)?;
    entity.validate()?;
    Ok(entity)
}

/// Applies the conversions of [`submit`] without validating required fields.
///
/// Used for partial updates, where `base` only carries the identifier.
pub fn merge_draft<E: Entity>(
    base: &E,
    draft: &FormValues,
    candidates: &RelationCandidates,
) -> AppResult<E> {
    let schema = E::form_schema();
    let mut merged = entity_object(base)?;

    for (name, value) in draft {
        if name == "id" {
            continue;
        }
        let field = schema.field(name.as_str()).ok_or_else(|| {
            AppError::Validation(format!("{} has no field '{name}'", E::SLICE_NAME))
        })?;

        let converted = match field.kind() {
            FieldKind::Text => value.clone(),
            FieldKind::Select { .. } => match text_of(value) {
                Some(text) => Value::String(text.to_owned()),
                None => Value::Null,
            },
            FieldKind::DateTime => match text_of(value) {
                Some(text) => Value::String(to_wire(&from_form(text)?)),
                None => Value::Null,
            },
            FieldKind::ManyRelation { .. } => {
                let ids = id_strings(name, value)?;
                serde_json::to_value(map_id_list(ids.as_slice())?).map_err(|error| {
                    AppError::Internal(format!("failed to encode '{name}' references: {error}"))
                })?
            }
            FieldKind::OneRelation { target } => {
                resolve_reference(candidates.get(target), text_of(value), json_id)
                    .cloned()
                    .unwrap_or(Value::Null)
            }
        };
        merged.insert(name.clone(), converted);
    }

    serde_json::from_value::<E>(Value::Object(merged)).map_err(|error| {
        AppError::Validation(format!("invalid {} form values: {error}", E::SLICE_NAME))
    })
}

fn entity_object<E: Entity>(entity: &E) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(AppError::Internal(format!(
            "{} did not serialize to an object",
            E::SLICE_NAME
        ))),
        Err(error) => Err(AppError::Internal(format!(
            "failed to serialize {}: {error}",
            E::SLICE_NAME
        ))),
    }
}

fn text_of(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|text| !text.is_empty())
}

fn id_strings(name: &str, value: &Value) -> AppResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                Value::Number(number) => Ok(number.to_string()),
                _ => Err(AppError::Validation(format!(
                    "'{name}' must list ids as strings"
                ))),
            })
            .collect(),
        Value::String(text) => Ok(text.split(',').map(str::to_owned).collect()),
        _ => Err(AppError::Validation(format!(
            "'{name}' must be a list of ids"
        ))),
    }
}
