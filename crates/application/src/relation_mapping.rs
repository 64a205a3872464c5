use serde::Serialize;
use serde_json::Value;
use tudu_core::{AppResult, EntityId};

/// Minimal relation shape sent to re-link an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdReference {
    /// Referenced identifier.
    pub id: EntityId,
}

/// Converts multi-select string ids into id-only references.
///
/// Empty entries are skipped; any other non-numeric entry is rejected.
pub fn map_id_list<S: AsRef<str>>(ids: &[S]) -> AppResult<Vec<IdReference>> {
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| !id.trim().is_empty())
        .map(|id| id.parse::<EntityId>().map(|id| IdReference { id }))
        .collect()
}

/// Picks the candidate whose identifier matches the chosen id.
///
/// Returns `None` when no candidates are loaded, nothing is chosen, or nothing matches.
#[must_use]
pub fn resolve_reference<'a, T, F>(
    candidates: Option<&'a [T]>,
    chosen: Option<&str>,
    id_of: F,
) -> Option<&'a T>
where
    F: Fn(&T) -> Option<EntityId>,
{
    let chosen = chosen.map(str::trim).filter(|chosen| !chosen.is_empty())?;
    candidates?.iter().find(|candidate| {
        id_of(candidate)
            .map(|id| id.to_string() == chosen)
            .unwrap_or(false)
    })
}

/// Reads the `id` of a serialized entity.
#[must_use]
pub fn json_id(value: &Value) -> Option<EntityId> {
    value.get("id").and_then(Value::as_i64).map(EntityId::new)
}
