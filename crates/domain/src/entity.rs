use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tudu_core::{AppError, AppResult, EntityId};

use crate::FormSchema;

/// Business record type managed through a REST resource.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Slice name used for action types and route lookup, e.g. `task`.
    const SLICE_NAME: &'static str;

    /// REST resource segment under `/api`, e.g. `tasks`.
    const RESOURCE: &'static str;

    /// Returns the backend-assigned identifier, absent before creation.
    fn id(&self) -> Option<EntityId>;

    /// Returns a copy carrying the given identifier.
    ///
    /// Fails when an identifier is already assigned.
    fn with_id(self, id: EntityId) -> AppResult<Self>;

    /// Returns the form configuration table of this entity type.
    fn form_schema() -> FormSchema;

    /// Validates required fields and enumerations before submission.
    fn validate(&self) -> AppResult<()> {
        let value = serde_json::to_value(self).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize {} for validation: {error}",
                Self::SLICE_NAME
            ))
        })?;
        Self::form_schema().validate(&value)
    }
}

pub(crate) fn assign_once(
    slot: &mut Option<EntityId>,
    id: EntityId,
    slice_name: &str,
) -> AppResult<()> {
    if let Some(existing) = slot {
        return Err(AppError::Validation(format!(
            "{slice_name} already has id '{existing}'"
        )));
    }

    *slot = Some(id);
    Ok(())
}
