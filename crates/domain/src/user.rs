use serde::{Deserialize, Serialize};
use tudu_core::EntityId;

/// Account reference owned by the user-management collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login: Option<String>,
}

impl User {
    /// Creates a full user reference.
    #[must_use]
    pub fn new(id: EntityId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: Some(login.into()),
        }
    }

    /// Creates the id-only reference sent when re-linking an association.
    #[must_use]
    pub fn reference(id: EntityId) -> Self {
        Self { id, login: None }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the login, when the backend included it.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }
}
