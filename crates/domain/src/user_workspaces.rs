use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tudu_core::{AppResult, EntityId};

use crate::entity::assign_once;
use crate::timestamp::wire_format;
use crate::{Entity, FieldKind, FieldSpec, FormSchema, User, Workspace};

/// Per-user privilege on one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkspaces {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntityId>,
    /// Granted access level as free text, e.g. `VIEW`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege: Option<String>,
    /// Grant instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub created_at: Option<DateTime<Utc>>,
    /// Grantee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Workspace the grant applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,
}

impl Entity for UserWorkspaces {
    const SLICE_NAME: &'static str = "userWorkspaces";
    const RESOURCE: &'static str = "user-workspaces";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn with_id(mut self, id: EntityId) -> AppResult<Self> {
        assign_once(&mut self.id, id, Self::SLICE_NAME)?;
        Ok(self)
    }

    fn form_schema() -> FormSchema {
        FormSchema::new(
            Self::SLICE_NAME,
            vec![
                FieldSpec::optional("privilege", FieldKind::Text),
                FieldSpec::optional("createdAt", FieldKind::DateTime),
                FieldSpec::optional("user", FieldKind::OneRelation { target: "user" }),
                FieldSpec::optional(
                    "workspace",
                    FieldKind::OneRelation {
                        target: "workspace",
                    },
                ),
            ],
        )
    }
}
