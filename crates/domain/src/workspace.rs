use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tudu_core::{AppResult, EntityId};

use crate::entity::assign_once;
use crate::timestamp::wire_format;
use crate::{Entity, FieldKind, FieldSpec, FormSchema, Privilege, User};

/// Shared space grouping tasks and members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntityId>,
    /// Display name, required on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Default access level of the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege: Option<Privilege>,
    /// Members of the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
}

impl Workspace {
    /// Creates an unsaved workspace draft.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Entity for Workspace {
    const SLICE_NAME: &'static str = "workspace";
    const RESOURCE: &'static str = "workspaces";

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
                FieldSpec::required("name", FieldKind::Text),
                FieldSpec::optional("description", FieldKind::Text),
                FieldSpec::optional("createdAt", FieldKind::DateTime),
                FieldSpec::optional("updatedAt", FieldKind::DateTime),
                FieldSpec::optional(
                    "privilege",
                    FieldKind::Select {
                        values: Privilege::NAMES,
                        default: "VIEW",
                    },
                ),
                FieldSpec::optional("users", FieldKind::ManyRelation { target: "user" }),
            ],
        )
    }
}
