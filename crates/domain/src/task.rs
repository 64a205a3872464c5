use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tudu_core::{AppResult, EntityId};

use crate::entity::assign_once;
use crate::timestamp::wire_format;
use crate::{Entity, FieldKind, FieldSpec, FormSchema, Priority, Privilege, Status, User, Workspace};

/// Unit of work, optionally filed under a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntityId>,
    /// Short title, required on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deadline.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub due_date: Option<DateTime<Utc>>,
    /// Urgency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Free-form category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Default access level of the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege: Option<Privilege>,
    /// Owning workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,
    /// Assigned users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
}

impl Task {
    /// Creates an unsaved task draft.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

impl Entity for Task {
    const SLICE_NAME: &'static str = "task";
    const RESOURCE: &'static str = "tasks";

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
                FieldSpec::required("title", FieldKind::Text),
                FieldSpec::optional("description", FieldKind::Text),
                FieldSpec::optional("dueDate", FieldKind::DateTime),
                FieldSpec::optional(
                    "priority",
                    FieldKind::Select {
                        values: Priority::NAMES,
                        default: "LOW",
                    },
                ),
                FieldSpec::optional(
                    "status",
                    FieldKind::Select {
                        values: Status::NAMES,
                        default: "PENDING",
                    },
                ),
                FieldSpec::optional("category", FieldKind::Text),
                FieldSpec::optional("createdAt", FieldKind::DateTime),
                FieldSpec::optional("updatedAt", FieldKind::DateTime),
                FieldSpec::optional(
                    "privilege",
                    FieldKind::Select {
                        values: Privilege::NAMES,
                        default: "VIEW",
                    },
                ),
                FieldSpec::optional(
                    "workspace",
                    FieldKind::OneRelation {
                        target: "workspace",
                    },
                ),
                FieldSpec::optional("users", FieldKind::ManyRelation { target: "user" }),
            ],
        )
    }
}
