use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tudu_core::{AppResult, EntityId};

use crate::entity::assign_once;
use crate::timestamp::wire_format;
use crate::{Entity, FieldKind, FieldSpec, FormSchema, NotificationStatus, User};

/// Message addressed to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntityId>,
    /// Message body, required on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Delivery state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NotificationStatus>,
    /// Creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_format")]
    pub created_at: Option<DateTime<Utc>>,
    /// Recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Entity for Notification {
    const SLICE_NAME: &'static str = "notification";
    const RESOURCE: &'static str = "notifications";

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
                FieldSpec::required("message", FieldKind::Text),
                FieldSpec::optional(
                    "status",
                    FieldKind::Select {
                        values: NotificationStatus::NAMES,
                        default: "UNREAD",
                    },
                ),
                FieldSpec::optional("createdAt", FieldKind::DateTime),
                FieldSpec::optional("user", FieldKind::OneRelation { target: "user" }),
            ],
        )
    }
}
