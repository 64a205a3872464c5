use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tudu_core::AppError;

/// Access level granted to a user on a task or workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    /// Read-only access.
    View,
    /// Read and write access.
    Edit,
    /// Full control including membership changes.
    Admin,
}

impl Privilege {
    /// Wire values accepted for this enumeration.
    pub const NAMES: &'static [&'static str] = &["VIEW", "EDIT", "ADMIN"];

    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for Privilege {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "VIEW" => Ok(Self::View),
            "EDIT" => Ok(Self::Edit),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown privilege '{value}'"))),
        }
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Wire values accepted for this enumeration.
    pub const NAMES: &'static [&'static str] = &["LOW", "MEDIUM", "HIGH"];

    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(AppError::Validation(format!("unknown priority '{value}'"))),
        }
    }
}

/// Task progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Not started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl Status {
    /// Wire values accepted for this enumeration.
    pub const NAMES: &'static [&'static str] = &["PENDING", "IN_PROGRESS", "DONE"];

    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(AppError::Validation(format!("unknown status '{value}'"))),
        }
    }
}

/// Delivery state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Not yet seen by the recipient.
    Unread,
    /// Seen by the recipient.
    Read,
}

impl NotificationStatus {
    /// Wire values accepted for this enumeration.
    pub const NAMES: &'static [&'static str] = &["UNREAD", "READ"];

    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "UNREAD",
            Self::Read => "READ",
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UNREAD" => Ok(Self::Unread),
            "READ" => Ok(Self::Read),
            _ => Err(AppError::Validation(format!(
                "unknown notification status '{value}'"
            ))),
        }
    }
}

macro_rules! display_as_wire_value {
    ($($name:ty),+) => {
        $(
            impl Display for $name {
                fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                    formatter.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_wire_value!(Privilege, Priority, Status, NotificationStatus);

#[cfg(test)]
mod tests {
    use super::{NotificationStatus, Priority, Privilege, Status};

    #[test]
    fn names_round_trip_through_from_str() {
        for name in Privilege::NAMES {
            assert_eq!(name.parse::<Privilege>().map(|value| value.as_str()), Ok(*name));
        }
        for name in Priority::NAMES {
            assert_eq!(name.parse::<Priority>().map(|value| value.as_str()), Ok(*name));
        }
        for name in Status::NAMES {
            assert_eq!(name.parse::<Status>().map(|value| value.as_str()), Ok(*name));
        }
        for name in NotificationStatus::NAMES {
            assert_eq!(
                name.parse::<NotificationStatus>().map(|value| value.as_str()),
                Ok(*name)
            );
        }
    }

    #[test]
    fn lowercase_values_are_rejected() {
        assert!("view".parse::<Privilege>().is_err());
        assert!("in_progress".parse::<Status>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let encoded = serde_json::to_string(&Status::InProgress).unwrap_or_default();
        assert_eq!(encoded, "\"IN_PROGRESS\"");

        let decoded = serde_json::from_str::<Priority>("\"URGENT\"");
        assert!(decoded.is_err());
    }
}
