use serde::{Deserialize, Serialize};

/// Whether an operation reads or writes the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    /// Toggles the `loading` flag.
    Read,
    /// Toggles the `updating` flag.
    Write,
}

/// Async operation kinds shared by every entity resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Paged collection fetch.
    List,
    /// Full-text search over the collection.
    Search,
    /// Single entity fetch.
    GetById,
    /// Entity creation.
    Create,
    /// Full replace.
    Update,
    /// Merge of present fields.
    PartialUpdate,
    /// Entity removal.
    Delete,
}

impl OperationKind {
    /// Every kind, reads first.
    pub const ALL: [Self; 7] = [
        Self::List,
        Self::Search,
        Self::GetById,
        Self::Create,
        Self::Update,
        Self::PartialUpdate,
        Self::Delete,
    ];

    /// Returns stable operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "fetch_entity_list",
            Self::Search => "search_entity",
            Self::GetById => "fetch_entity",
            Self::Create => "create_entity",
            Self::Update => "update_entity",
            Self::PartialUpdate => "partial_update_entity",
            Self::Delete => "delete_entity",
        }
    }

    /// Returns the flag this operation drives.
    #[must_use]
    pub fn phase(&self) -> OperationPhase {
        match self {
            Self::List | Self::Search | Self::GetById => OperationPhase::Read,
            Self::Create | Self::Update | Self::PartialUpdate | Self::Delete => {
                OperationPhase::Write
            }
        }
    }

    /// Returns whether success must be followed by a list refresh.
    #[must_use]
    pub fn invalidates_list(&self) -> bool {
        self.phase() == OperationPhase::Write
    }

    /// Returns the action type for a slice, e.g. `task/create_entity`.
    #[must_use]
    pub fn action_type(&self, slice_name: &str) -> String {
        format!("{slice_name}/{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationKind, OperationPhase};

    #[test]
    fn only_writes_invalidate_the_list() {
        let invalidating: Vec<OperationKind> = OperationKind::ALL
            .into_iter()
            .filter(OperationKind::invalidates_list)
            .collect();

        assert_eq!(
            invalidating,
            vec![
                OperationKind::Create,
                OperationKind::Update,
                OperationKind::PartialUpdate,
                OperationKind::Delete,
            ]
        );
    }

    #[test]
    fn search_is_a_read() {
        assert_eq!(OperationKind::Search.phase(), OperationPhase::Read);
    }

    #[test]
    fn action_type_is_prefixed_with_slice_name() {
        assert_eq!(
            OperationKind::PartialUpdate.action_type("userTasks"),
            "userTasks/partial_update_entity"
        );
    }
}
