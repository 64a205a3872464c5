use serde::Serialize;
use tudu_core::SerializedError;
use tudu_domain::Entity;

use crate::{OperationKind, OperationPhase, Page};

/// Request lifecycle event applied to an [`EntityState`].
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent<E> {
    /// An operation was dispatched.
    Pending(OperationKind),
    /// A list or search completed.
    PageLoaded(Page<E>),
    /// A get-by-id completed.
    EntityLoaded(E),
    /// A create, update or partial update completed.
    EntitySaved(E),
    /// A delete completed.
    Deleted,
    /// An operation failed.
    Rejected {
        /// Failed operation.
        kind: OperationKind,
        /// Normalized failure detail.
        error: SerializedError,
    },
    /// Forced return to the initial state.
    Reset,
}

/// Remote-fetch status and cached data of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<E> {
    loading: bool,
    updating: bool,
    update_success: bool,
    error_message: Option<SerializedError>,
    entities: Vec<E>,
    entity: E,
    total_items: u64,
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
            entities: Vec::new(),
            entity: E::default(),
            total_items: 0,
        }
    }
}

impl<E: Entity> EntityState<E> {
    /// Returns the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one lifecycle transition.
    pub fn apply(&mut self, event: LifecycleEvent<E>) {
        match event {
            LifecycleEvent::Pending(kind) => {
                self.error_message = None;
                self.update_success = false;
                match kind.phase() {
                    OperationPhase::Read => self.loading = true,
                    OperationPhase::Write => self.updating = true,
                }
            }
            LifecycleEvent::PageLoaded(page) => {
                self.loading = false;
                self.entities = page.items;
                self.total_items = page.total_items;
            }
            LifecycleEvent::EntityLoaded(entity) => {
                self.loading = false;
                self.entity = entity;
            }
            LifecycleEvent::EntitySaved(entity) => {
                self.updating = false;
                self.loading = false;
                self.update_success = true;
                self.entity = entity;
            }
            LifecycleEvent::Deleted => {
                self.updating = false;
                self.update_success = true;
                self.entity = E::default();
            }
            LifecycleEvent::Rejected { kind, error } => {
                match kind.phase() {
                    OperationPhase::Read => self.loading = false,
                    OperationPhase::Write => self.updating = false,
                }
                self.update_success = false;
                self.error_message = Some(error);
            }
            LifecycleEvent::Reset => *self = Self::default(),
        }
    }

    /// Returns whether a read operation is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Returns whether a write operation is in flight.
    #[must_use]
    pub fn updating(&self) -> bool {
        self.updating
    }

    /// Returns whether the last write succeeded.
    #[must_use]
    pub fn update_success(&self) -> bool {
        self.update_success
    }

    /// Returns the last failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SerializedError> {
        self.error_message.as_ref()
    }

    /// Returns the last failure message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_ref().map(|error| error.message.as_str())
    }

    /// Returns the last fetched page.
    #[must_use]
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// Returns the currently viewed entity.
    #[must_use]
    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// Returns the backend's total count for the last list or search.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }
}
