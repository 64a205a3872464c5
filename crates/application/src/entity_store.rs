use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use tudu_core::{AppError, AppResult, EntityId, SerializedError};
use tudu_domain::Entity;

use crate::{EntityGateway, EntityState, LifecycleEvent, ListQuery, OperationKind, Page, PageRequest};

/// Outcome handed back to the caller once an operation has settled in the slice.
pub type Settled<T> = Result<T, SerializedError>;

/// Async operations of one entity type bound to its state slice.
///
/// Clones share the same slice. Completions are applied in the order they
/// arrive, so a slower response can overwrite a newer one.
pub struct EntityStore<E: Entity> {
    gateway: Arc<dyn EntityGateway<E>>,
    state: Arc<RwLock<EntityState<E>>>,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    /// Creates a store with an initial slice.
    #[must_use]
    pub fn new(gateway: Arc<dyn EntityGateway<E>>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(EntityState::new())),
        }
    }

    /// Returns a copy of the current slice.
    pub async fn snapshot(&self) -> EntityState<E> {
        self.state.read().await.clone()
    }

    /// Forces the slice back to its initial state.
    pub async fn reset(&self) {
        self.dispatch(LifecycleEvent::Reset).await;
    }

    /// Fetches one page of the collection.
    pub async fn list(&self, paging: Option<PageRequest>) -> Settled<Page<E>> {
        let kind = OperationKind::List;
        self.begin(kind).await;
        let result = self.gateway.list(paging.as_ref()).await;
        self.settle_page(kind, result).await
    }

    /// Searches the collection; a blank query lists instead.
    pub async fn search(&self, query: &str, paging: Option<PageRequest>) -> Settled<Page<E>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list(paging).await;
        }

        let kind = OperationKind::Search;
        self.begin(kind).await;
        let result = self.gateway.search(query, paging.as_ref()).await;
        self.settle_page(kind, result).await
    }

    /// Runs a search when the query carries text, a listing otherwise.
    pub async fn fetch(&self, query: &ListQuery) -> Settled<Page<E>> {
        match query.search_text() {
            Some(text) => self.search(text, query.paging.clone()).await,
            None => self.list(query.paging.clone()).await,
        }
    }

    /// Fetches one entity into the slice.
    pub async fn get(&self, id: EntityId) -> Settled<E> {
        let kind = OperationKind::GetById;
        self.begin(kind).await;
        match self.gateway.get(id).await {
            Ok(entity) => {
                self.dispatch(LifecycleEvent::EntityLoaded(entity.clone()))
                    .await;
                Ok(entity)
            }
            Err(error) => Err(self.reject(kind, error).await),
        }
    }

    /// Creates an entity that has no identifier yet.
    pub async fn create(&self, entity: E) -> Settled<E> {
        let kind = OperationKind::Create;
        self.begin(kind).await;
        let result = match entity.id() {
            Some(id) => Err(AppError::Validation(format!(
                "a new {} cannot already have an id ('{id}')",
                E::SLICE_NAME
            ))),
            None => match entity.validate() {
                Ok(()) => self.gateway.create(&entity).await,
                Err(error) => Err(error),
            },
        };
        self.settle_save(kind, result).await
    }

    /// Replaces an existing entity.
    pub async fn update(&self, entity: E) -> Settled<E> {
        let kind = OperationKind::Update;
        self.begin(kind).await;
        let result = match require_id(&entity).and_then(|_| entity.validate()) {
            Ok(()) => self.gateway.update(&entity).await,
            Err(error) => Err(error),
        };
        self.settle_save(kind, result).await
    }

    /// Merges the present fields of an entity into the stored one.
    pub async fn partial_update(&self, entity: E) -> Settled<E> {
        let kind = OperationKind::PartialUpdate;
        self.begin(kind).await;
        let result = match require_id(&entity) {
            Ok(_) => self.gateway.partial_update(&entity).await,
            Err(error) => Err(error),
        };
        self.settle_save(kind, result).await
    }

    /// Deletes an entity.
    pub async fn delete(&self, id: EntityId) -> Settled<()> {
        let kind = OperationKind::Delete;
        self.begin(kind).await;
        match self.gateway.delete(id).await {
            Ok(()) => {
                info!(
                    slice = E::SLICE_NAME,
                    operation = kind.as_str(),
                    id = %id,
                    "entity deleted"
                );
                self.complete_write(kind, LifecycleEvent::Deleted).await;
                Ok(())
            }
            Err(error) => Err(self.reject(kind, error).await),
        }
    }

    async fn settle_page(&self, kind: OperationKind, result: AppResult<Page<E>>) -> Settled<Page<E>> {
        match result {
            Ok(page) => {
                debug!(
                    slice = E::SLICE_NAME,
                    operation = kind.as_str(),
                    items = page.items.len(),
                    total_items = page.total_items,
                    "page loaded"
                );
                self.dispatch(LifecycleEvent::PageLoaded(page.clone())).await;
                Ok(page)
            }
            Err(error) => Err(self.reject(kind, error).await),
        }
    }

    async fn settle_save(&self, kind: OperationKind, result: AppResult<E>) -> Settled<E> {
        match result {
            Ok(saved) => {
                info!(
                    slice = E::SLICE_NAME,
                    operation = kind.as_str(),
                    id = ?saved.id(),
                    "entity saved"
                );
                self.complete_write(kind, LifecycleEvent::EntitySaved(saved.clone()))
                    .await;
                Ok(saved)
            }
            Err(error) => Err(self.reject(kind, error).await),
        }
    }

    /// The refresh starts before the write settles so its read-start
    /// transition cannot clear `update_success`.
    async fn complete_write(&self, kind: OperationKind, event: LifecycleEvent<E>) {
        if !kind.invalidates_list() {
            self.dispatch(event).await;
            return;
        }

        let refresh = OperationKind::List;
        self.begin(refresh).await;
        self.dispatch(event).await;
        let result = self.gateway.list(None).await;
        // The write already succeeded; a failed refresh only lands in the slice.
        let _ = self.settle_page(refresh, result).await;
    }

    async fn begin(&self, kind: OperationKind) {
        debug!(
            action = %kind.action_type(E::SLICE_NAME),
            "operation dispatched"
        );
        self.dispatch(LifecycleEvent::Pending(kind)).await;
    }

    async fn reject(&self, kind: OperationKind, error: AppError) -> SerializedError {
        let error = SerializedError::from(error);
        warn!(
            slice = E::SLICE_NAME,
            operation = kind.as_str(),
            status = ?error.status,
            error = %error.message,
            "operation rejected"
        );
        self.dispatch(LifecycleEvent::Rejected {
            kind,
            error: error.clone(),
        })
        .await;
        error
    }

    async fn dispatch(&self, event: LifecycleEvent<E>) {
        self.state.write().await.apply(event);
    }
}

fn require_id<E: Entity>(entity: &E) -> AppResult<EntityId> {
    entity.id().ok_or_else(|| {
        AppError::Validation(format!("{} must have an id to be updated", E::SLICE_NAME))
    })
}

#[cfg(test)]
mod tests;
