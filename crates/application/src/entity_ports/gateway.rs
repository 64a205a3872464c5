use async_trait::async_trait;
use tudu_core::{AppResult, EntityId};
use tudu_domain::{Entity, User};

use super::{Page, PageRequest};

/// REST boundary port for one entity resource.
#[async_trait]
pub trait EntityGateway<E: Entity>: Send + Sync {
    /// Lists one page of the collection.
    async fn list(&self, paging: Option<&PageRequest>) -> AppResult<Page<E>>;

    /// Runs a full-text search over the collection.
    async fn search(&self, query: &str, paging: Option<&PageRequest>) -> AppResult<Page<E>>;

    /// Fetches one entity by identifier.
    async fn get(&self, id: EntityId) -> AppResult<E>;

    /// Creates an entity and returns it with its assigned identifier.
    async fn create(&self, entity: &E) -> AppResult<E>;

    /// Replaces an existing entity.
    async fn update(&self, entity: &E) -> AppResult<E>;

    /// Merges the present fields of an entity into the stored one.
    async fn partial_update(&self, entity: &E) -> AppResult<E>;

    /// Deletes an entity by identifier.
    async fn delete(&self, id: EntityId) -> AppResult<()>;
}

/// User-management listing used to fill relation pickers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists the users that may be linked to an entity.
    async fn list_users(&self) -> AppResult<Vec<User>>;
}
