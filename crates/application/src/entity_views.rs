//! Headless list, detail, edit and delete-confirm controllers over an [`EntityStore`].

use chrono::Utc;
use tudu_core::{AppError, EntityId, SerializedError};
use tudu_domain::Entity;

use crate::form_builder::{FormValues, RelationCandidates, initial_values, submit};
use crate::{EntityStore, ListQuery, Page, PageRequest, Settled, SortDirection, SortSpec};

/// Paged, sortable, searchable collection screen.
pub struct ListView<E: Entity> {
    store: EntityStore<E>,
    active_page: u32,
    items_per_page: u32,
    sort: SortSpec,
    query: String,
}

impl<E: Entity> ListView<E> {
    /// Creates a list screen on page one sorted by ascending id.
    #[must_use]
    pub fn new(store: EntityStore<E>, items_per_page: u32) -> Self {
        Self {
            store,
            active_page: 1,
            items_per_page: items_per_page.max(1),
            sort: SortSpec::ascending("id"),
            query: String::new(),
        }
    }

    /// Starts from the given sort instead of ascending id.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Starts from the given search text.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Starts on a one-based page.
    #[must_use]
    pub fn at_page(mut self, page: u32) -> Self {
        self.active_page = page.max(1);
        self
    }

    /// Loads the current page.
    pub async fn mount(&self) -> Settled<Page<E>> {
        self.store.fetch(&self.list_query()).await
    }

    /// Returns the one-based active page.
    #[must_use]
    pub fn active_page(&self) -> u32 {
        self.active_page
    }

    /// Returns the active sort.
    #[must_use]
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Starts a new search from page one; an empty query lists everything.
    pub async fn search(&mut self, query: impl Into<String>) -> Settled<Page<E>> {
        self.query = query.into();
        self.active_page = 1;
        self.mount().await
    }

    /// Sorts by a field, flipping the direction when it is already active.
    pub async fn toggle_sort(&mut self, field: &str) -> Settled<Page<E>> {
        self.sort = if self.sort.field == field {
            SortSpec {
                field: self.sort.field.clone(),
                direction: self.sort.direction.flipped(),
            }
        } else {
            SortSpec {
                field: field.to_owned(),
                direction: SortDirection::Asc,
            }
        };
        self.mount().await
    }

    /// Moves to a one-based page.
    pub async fn go_to_page(&mut self, page: u32) -> Settled<Page<E>> {
        self.active_page = page.max(1);
        self.mount().await
    }

    /// Returns the number of pages for the slice's current total.
    pub async fn total_pages(&self) -> u64 {
        let total = self.store.snapshot().await.total_items();
        total.div_ceil(u64::from(self.items_per_page))
    }

    /// Returns the request the current screen state maps to.
    #[must_use]
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            query: Some(self.query.clone()).filter(|query| !query.trim().is_empty()),
            paging: Some(PageRequest {
                page: self.active_page - 1,
                size: self.items_per_page,
                sort: self.sort.clone(),
            }),
        }
    }
}

/// Read-only single entity screen.
pub struct DetailView<E: Entity> {
    store: EntityStore<E>,
    id: EntityId,
}

impl<E: Entity> DetailView<E> {
    /// Creates a detail screen for one entity.
    #[must_use]
    pub fn new(store: EntityStore<E>, id: EntityId) -> Self {
        Self { store, id }
    }

    /// Loads the entity.
    pub async fn mount(&self) -> Settled<E> {
        self.store.get(self.id).await
    }
}

/// Create-or-edit form screen.
pub struct EditView<E: Entity> {
    store: EntityStore<E>,
    id: Option<EntityId>,
}

impl<E: Entity> EditView<E> {
    /// Creates a form for a new entity.
    #[must_use]
    pub fn create(store: EntityStore<E>) -> Self {
        Self { store, id: None }
    }

    /// Creates a form editing an existing entity.
    #[must_use]
    pub fn edit(store: EntityStore<E>, id: EntityId) -> Self {
        Self { store, id: Some(id) }
    }

    /// Returns whether the form creates a new entity.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Clears stale data for a new form, loads the entity otherwise.
    pub async fn mount(&self) -> Settled<()> {
        match self.id {
            None => {
                self.store.reset().await;
                Ok(())
            }
            Some(id) => self.store.get(id).await.map(|_| ()),
        }
    }

    /// Returns the values the form starts from.
    pub async fn form_values(&self) -> Settled<FormValues> {
        let state = self.store.snapshot().await;
        initial_values(state.entity(), self.is_new(), Utc::now()).map_err(SerializedError::from)
    }

    /// Submits a draft as a create or an update.
    ///
    /// A draft that cannot be turned into an entity never reaches the
    /// backend; the error is returned and the slice is left untouched.
    pub async fn submit(&self, draft: &FormValues, candidates: &RelationCandidates) -> Settled<E> {
        let base = self.store.snapshot().await.entity().clone();
        let entity = submit(&base, draft, candidates).map_err(SerializedError::from)?;
        if self.is_new() {
            self.store.create(entity).await
        } else {
            self.store.update(entity).await
        }
    }

    /// Returns whether the last submit succeeded and the form can close.
    pub async fn should_close(&self) -> bool {
        self.store.snapshot().await.update_success()
    }
}

/// Delete confirmation dialog.
pub struct DeleteView<E: Entity> {
    store: EntityStore<E>,
    id: EntityId,
}

impl<E: Entity> DeleteView<E> {
    /// Creates a confirmation dialog for one entity.
    #[must_use]
    pub fn new(store: EntityStore<E>, id: EntityId) -> Self {
        Self { store, id }
    }

    /// Loads the entity shown in the dialog.
    pub async fn mount(&self) -> Settled<E> {
        self.store.get(self.id).await
    }

    /// Deletes the loaded entity.
    pub async fn confirm(&self) -> Settled<()> {
        let loaded = self.store.snapshot().await.entity().id();
        let id = loaded.ok_or_else(|| {
            SerializedError::from(AppError::Validation(format!(
                "no {} loaded for deletion",
                E::SLICE_NAME
            )))
        })?;
        self.store.delete(id).await
    }

    /// Returns whether the delete succeeded and the dialog can close.
    pub async fn should_close(&self) -> bool {
        self.store.snapshot().await.update_success()
    }
}
