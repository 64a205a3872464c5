use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;
use tudu_core::{AppError, AppResult, EntityId};
use tudu_domain::{Entity, Priority, Status, Task};

use crate::{EntityGateway, ListQuery, OperationKind, Page, PageRequest, SortSpec};

use super::EntityStore;

#[derive(Default)]
struct FakeTaskGateway {
    tasks: Mutex<BTreeMap<i64, Task>>,
    calls: Mutex<Vec<OperationKind>>,
    next_id: Mutex<i64>,
    fail_list: Mutex<bool>,
    list_delay: Option<Duration>,
}

impl FakeTaskGateway {
    fn starting_at(next_id: i64) -> Self {
        Self {
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    async fn seed(&self, id: i64, title: &str) -> Task {
        let task = Task::titled(title)
            .with_id(EntityId::new(id))
            .unwrap_or_default();
        self.tasks.lock().await.insert(id, task.clone());
        task
    }

    async fn calls(&self) -> Vec<OperationKind> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, kind: OperationKind) {
        self.calls.lock().await.push(kind);
    }

    async fn current_page(&self) -> Page<Task> {
        let tasks = self.tasks.lock().await;
        Page {
            items: tasks.values().cloned().collect(),
            total_items: tasks.len() as u64,
        }
    }
}

#[async_trait]
impl EntityGateway<Task> for FakeTaskGateway {
    async fn list(&self, _paging: Option<&PageRequest>) -> AppResult<Page<Task>> {
        self.record(OperationKind::List).await;
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_list.lock().await {
            return Err(AppError::Server {
                status: 503,
                message: "list unavailable".to_owned(),
            });
        }
        Ok(self.current_page().await)
    }

    async fn search(&self, query: &str, _paging: Option<&PageRequest>) -> AppResult<Page<Task>> {
        self.record(OperationKind::Search).await;
        let tasks = self.tasks.lock().await;
        let items: Vec<Task> = tasks
            .values()
            .filter(|task| {
                task.title
                    .as_deref()
                    .map(|title| title.contains(query))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        Ok(Page {
            total_items: items.len() as u64,
            items,
        })
    }

    async fn get(&self, id: EntityId) -> AppResult<Task> {
        self.record(OperationKind::GetById).await;
        self.tasks
            .lock()
            .await
            .get(&id.as_i64())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("task '{id}'")))
    }

    async fn create(&self, entity: &Task) -> AppResult<Task> {
        self.record(OperationKind::Create).await;
        let mut next_id = self.next_id.lock().await;
        let id = *next_id;
        *next_id += 1;

        let mut created = entity.clone().with_id(EntityId::new(id))?;
        created.created_at = Utc.timestamp_opt(0, 0).single();
        self.tasks.lock().await.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, entity: &Task) -> AppResult<Task> {
        self.record(OperationKind::Update).await;
        let id = entity.id().map(|id| id.as_i64()).unwrap_or_default();
        let mut tasks = self.tasks.lock().await;
        if !tasks.contains_key(&id) {
            return Err(AppError::Validation("Entity not found".to_owned()));
        }
        tasks.insert(id, entity.clone());
        Ok(entity.clone())
    }

    async fn partial_update(&self, entity: &Task) -> AppResult<Task> {
        self.record(OperationKind::PartialUpdate).await;
        let id = entity.id().map(|id| id.as_i64()).unwrap_or_default();
        let mut tasks = self.tasks.lock().await;
        let stored = tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::Validation("Entity not found".to_owned()))?;
        if entity.status.is_some() {
            stored.status = entity.status;
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: EntityId) -> AppResult<()> {
        self.record(OperationKind::Delete).await;
        self.tasks.lock().await.remove(&id.as_i64());
        Ok(())
    }
}

fn store_over(gateway: &Arc<FakeTaskGateway>) -> EntityStore<Task> {
    EntityStore::new(gateway.clone())
}

#[tokio::test]
async fn create_assigns_id_and_refreshes_list_once() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(42));
    let store = store_over(&gateway);

    let mut draft = Task::titled("Write report");
    draft.priority = Some(Priority::Low);
    draft.status = Some(Status::Pending);
    let created = store.create(draft).await;
    assert!(created.is_ok());

    let state = store.snapshot().await;
    assert_eq!(state.entity().id(), Some(EntityId::new(42)));
    assert_eq!(state.entity().title.as_deref(), Some("Write report"));
    assert!(state.update_success());
    assert!(!state.updating());
    assert!(!state.loading());
    assert_eq!(state.entities().len(), 1);
    assert_eq!(
        gateway.calls().await,
        vec![OperationKind::Create, OperationKind::List]
    );
}

#[tokio::test]
async fn create_rejects_entity_that_already_has_an_id() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);

    let existing = Task::titled("dup")
        .with_id(EntityId::new(5))
        .unwrap_or_default();
    let result = store.create(existing).await;

    assert_eq!(result.map_err(|error| error.status), Err(Some(400)));
    assert!(gateway.calls().await.is_empty());
    let state = store.snapshot().await;
    assert!(!state.updating());
    assert!(state.error_message().is_some());
}

#[tokio::test]
async fn create_validates_required_title() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);

    let result = store.create(Task::default()).await;

    assert!(result.is_err());
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn list_replaces_entities_and_total_regardless_of_prior_state() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(10));
    let store = store_over(&gateway);
    gateway.seed(1, "first").await;
    let _ = store.list(None).await;

    gateway.seed(2, "second").await;
    gateway.seed(3, "third").await;
    let paging = PageRequest::new(0, 20, SortSpec::ascending("id")).ok();
    let page = store.list(paging).await;

    let state = store.snapshot().await;
    assert_eq!(page.map(|page| page.items), Ok(state.entities().to_vec()));
    assert_eq!(state.entities().len(), 3);
    assert_eq!(state.total_items(), 3);
    assert!(!state.loading());
}

#[tokio::test]
async fn get_twice_without_mutation_yields_same_entity() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(10));
    let store = store_over(&gateway);
    gateway.seed(7, "stable").await;

    let _ = store.get(EntityId::new(7)).await;
    let first = store.snapshot().await.entity().clone();
    let _ = store.get(EntityId::new(7)).await;
    let second = store.snapshot().await.entity().clone();

    assert_eq!(first, second);
    assert_eq!(first.title.as_deref(), Some("stable"));
}

#[tokio::test]
async fn create_then_get_returns_created_entity_with_server_defaults() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(100));
    let store = store_over(&gateway);

    let mut draft = Task::titled("Round trip");
    draft.category = Some("docs".to_owned());
    let created = store.create(draft.clone()).await.unwrap_or_default();
    let fetched = store
        .get(created.id().unwrap_or(EntityId::new(0)))
        .await
        .unwrap_or_default();

    assert_eq!(fetched.id(), Some(EntityId::new(100)));
    assert!(fetched.created_at.is_some());
    let mut expected = draft.with_id(EntityId::new(100)).unwrap_or_default();
    expected.created_at = fetched.created_at;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn delete_empties_entity_and_marks_success() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(10));
    let store = store_over(&gateway);
    gateway.seed(42, "to delete").await;
    let _ = store.get(EntityId::new(42)).await;

    let result = store.delete(EntityId::new(42)).await;

    assert!(result.is_ok());
    let state = store.snapshot().await;
    assert_eq!(state.entity(), &Task::default());
    assert!(state.update_success());
    assert!(state.entities().is_empty());
    assert_eq!(
        gateway.calls().await,
        vec![
            OperationKind::GetById,
            OperationKind::Delete,
            OperationKind::List
        ]
    );
}

#[tokio::test]
async fn get_missing_entity_sets_error_and_keeps_entity() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(10));
    let store = store_over(&gateway);
    let kept = gateway.seed(1, "kept").await;
    let _ = store.get(EntityId::new(1)).await;

    let result = store.get(EntityId::new(999)).await;

    assert_eq!(result.map_err(|error| error.status), Err(Some(404)));
    let state = store.snapshot().await;
    assert!(state.error_message().is_some());
    assert!(!state.loading());
    assert_eq!(state.entity(), &kept);
}

#[tokio::test]
async fn failed_refresh_does_not_fail_the_write() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    *gateway.fail_list.lock().await = true;
    let store = store_over(&gateway);

    let result = store.create(Task::titled("saved anyway")).await;

    assert!(result.is_ok());
    let state = store.snapshot().await;
    assert_eq!(state.error().and_then(|error| error.status), Some(503));
    assert!(!state.loading());
    assert_eq!(state.entity().title.as_deref(), Some("saved anyway"));
}

#[tokio::test]
async fn blank_search_lists_instead() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);

    let _ = store.search("  ", None).await;
    let _ = store
        .fetch(&ListQuery {
            query: Some("report".to_owned()),
            paging: None,
        })
        .await;

    assert_eq!(
        gateway.calls().await,
        vec![OperationKind::List, OperationKind::Search]
    );
}

#[tokio::test]
async fn partial_update_requires_an_id() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);

    let mut unsaved = Task::titled("unsaved");
    unsaved.status = Some(Status::Done);
    let result = store.partial_update(unsaved).await;

    assert!(result.is_err());
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn partial_update_merges_and_refreshes() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);
    let stored = gateway.seed(3, "merge me").await;

    let mut sparse = Task::default()
        .with_id(EntityId::new(3))
        .unwrap_or_default();
    sparse.status = Some(Status::Done);
    let merged = store.partial_update(sparse).await.unwrap_or_default();

    assert_eq!(merged.title, stored.title);
    assert_eq!(merged.status, Some(Status::Done));
    assert!(store.snapshot().await.update_success());
    assert_eq!(
        gateway.calls().await,
        vec![OperationKind::PartialUpdate, OperationKind::List]
    );
}

#[tokio::test]
async fn slower_completion_overwrites_newer_state() {
    let gateway = Arc::new(FakeTaskGateway {
        list_delay: Some(Duration::from_millis(50)),
        ..FakeTaskGateway::starting_at(1)
    });
    gateway.seed(1, "alpha").await;
    gateway.seed(2, "beta").await;
    let store = store_over(&gateway);

    let (listed, searched) = tokio::join!(store.list(None), store.search("beta", None));

    assert_eq!(searched.map(|page| page.items.len()), Ok(1));
    assert_eq!(listed.map(|page| page.items.len()), Ok(2));
    assert_eq!(store.snapshot().await.entities().len(), 2);
}

#[tokio::test]
async fn reset_clears_slice_after_activity() {
    let gateway = Arc::new(FakeTaskGateway::starting_at(1));
    let store = store_over(&gateway);
    let _ = store.create(Task::titled("x")).await;
    let _ = store.get(EntityId::new(404)).await;

    store.reset().await;

    let state = store.snapshot().await;
    assert_eq!(state, crate::EntityState::new());
}
