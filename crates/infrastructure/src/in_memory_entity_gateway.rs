use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tudu_application::{EntityGateway, Page, PageRequest, SortDirection};
use tudu_core::{AppError, AppResult, EntityId};
use tudu_domain::Entity;

/// In-memory stand-in for one backend collection.
///
/// Entities are kept in their wire form so partial updates follow JSON merge-patch rules.
#[derive(Debug)]
pub struct InMemoryEntityGateway<E> {
    state: RwLock<CollectionState>,
    entity: PhantomData<fn() -> E>,
}

#[derive(Debug)]
struct CollectionState {
    records: BTreeMap<EntityId, Map<String, Value>>,
    next_id: i64,
}

impl<E: Entity> Default for InMemoryEntityGateway<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryEntityGateway<E> {
    /// Creates an empty collection whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CollectionState {
                records: BTreeMap::new(),
                next_id: 1,
            }),
            entity: PhantomData,
        }
    }

    /// Creates a collection holding already persisted entities.
    pub fn seeded(entities: impl IntoIterator<Item = E>) -> AppResult<Self> {
        let mut records = BTreeMap::new();
        for entity in entities {
            let id = entity.id().ok_or_else(|| {
                AppError::Validation(format!("seeded {} must carry an id", E::SLICE_NAME))
            })?;
            if records.insert(id, to_record(&entity)?).is_some() {
                return Err(AppError::Conflict(format!(
                    "{} '{id}' is seeded twice",
                    E::SLICE_NAME
                )));
            }
        }

        let next_id = records
            .keys()
            .next_back()
            .map_or(1, |id: &EntityId| id.as_i64() + 1);

        Ok(Self {
            state: RwLock::new(CollectionState { records, next_id }),
            entity: PhantomData,
        })
    }

    async fn page_of(
        &self,
        matches: impl Fn(&Map<String, Value>) -> bool,
        paging: Option<&PageRequest>,
    ) -> AppResult<Page<E>> {
        let state = self.state.read().await;
        let mut records: Vec<&Map<String, Value>> =
            state.records.values().filter(|&record| matches(record)).collect();
        let total_items = records.len() as u64;

        let records: Vec<&Map<String, Value>> = match paging {
            Some(paging) => {
                records.sort_by(|left, right| {
                    let ordering = compare_values(
                        left.get(paging.sort.field.as_str()),
                        right.get(paging.sort.field.as_str()),
                    );
                    match paging.sort.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                });
                let size = paging.size as usize;
                records
                    .into_iter()
                    .skip(paging.page as usize * size)
                    .take(size)
                    .collect()
            }
            None => records,
        };

        let items = records
            .into_iter()
            .map(|record| from_record::<E>(record.clone()))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page { items, total_items })
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for InMemoryEntityGateway<E> {
    async fn list(&self, paging: Option<&PageRequest>) -> AppResult<Page<E>> {
        self.page_of(|_| true, paging).await
    }

    async fn search(&self, query: &str, paging: Option<&PageRequest>) -> AppResult<Page<E>> {
        let needle = query.trim().to_lowercase();
        self.page_of(
            |record| record.values().any(|value| contains_text(value, needle.as_str())),
            paging,
        )
        .await
    }

    async fn get(&self, id: EntityId) -> AppResult<E> {
        let state = self.state.read().await;
        let record = state
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<E>(id))?;
        from_record(record)
    }

    async fn create(&self, entity: &E) -> AppResult<E> {
        if entity.id().is_some() {
            return Err(AppError::Validation(format!(
                "a new {} cannot already have an id",
                E::SLICE_NAME
            )));
        }

        let mut state = self.state.write().await;
        let id = EntityId::new(state.next_id);
        let created = entity.clone().with_id(id)?;
        state.records.insert(id, to_record(&created)?);
        state.next_id += 1;
        Ok(created)
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        let id = entity
            .id()
            .ok_or_else(|| AppError::Validation(format!("{} has no id", E::SLICE_NAME)))?;

        let mut state = self.state.write().await;
        let record = state
            .records
            .get_mut(&id)
            .ok_or_else(|| not_found::<E>(id))?;
        *record = to_record(entity)?;
        Ok(entity.clone())
    }

    async fn partial_update(&self, entity: &E) -> AppResult<E> {
        let id = entity
            .id()
            .ok_or_else(|| AppError::Validation(format!("{} has no id", E::SLICE_NAME)))?;
        let patch = to_record(entity)?;

        let mut state = self.state.write().await;
        let record = state
            .records
            .get_mut(&id)
            .ok_or_else(|| not_found::<E>(id))?;
        let mut merged = record.clone();
        merge_patch(&mut merged, patch);
        let updated = from_record::<E>(merged.clone())?;
        *record = merged;
        Ok(updated)
    }

    async fn delete(&self, id: EntityId) -> AppResult<()> {
        self.state.write().await.records.remove(&id);
        Ok(())
    }
}

fn not_found<E: Entity>(id: EntityId) -> AppError {
    AppError::NotFound(format!("{} '{id}' does not exist", E::SLICE_NAME))
}

fn to_record<E: Entity>(entity: &E) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(AppError::Internal(format!(
            "{} serialized to non-object value '{other}'",
            E::SLICE_NAME
        ))),
        Err(error) => Err(AppError::Internal(format!(
            "failed to serialize {}: {error}",
            E::SLICE_NAME
        ))),
    }
}

fn from_record<E: Entity>(record: Map<String, Value>) -> AppResult<E> {
    serde_json::from_value(Value::Object(record)).map_err(|error| {
        AppError::Internal(format!("failed to decode stored {}: {error}", E::SLICE_NAME))
    })
}

fn merge_patch(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        match value {
            Value::Null => {
                target.remove(&key);
            }
            Value::Object(nested) => {
                let slot = target
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(existing) = slot {
                    merge_patch(existing, nested);
                }
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Number(number) => number.to_string().contains(needle),
        Value::Array(values) => values.iter().any(|value| contains_text(value, needle)),
        Value::Object(fields) => fields.values().any(|value| contains_text(value, needle)),
        Value::Null | Value::Bool(_) => false,
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        (Some(left), Some(right)) => left.to_string().cmp(&right.to_string()),
    }
}
