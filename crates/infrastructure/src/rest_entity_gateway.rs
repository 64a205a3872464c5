use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use tudu_application::{EntityGateway, Page, PageRequest};
use tudu_core::{AppError, AppResult, EntityId};
use tudu_domain::Entity;

use crate::rest_client::{RestClient, total_count};

const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";

/// `reqwest`-backed gateway for one `/api/<resource>` collection.
pub struct RestEntityGateway<E> {
    client: RestClient,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RestEntityGateway<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> RestEntityGateway<E> {
    /// Creates a gateway sharing the given client.
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            entity: PhantomData,
        }
    }

    async fn fetch_page(
        &self,
        segments: &[&str],
        mut query: Vec<(&'static str, String)>,
        paging: Option<&PageRequest>,
        action: &str,
    ) -> AppResult<Page<E>> {
        if let Some(paging) = paging {
            query.push(("page", paging.page.to_string()));
            query.push(("size", paging.size.to_string()));
            query.push(("sort", paging.sort.to_param()));
        }

        let url = self.client.api_url(segments, &query)?;
        let (headers, items) = self
            .client
            .send_json::<Vec<E>>(self.client.request(Method::GET, url), action)
            .await?;

        let total_items = total_count(&headers).unwrap_or(items.len() as u64);
        debug!(
            resource = E::RESOURCE,
            items = items.len(),
            total_items,
            "page received"
        );

        Ok(Page { items, total_items })
    }

    fn existing_id(entity: &E, action: &str) -> AppResult<EntityId> {
        entity.id().ok_or_else(|| {
            AppError::Validation(format!("{action}: {} has no id", E::SLICE_NAME))
        })
    }

    fn encode(entity: &E, action: &str) -> AppResult<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|error| {
            AppError::Internal(format!("failed to serialize request body of {action}: {error}"))
        })
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for RestEntityGateway<E> {
    async fn list(&self, paging: Option<&PageRequest>) -> AppResult<Page<E>> {
        let action = format!("list {}", E::RESOURCE);
        self.fetch_page(&[E::RESOURCE], Vec::new(), paging, action.as_str())
            .await
    }

    async fn search(&self, query: &str, paging: Option<&PageRequest>) -> AppResult<Page<E>> {
        let action = format!("search {}", E::RESOURCE);
        self.fetch_page(
            &[E::RESOURCE, "_search"],
            vec![("query", query.to_owned())],
            paging,
            action.as_str(),
        )
        .await
    }

    async fn get(&self, id: EntityId) -> AppResult<E> {
        let action = format!("get {} {id}", E::SLICE_NAME);
        let id_segment = id.to_string();
        let url = self
            .client
            .api_url(&[E::RESOURCE, id_segment.as_str()], &[])?;
        let (_, entity) = self
            .client
            .send_json::<E>(self.client.request(Method::GET, url), action.as_str())
            .await?;
        Ok(entity)
    }

    async fn create(&self, entity: &E) -> AppResult<E> {
        let action = format!("create {}", E::SLICE_NAME);
        if entity.id().is_some() {
            return Err(AppError::Validation(format!(
                "{action}: a new {} cannot already have an id",
                E::SLICE_NAME
            )));
        }

        let url = self.client.api_url(&[E::RESOURCE], &[])?;
        let request = self.client.request(Method::POST, url).json(entity);
        let (_, created) = self
            .client
            .send_json::<E>(request, action.as_str())
            .await?;
        Ok(created)
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        let action = format!("update {}", E::SLICE_NAME);
        let id = Self::existing_id(entity, action.as_str())?.to_string();
        let url = self.client.api_url(&[E::RESOURCE, id.as_str()], &[])?;
        let request = self.client.request(Method::PUT, url).json(entity);
        let (_, updated) = self
            .client
            .send_json::<E>(request, action.as_str())
            .await?;
        Ok(updated)
    }

    async fn partial_update(&self, entity: &E) -> AppResult<E> {
        let action = format!("partially update {}", E::SLICE_NAME);
        let id = Self::existing_id(entity, action.as_str())?.to_string();
        let url = self.client.api_url(&[E::RESOURCE, id.as_str()], &[])?;
        let request = self
            .client
            .request(Method::PATCH, url)
            .header(CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE)
            .body(Self::encode(entity, action.as_str())?);
        let (_, updated) = self
            .client
            .send_json::<E>(request, action.as_str())
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: EntityId) -> AppResult<()> {
        let action = format!("delete {} {id}", E::SLICE_NAME);
        let id_segment = id.to_string();
        let url = self
            .client
            .api_url(&[E::RESOURCE, id_segment.as_str()], &[])?;
        self.client
            .send(self.client.request(Method::DELETE, url), action.as_str())
            .await?;
        Ok(())
    }
}
