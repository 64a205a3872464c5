use serde_json::{Value, json};
use tracing::debug;
use tudu_application::entity_views::{DeleteView, DetailView, EditView, ListView};
use tudu_application::form_builder::{FormValues, merge_draft};
use tudu_application::{EntityStore, Settled, SortSpec};
use tudu_core::{AppError, AppResult, EntityId, SerializedError};
use tudu_domain::{
    ENTITY_ROUTES, Entity, Notification, Task, UserTasks, UserWorkspaces, Workspace, find_route,
};

use crate::backend::{Backend, GatewayOf};

/// Operation requested for one entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityAction {
    List {
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<SortSpec>,
        query: Option<String>,
    },
    Get(EntityId),
    Create(Vec<(String, String)>),
    Update(EntityId, Vec<(String, String)>),
    Patch(EntityId, Vec<(String, String)>),
    Delete(EntityId),
}

/// Slice snapshot after a command plus the failure it recorded, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    pub snapshot: Value,
    pub failure: Option<SerializedError>,
}

impl CommandReport {
    pub fn render(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.snapshot)
            .map_err(|error| AppError::Internal(format!("failed to render snapshot: {error}")))
    }

    pub fn into_result(self) -> AppResult<()> {
        match self.failure {
            Some(failure) => Err(AppError::from(failure)),
            None => Ok(()),
        }
    }
}

/// Menu entries in display order.
pub fn routes_report() -> Value {
    Value::Array(
        ENTITY_ROUTES
            .iter()
            .map(|route| {
                json!({
                    "path": format!("/{}", route.path),
                    "label": route.label,
                    "resource": format!("/api/{}", route.resource),
                })
            })
            .collect(),
    )
}

/// Runs an action against the collection named by a route path or slice name.
pub async fn run(
    backend: &Backend,
    default_page_size: u32,
    entity: &str,
    action: EntityAction,
) -> AppResult<CommandReport> {
    let route = find_route(entity).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown entity '{entity}'; `tudu routes` lists the available ones"
        ))
    })?;
    debug!(slice = route.slice, resource = route.resource, "entity command");

    match route.slice {
        "notification" => run_for::<Notification>(backend, default_page_size, action).await,
        "task" => run_for::<Task>(backend, default_page_size, action).await,
        "userTasks" => run_for::<UserTasks>(backend, default_page_size, action).await,
        "userWorkspaces" => run_for::<UserWorkspaces>(backend, default_page_size, action).await,
        "workspace" => run_for::<Workspace>(backend, default_page_size, action).await,
        other => Err(AppError::Internal(format!(
            "route '{other}' has no entity binding"
        ))),
    }
}

async fn run_for<E: Entity>(
    backend: &Backend,
    default_page_size: u32,
    action: EntityAction,
) -> AppResult<CommandReport>
where
    Backend: GatewayOf<E>,
{
    let store = EntityStore::<E>::new(GatewayOf::<E>::gateway(backend));

    let outcome = match action {
        EntityAction::List {
            page,
            size,
            sort,
            query,
        } => {
            let mut view = ListView::new(store.clone(), size.unwrap_or(default_page_size))
                .at_page(page.unwrap_or(1));
            if let Some(sort) = sort {
                view = view.with_sort(sort);
            }
            if let Some(query) = query {
                view = view.with_query(query);
            }
            view.mount().await.map(|_| ())
        }
        EntityAction::Get(id) => DetailView::new(store.clone(), id).mount().await.map(|_| ()),
        EntityAction::Create(assignments) => {
            submit_form(backend, &EditView::create(store.clone()), assignments).await
        }
        EntityAction::Update(id, assignments) => {
            submit_form(backend, &EditView::edit(store.clone(), id), assignments).await
        }
        EntityAction::Patch(id, assignments) => {
            patch(backend, &store, id, assignments).await
        }
        EntityAction::Delete(id) => {
            let view = DeleteView::new(store.clone(), id);
            match view.mount().await {
                Ok(_) => view.confirm().await,
                Err(error) => Err(error),
            }
        }
    };

    let snapshot = serde_json::to_value(store.snapshot().await).map_err(|error| {
        AppError::Internal(format!(
            "failed to serialize {} snapshot: {error}",
            E::SLICE_NAME
        ))
    })?;

    Ok(CommandReport {
        snapshot,
        failure: outcome.err(),
    })
}

async fn submit_form<E: Entity>(
    backend: &Backend,
    view: &EditView<E>,
    assignments: Vec<(String, String)>,
) -> Settled<()> {
    view.mount().await?;
    let mut draft = view.form_values().await?;
    draft.extend(draft_from(assignments));
    let candidates = backend
        .relation_candidates::<E>(&draft)
        .await
        .map_err(SerializedError::from)?;
    view.submit(&draft, &candidates).await.map(|_| ())
}

async fn patch<E: Entity>(
    backend: &Backend,
    store: &EntityStore<E>,
    id: EntityId,
    assignments: Vec<(String, String)>,
) -> Settled<()> {
    let draft = draft_from(assignments);
    let candidates = backend
        .relation_candidates::<E>(&draft)
        .await
        .map_err(SerializedError::from)?;
    let patch = E::default()
        .with_id(id)
        .and_then(|base| merge_draft(&base, &draft, &candidates))
        .map_err(SerializedError::from)?;
    store.partial_update(patch).await.map(|_| ())
}

fn draft_from(assignments: Vec<(String, String)>) -> FormValues {
    assignments
        .into_iter()
        .map(|(field, value)| (field, Value::String(value)))
        .collect()
}
