use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::models::event::{Category, Event, EventPayload, CATEGORIES};
use crate::uploads::ImageStore;
use crate::utils::error::AppError;
use crate::utils::extract::JsonOrForm;
use crate::utils::response;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

pub async fn list_categories() -> Json<[Category; 8]> {
    Json(CATEGORIES)
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());
    let events = state.store.list(search).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Event>, AppError> {
    match state.store.get(id).await? {
        Some(event) => Ok(Json(event)),
        None => Err(AppError::NotFound("Event not found".to_string())),
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<EventPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let image_url = state.images.resolve(payload.image())?;
    let id = state.store.insert(&payload, image_url.as_deref()).await?;

    tracing::info!(id, title = payload.title.as_deref(), "event created");
    Ok(response::created(id, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonOrForm(payload): JsonOrForm<EventPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;

    // An inline payload replaces the file the row currently owns: the
    // old file is removed before the new one is written. Not wrapped in
    // a transaction with the row update.
    let image_url = match payload.image() {
        Some(value) if ImageStore::is_inline(value) => {
            if let Some(old) = state.store.stored_image(id).await? {
                state.images.remove(&old)?;
            }
            Some(state.images.materialize(value)?)
        }
        other => other.map(str::to_owned),
    };

    let updated = state.store.update(id, &payload, image_url.as_deref()).await?;
    if !updated {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(id, "event updated");
    Ok(response::mutated())
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let image = state.store.stored_image(id).await?;

    let deleted = state.store.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    // Only a confirmed row deletion may take the file with it.
    if let Some(stored) = image {
        state.images.remove(&stored)?;
    }

    tracing::info!(id, "event deleted");
    Ok(response::mutated())
}
