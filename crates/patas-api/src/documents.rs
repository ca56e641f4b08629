//! Generic handlers for the per-collection document routes.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/{collection}` | Full-collection snapshot, insertion order |
//! | `POST`   | `/{collection}` | Body: entity fields; returns 201 + `{"id"}` |
//! | `GET`    | `/{collection}/:id` | 404 if not found |
//! | `PATCH`  | `/{collection}/:id` | Body: patch; 204, or 404 if missing |
//! | `DELETE` | `/{collection}/:id` | 204, or 404 if missing |
//!
//! Unknown patch fields are rejected by serde at the extractor
//! (`deny_unknown_fields` on every patch type).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use patas_core::{
  entity::{Document, Entity},
  store::DocumentStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Body of a successful `POST /{collection}` — the store-assigned id.
#[derive(Debug, Serialize)]
pub struct Created {
  pub id: Uuid,
}

/// `GET /{collection}`
pub async fn list<S, E>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Document<E>>>, ApiError>
where
  S: DocumentStore,
  E: Entity,
{
  let docs = store
    .list::<E>()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(docs))
}

/// `POST /{collection}` — returns 201 + `{"id": ...}`.
pub async fn create<S, E>(
  State(store): State<Arc<S>>,
  Json(fields): Json<E>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  E: Entity,
{
  let id = store
    .create(fields)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `GET /{collection}/:id`
pub async fn get_one<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document<E>>, ApiError>
where
  S: DocumentStore,
  E: Entity,
{
  let doc = store
    .get::<E>(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found::<E>(id))?;
  Ok(Json(doc))
}

/// `PATCH /{collection}/:id` — field-level merge; 204 on success.
pub async fn update_one<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<E::Patch>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  E: Entity,
{
  let found = store
    .update::<E>(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !found {
    return Err(not_found::<E>(id));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /{collection}/:id` — 204 on success.
pub async fn delete_one<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  E: Entity,
{
  let found = store
    .delete::<E>(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !found {
    return Err(not_found::<E>(id));
  }
  Ok(StatusCode::NO_CONTENT)
}

fn not_found<E: Entity>(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("{}/{id} not found", E::COLLECTION))
}
