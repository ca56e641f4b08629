//! JSON REST API for the patas console.
//!
//! Exposes an axum [`Router`] backed by any
//! [`patas_core::store::DocumentStore`]. One uniform route set per
//! collection; TLS and transport concerns are the caller's responsibility.
//!
//! # Serving
//!
//! ```rust,ignore
//! axum::serve(listener, patas_api::api_router(store)).await?;
//! ```

pub mod documents;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use patas_core::{
  entity::{Animal, Entity, Product, Sale, Service, Staff, Tutor, Visit},
  store::DocumentStore,
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .merge(collection_routes::<S, Animal>())
    .merge(collection_routes::<S, Tutor>())
    .merge(collection_routes::<S, Service>())
    .merge(collection_routes::<S, Product>())
    .merge(collection_routes::<S, Sale>())
    .merge(collection_routes::<S, Staff>())
    .merge(collection_routes::<S, Visit>())
    .with_state(store)
}

/// The uniform route set for one collection:
/// `GET|POST /{collection}` and `GET|PATCH|DELETE /{collection}/{id}`.
fn collection_routes<S, E>() -> Router<Arc<S>>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  E: Entity,
{
  Router::new()
    .route(
      &format!("/{}", E::COLLECTION),
      get(documents::list::<S, E>).post(documents::create::<S, E>),
    )
    .route(
      &format!("/{}/{{id}}", E::COLLECTION),
      get(documents::get_one::<S, E>)
        .patch(documents::update_one::<S, E>)
        .delete(documents::delete_one::<S, E>),
    )
}
