//! The `DocumentStore` trait — collection-scoped CRUD over a schemaless
//! document store.
//!
//! The trait is implemented by storage backends (e.g. `patas-store-sqlite`).
//! Higher layers (`patas-api`, `patas-tui`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::entity::{Document, Entity};

/// Abstraction over a patas document store backend.
///
/// Every call is a single, independent read or write — the store offers no
/// transactions, no subscriptions, and no ordering guarantee between writes
/// from different sessions. `list` returns the full collection as a one-shot
/// snapshot in insertion order; nothing stronger is promised.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Full-collection snapshot for `E`, in insertion order.
  fn list<E: Entity>(
    &self,
  ) -> impl Future<Output = Result<Vec<Document<E>>, Self::Error>> + Send + '_;

  /// Retrieve one document by id. Returns `None` if not found.
  fn get<E: Entity>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document<E>>, Self::Error>> + Send + '_;

  /// Persist a new document and return the store-assigned id.
  fn create<E: Entity>(
    &self,
    fields: E,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Merge the fields named by `patch` into an existing document.
  ///
  /// Returns `false` when no document with `id` exists in `E`'s collection;
  /// absent patch fields are left untouched.
  fn update<E: Entity>(
    &self,
    id: Uuid,
    patch: E::Patch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete one document by id. Returns `false` when it did not exist.
  fn delete<E: Entity>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
