//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use patas_core::{
  entity::{Document, Entity},
  store::DocumentStore,
};

use crate::{
  Error, Result,
  encode::{decode_document, encode_uuid, merge_fields},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A patas document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch the raw fields JSON of one document, if it exists.
  async fn fetch_fields(
    &self,
    collection: &'static str,
    id: Uuid,
  ) -> Result<Option<String>> {
    let id_str = encode_uuid(id);
    let json: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT fields_json FROM documents
               WHERE doc_id = ?1 AND collection = ?2",
              rusqlite::params![id_str, collection],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(json)
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn list<E: Entity>(&self) -> Result<Vec<Document<E>>> {
    let collection = E::COLLECTION;

    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc_id, fields_json FROM documents
           WHERE collection = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, json)| decode_document(&id, &json))
      .collect()
  }

  async fn get<E: Entity>(&self, id: Uuid) -> Result<Option<Document<E>>> {
    let id_str = encode_uuid(id);
    match self.fetch_fields(E::COLLECTION, id).await? {
      Some(json) => Ok(Some(decode_document(&id_str, &json)?)),
      None => Ok(None),
    }
  }

  async fn create<E: Entity>(&self, fields: E) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let id_str = encode_uuid(id);
    let collection = E::COLLECTION;
    let fields_json = serde_json::to_string(&fields)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (doc_id, collection, fields_json)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, collection, fields_json],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  async fn update<E: Entity>(&self, id: Uuid, patch: E::Patch) -> Result<bool> {
    let collection = E::COLLECTION;

    // Read-merge-write: the patch overwrites only the fields it names.
    let Some(existing) = self.fetch_fields(collection, id).await? else {
      return Ok(false);
    };

    let patch_json = serde_json::to_string(&patch)?;
    let merged = merge_fields(&existing, &patch_json)?;

    let id_str = encode_uuid(id);
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET fields_json = ?3
           WHERE doc_id = ?1 AND collection = ?2",
          rusqlite::params![id_str, collection, merged],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete<E: Entity>(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let collection = E::COLLECTION;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE doc_id = ?1 AND collection = ?2",
          rusqlite::params![id_str, collection],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
