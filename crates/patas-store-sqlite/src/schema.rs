//! SQL schema for the patas SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// One table holds every collection — the store is schemaless by contract,
/// so the typed shape of a document lives entirely in `fields_json`.
/// Insertion order (rowid) is the only list order the store promises.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS documents (
    doc_id      TEXT PRIMARY KEY,
    collection  TEXT NOT NULL,   -- 'animals' | 'tutors' | 'services' | ...
    fields_json TEXT NOT NULL    -- JSON object; merged on update
);

CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents(collection);

PRAGMA user_version = 1;
";
