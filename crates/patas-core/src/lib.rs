//! Core types and trait definitions for the patas pet-care console.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entity;
pub mod patch;
pub mod store;
pub mod view;

pub use entity::{Document, Entity};
pub use store::DocumentStore;
