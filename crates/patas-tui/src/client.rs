//! Async HTTP client wrapping the patas JSON API.
//!
//! All methods are generic over the entity type: the collection name on the
//! wire comes from [`Entity::COLLECTION`], so one set of methods covers every
//! screen.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use patas_core::{Document, Entity};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the patas server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Response body of a successful `POST /{collection}`.
#[derive(Deserialize)]
struct Created {
  id: Uuid,
}

/// Async HTTP client for the patas JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /{collection}` — full-collection snapshot in insertion order.
  pub async fn list<E: Entity>(&self) -> Result<Vec<Document<E>>> {
    let path = format!("/{}", E::COLLECTION);
    tracing::debug!(collection = E::COLLECTION, "list");
    let resp = self
      .client
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {path} → {}", resp.status()));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {}", E::COLLECTION))
  }

  /// `POST /{collection}` — returns the store-assigned id.
  pub async fn create<E: Entity>(&self, fields: &E) -> Result<Uuid> {
    let path = format!("/{}", E::COLLECTION);
    let resp = self
      .client
      .post(self.url(&path))
      .json(fields)
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST {path} → {}", resp.status()));
    }
    let created: Created = resp.json().await.context("deserialising create response")?;
    Ok(created.id)
  }

  /// `PATCH /{collection}/{id}` — field-level merge.
  pub async fn update<E: Entity>(&self, id: Uuid, patch: &E::Patch) -> Result<()> {
    let path = format!("/{}/{id}", E::COLLECTION);
    let resp = self
      .client
      .patch(self.url(&path))
      .json(patch)
      .send()
      .await
      .with_context(|| format!("PATCH {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("PATCH {path} → {}", resp.status()));
    }
    Ok(())
  }

  /// `DELETE /{collection}/{id}`
  pub async fn delete<E: Entity>(&self, id: Uuid) -> Result<()> {
    let path = format!("/{}/{id}", E::COLLECTION);
    let resp = self
      .client
      .delete(self.url(&path))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("DELETE {path} → {}", resp.status()));
    }
    Ok(())
  }
}
