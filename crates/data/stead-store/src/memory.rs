//! In-memory backend.
//!
//! Evaluates the same filter DSL the mongo backend pushes down, over plain
//! JSON documents held in insertion order. Used by tests and local
//! development; the contract (tagged errors, ISO timestamps, not-found
//! semantics) is identical to [`crate::MongoStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use stead_core::{CollectionPage, Document, GatewayError, GatewayResult};

use crate::query::{compare_values, lookup_path, Direction, QueryOptions};
use crate::store::{DocumentStore, Invalidations};

#[derive(Default)]
pub struct MemoryStore {
    // Insertion order matters for unsorted query results.
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
    invalidations: Invalidations,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidations(&self) -> &Invalidations {
        &self.invalidations
    }

    fn require_collection(op: &str, collection: &str) -> GatewayResult<()> {
        if collection.is_empty() {
            return Err(GatewayError::store(op, "Collection name is required"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, data: Value, path: &str) -> GatewayResult<Document> {
        Self::require_collection("add-document", collection)?;
        let mut data = match data {
            Value::Object(map) => map,
            _ => {
                return Err(GatewayError::store(
                    "add-document",
                    "Missing required parameters",
                ))
            }
        };
        data.insert("createdAt".into(), Value::String(Utc::now().to_rfc3339()));

        let id = Uuid::new_v4().simple().to_string();
        let stored = Value::Object(data);
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), stored.clone()));

        self.invalidations.signal(path);
        Ok(Document::new(id, stored))
    }

    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>> {
        Self::require_collection("fetch-document", collection)?;
        if id.is_empty() {
            return Err(GatewayError::store(
                "fetch-document",
                "Missing required parameters",
            ));
        }
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(doc_id, data)| Document::new(doc_id.clone(), data.clone()));
        Ok(found)
    }

    async fn query(&self, collection: &str, options: QueryOptions) -> GatewayResult<CollectionPage> {
        Self::require_collection("fetch-collection", collection)?;
        let collections = self.collections.read().await;
        let docs = collections.get(collection).cloned().unwrap_or_default();

        let mut items: Vec<Document> = docs
            .into_iter()
            .filter(|(_, data)| {
                options.filters.iter().all(|filter| {
                    lookup_path(data, &filter.field)
                        .and_then(|field| compare_values(field, &filter.value))
                        .map(|ord| filter.op.accepts(ord))
                        .unwrap_or(false)
                })
            })
            .map(|(id, data)| Document::new(id, data))
            .collect();

        if let Some((field, direction)) = &options.order_by {
            items.sort_by(|a, b| {
                let ord = match (lookup_path(&a.data, field), lookup_path(&b.data, field)) {
                    (Some(x), Some(y)) => compare_values(x, y).unwrap_or(std::cmp::Ordering::Equal),
                    _ => std::cmp::Ordering::Equal,
                };
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit {
            items.truncate(limit);
        }

        Ok(CollectionPage::new(items))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
        path: &str,
    ) -> GatewayResult<Document> {
        Self::require_collection("update-document", collection)?;
        let partial_map = match &partial {
            Value::Object(map) if !id.is_empty() => map.clone(),
            _ => {
                return Err(GatewayError::store(
                    "update-document",
                    "Missing required parameters",
                ))
            }
        };

        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            if let Some((_, data)) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
                if let Value::Object(existing) = data {
                    for (key, value) in partial_map {
                        existing.insert(key, value);
                    }
                    existing.insert("updatedAt".into(), Value::String(Utc::now().to_rfc3339()));
                }
            }
            // A missing id is a silent no-op, matching the mongo backend.
        }

        self.invalidations.signal(path);
        Ok(Document::new(id, partial))
    }

    async fn delete(&self, collection: &str, id: &str, path: &str) -> GatewayResult<()> {
        Self::require_collection("delete-document", collection)?;
        if id.is_empty() {
            return Err(GatewayError::store(
                "delete-document",
                "Missing required parameters",
            ));
        }

        let mut collections = self.collections.write().await;
        let docs = collections.get_mut(collection);
        let position = docs
            .as_ref()
            .and_then(|docs| docs.iter().position(|(doc_id, _)| doc_id == id));

        match (docs, position) {
            (Some(docs), Some(position)) => {
                docs.remove(position);
                self.invalidations.signal(path);
                Ok(())
            }
            _ => Err(GatewayError::store(
                "delete-document",
                "Document does not exist",
            )),
        }
    }
}
