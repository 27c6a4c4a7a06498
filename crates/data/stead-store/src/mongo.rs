//! MongoDB backend.
//!
//! Thin translation layer: the filter DSL becomes a mongo filter document,
//! results are normalized through [`crate::normalize`] so callers never see
//! driver types. Driver errors are swallowed into tagged `{code, message}`
//! values per operation.

use async_trait::async_trait;
use bson::{doc, Bson, Document as BsonDocument};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{Client, Database};
use serde_json::Value;

use stead_config::StoreConfig;
use stead_core::{CollectionPage, Document, GatewayError, GatewayResult};

use crate::normalize::document_to_plain;
use crate::query::{Direction, QueryOptions};
use crate::store::{DocumentStore, Invalidations};

pub struct MongoStore {
    db: Database,
    invalidations: Invalidations,
}

impl MongoStore {
    /// Connect using environment configuration.
    pub async fn connect(config: &StoreConfig) -> GatewayResult<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| GatewayError::store("connect", e.to_string()))?;
        Ok(Self {
            db: client.database(&config.database),
            invalidations: Invalidations::new(),
        })
    }

    pub fn invalidations(&self) -> &Invalidations {
        &self.invalidations
    }

    fn collection(&self, name: &str) -> mongodb::Collection<BsonDocument> {
        self.db.collection::<BsonDocument>(name)
    }

    fn require_collection(op: &str, collection: &str) -> GatewayResult<()> {
        if collection.is_empty() {
            return Err(GatewayError::store(op, "Collection name is required"));
        }
        Ok(())
    }

    fn object_id(op: &str, id: &str) -> GatewayResult<bson::oid::ObjectId> {
        bson::oid::ObjectId::parse_str(id)
            .map_err(|_| GatewayError::store(op, "Document does not exist"))
    }

    fn to_bson_document(op: &str, value: &Value) -> GatewayResult<BsonDocument> {
        if !value.is_object() {
            return Err(GatewayError::store(op, "Missing required parameters"));
        }
        bson::to_document(value).map_err(|e| GatewayError::store(op, e.to_string()))
    }

    fn filter_document(options: &QueryOptions) -> GatewayResult<BsonDocument> {
        if options.filters.is_empty() {
            return Ok(BsonDocument::new());
        }
        let clauses: Vec<Bson> = options
            .filters
            .iter()
            .map(|filter| {
                let value = bson::to_bson(&filter.value)
                    .map_err(|e| GatewayError::store("fetch-collection", e.to_string()))?;
                Ok(Bson::Document(doc! {
                    filter.field.clone(): { filter.op.mongo_op(): value }
                }))
            })
            .collect::<GatewayResult<_>>()?;
        Ok(doc! { "$and": clauses })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn add(&self, collection: &str, data: Value, path: &str) -> GatewayResult<Document> {
        Self::require_collection("add-document", collection)?;
        let mut doc = Self::to_bson_document("add-document", &data)?;
        doc.insert("createdAt", Utc::now().to_rfc3339());

        let result = self
            .collection(collection)
            .insert_one(doc.clone())
            .await
            .map_err(|e| GatewayError::store("add-document", e.to_string()))?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        self.invalidations.signal(path);
        Ok(Document::new(id, document_to_plain(doc)))
    }

    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>> {
        Self::require_collection("fetch-document", collection)?;
        if id.is_empty() {
            return Err(GatewayError::store(
                "fetch-document",
                "Missing required parameters",
            ));
        }
        // An id the store could never have minted is simply absent.
        let Ok(oid) = bson::oid::ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let found = self
            .collection(collection)
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| GatewayError::store("fetch-document", e.to_string()))?;

        Ok(found.map(|doc| Document::new(id, document_to_plain(doc))))
    }

    async fn query(&self, collection: &str, options: QueryOptions) -> GatewayResult<CollectionPage> {
        Self::require_collection("fetch-collection", collection)?;
        let filter = Self::filter_document(&options)?;

        let coll = self.collection(collection);
        let mut find = coll.find(filter);
        if let Some((field, direction)) = &options.order_by {
            let order = match direction {
                Direction::Asc => 1,
                Direction::Desc => -1,
            };
            find = find.sort(doc! { field.clone(): order });
        }
        if let Some(limit) = options.limit {
            find = find.limit(limit as i64);
        }

        let cursor = find
            .await
            .map_err(|e| GatewayError::store("fetch-collection", e.to_string()))?;
        let docs: Vec<BsonDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| GatewayError::store("fetch-collection", e.to_string()))?;

        let items = docs
            .into_iter()
            .map(|doc| {
                let id = doc
                    .get_object_id("_id")
                    .map(|oid| oid.to_hex())
                    .unwrap_or_default();
                Document::new(id, document_to_plain(doc))
            })
            .collect();

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
        if id.is_empty() {
            return Err(GatewayError::store(
                "update-document",
                "Missing required parameters",
            ));
        }
        let oid = Self::object_id("update-document", id)?;
        let mut set = Self::to_bson_document("update-document", &partial)?;
        set.insert("updatedAt", Utc::now().to_rfc3339());

        // No existence pre-check: zero matched documents is a silent no-op.
        self.collection(collection)
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await
            .map_err(|e| GatewayError::store("update-document", e.to_string()))?;

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
        let oid = Self::object_id("delete-document", id)?;

        let existing = self
            .collection(collection)
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| GatewayError::store("delete-document", e.to_string()))?;
        if existing.is_none() {
            return Err(GatewayError::store(
                "delete-document",
                "Document does not exist",
            ));
        }

        self.collection(collection)
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| GatewayError::store("delete-document", e.to_string()))?;

        self.invalidations.signal(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, FilterOp};
    use serde_json::json;

    #[test]
    fn test_filter_dsl_translates_to_mongo_operators() {
        let options = QueryOptions::filtered(vec![
            Filter::new("a", FilterOp::Gt, 1),
            Filter::eq("email", "x@y.com"),
        ]);
        let filter = MongoStore::filter_document(&options).unwrap();
        let clauses = filter.get_array("$and").unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0].as_document().unwrap(),
            &doc! { "a": { "$gt": 1_i64 } }
        );
        assert_eq!(
            clauses[1].as_document().unwrap(),
            &doc! { "email": { "$eq": "x@y.com" } }
        );
    }

    #[test]
    fn test_empty_filters_produce_empty_document() {
        let filter = MongoStore::filter_document(&QueryOptions::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = MongoStore::to_bson_document("add-document", &json!([1, 2])).unwrap_err();
        assert_eq!(err.code, "add-document-error");
        assert_eq!(err.message, "Missing required parameters");
    }
}
