//! Bson-to-plain-JSON normalization.
//!
//! Invariant of the gateway: no driver-native timestamp type ever crosses
//! the boundary. Every `Bson::DateTime` (and the internal `Timestamp`)
//! becomes an ISO-8601 string; ObjectIds become hex strings; documents and
//! arrays are rebuilt as plain JSON, which also strips any non-plain
//! wrapper types the driver may hand back.

use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

/// Convert a whole document, dropping the `_id` key (the caller carries
/// the id separately).
pub fn document_to_plain(doc: BsonDocument) -> Value {
    let map: Map<String, Value> = doc
        .into_iter()
        .filter(|(key, _)| key != "_id")
        .map(|(key, value)| (key, bson_to_plain(value)))
        .collect();
    Value::Object(map)
}

pub fn bson_to_plain(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_plain(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_plain).collect()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        Bson::Timestamp(ts) => {
            let stamp = DateTime::<Utc>::from_timestamp(i64::from(ts.time), 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| ts.time.to_string());
            Value::String(stamp)
        }
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::Number(n.into()),
        Bson::Int64(n) => Value::Number(n.into()),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null => Value::Null,
        other => serde_json::to_value(&other).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_datetime_becomes_iso8601_string() {
        let now = bson::DateTime::now();
        let doc = doc! { "createdAt": now, "title": "flat" };
        let plain = document_to_plain(doc);
        let stamp = plain["createdAt"].as_str().expect("string timestamp");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_nested_datetimes_are_normalized() {
        let doc = doc! {
            "host": { "joined": bson::DateTime::now() },
            "reviews": [ { "date": bson::DateTime::now() } ],
        };
        let plain = document_to_plain(doc);
        assert!(plain["host"]["joined"].is_string());
        assert!(plain["reviews"][0]["date"].is_string());
    }

    #[test]
    fn test_id_key_is_dropped() {
        let doc = doc! { "_id": bson::oid::ObjectId::new(), "a": 1 };
        let plain = document_to_plain(doc);
        assert!(plain.get("_id").is_none());
        assert_eq!(plain["a"], 1);
    }

    #[test]
    fn test_scalars_survive_unchanged() {
        let doc = doc! { "n": 2_i32, "big": 5_i64, "f": 1.5, "flag": true, "s": "x" };
        let plain = document_to_plain(doc);
        assert_eq!(plain["n"], 2);
        assert_eq!(plain["big"], 5);
        assert_eq!(plain["f"], 1.5);
        assert_eq!(plain["flag"], true);
        assert_eq!(plain["s"], "x");
    }
}
