//! Property and waitlist document endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Number, Value};

use stead_core::{collections, Property};
use stead_store::QueryOptions;

use crate::routes::{document_json, ApiError};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/properties", get(list).post(create))
        .route(
            "/api/properties/:id",
            get(fetch).patch(update).delete(remove),
        )
}

async fn list(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .store
        .query(collections::PROPERTIES, QueryOptions::default())
        .await?;
    let items: Vec<Value> = page.items.iter().map(document_json).collect();
    Ok(Json(json!({ "items": items, "count": page.count })))
}

async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let property = parse_property_input(body).map_err(ApiError::validation)?;
    let data = serde_json::to_value(&property)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let doc = state
        .store
        .add(collections::PROPERTIES, data, "/property")
        .await?;
    Ok(Json(document_json(&doc)))
}

/// Missing documents are `null`, not an error.
async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = state.store.get(collections::PROPERTIES, &id).await?;
    Ok(Json(doc.map(|d| document_json(&d)).unwrap_or(Value::Null)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(partial): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    if !partial.is_object() {
        return Err(ApiError::validation("update body must be an object"));
    }
    let doc = state
        .store
        .update(collections::PROPERTIES, &id, partial, "/property")
        .await?;
    Ok(Json(document_json(&doc)))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .delete(collections::PROPERTIES, &id, "/property")
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// Form clients post numbers as strings; these paths are coerced before
/// the typed parse.
const NUMERIC_PATHS: &[&str] = &[
    "price",
    "rentTokens",
    "rating",
    "location.lat",
    "location.lng",
    "specs.beds",
    "specs.baths",
    "specs.sqft",
    "specs.yearBuilt",
    "policies.securityDeposit",
    "policies.minLeaseLength",
    "policies.maxOccupants",
    "prices.yearlyPrice",
    "prices.leaseLength",
];

/// Coerce, parse and validate a raw property submission.
pub fn parse_property_input(mut input: Value) -> Result<Property, String> {
    coerce_numeric_strings(&mut input);

    let property: Property =
        serde_json::from_value(input).map_err(|e| format!("invalid property: {e}"))?;

    if property.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if property.description.trim().is_empty() {
        return Err("Description is required".to_string());
    }
    if property.price <= 0.0 {
        return Err("Price must be greater than zero".to_string());
    }
    if !property.location.coordinates_in_sync() {
        return Err("Coordinates do not match latitude and longitude".to_string());
    }
    Ok(property)
}

fn coerce_numeric_strings(root: &mut Value) {
    for path in NUMERIC_PATHS {
        if let Some(slot) = lookup_path_mut(root, path) {
            coerce_slot(slot);
        }
    }
    if let Some(Value::Array(coords)) = lookup_path_mut(root, "location.coordinates") {
        for slot in coords {
            coerce_slot(slot);
        }
    }
}

fn coerce_slot(slot: &mut Value) {
    let Value::String(s) = slot else { return };
    let s = s.trim();
    if let Ok(int) = s.parse::<i64>() {
        *slot = Value::Number(int.into());
    } else if let Some(num) = s.parse::<f64>().ok().and_then(Number::from_f64) {
        *slot = Value::Number(num);
    }
}

fn lookup_path_mut<'a>(doc: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Value {
        json!({
            "title": "2 bedroom flat in Lekki",
            "description": "Fully serviced, close to the expressway.",
            "price": "250000",
            "location": {
                "address": "12 Admiralty Way",
                "city": "Lagos",
                "state": "Lagos",
                "country": "Nigeria",
                "coordinates": ["6.4478", "3.4723"],
                "lat": "6.4478",
                "lng": "3.4723"
            },
            "specs": { "beds": "2", "baths": "2", "sqft": "900", "yearBuilt": "2019" },
            "amenities": [
                { "id": "a1", "name": "Smoke alarm", "type": "safety" }
            ],
            "images": ["https://cdn.stead.io/uploads/aabbccdd-front.jpg"],
            "type": "2 bedroom",
            "availableFrom": "2026-09-01",
            "pets": false,
            "furnished": true,
            "parking": true,
            "category": "apartment",
            "host": {
                "id": "h1", "name": "Ada", "avatar": "", "isSuperHost": false,
                "responseRate": 0.9, "responseTime": "1h", "joined": "2024-01-01"
            },
            "policies": {
                "moveInDate": "2026-09-01",
                "leaseTerms": ["12 months"],
                "securityDeposit": "100000",
                "paymentSchedule": "yearly",
                "utilities": ["water"],
                "maintenancePolicy": "landlord",
                "minLeaseLength": "12",
                "maxOccupants": "4"
            },
            "prices": { "yearlyPrice": "3000000", "leaseLength": "12" },
            "rentTokens": "3"
        })
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let property = parse_property_input(listing()).unwrap();
        assert_eq!(property.price, 250000.0);
        assert_eq!(property.specs.beds, 2);
        assert_eq!(property.location.lat, 6.4478);
        assert_eq!(property.rent_tokens, 3);
        assert_eq!(property.prices.yearly_price, 3_000_000.0);
    }

    #[test]
    fn test_coordinates_must_match_lat_lng() {
        let mut input = listing();
        input["location"]["coordinates"] = json!([1.0, 2.0]);
        let err = parse_property_input(input).unwrap_err();
        assert_eq!(err, "Coordinates do not match latitude and longitude");
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut input = listing();
        input["title"] = json!("   ");
        assert_eq!(parse_property_input(input).unwrap_err(), "Title is required");
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut input = listing();
        input["price"] = json!("0");
        assert_eq!(
            parse_property_input(input).unwrap_err(),
            "Price must be greater than zero"
        );
    }

    #[test]
    fn test_native_numbers_pass_through() {
        let mut input = listing();
        input["price"] = json!(180000.5);
        let property = parse_property_input(input).unwrap();
        assert_eq!(property.price, 180000.5);
    }
}
