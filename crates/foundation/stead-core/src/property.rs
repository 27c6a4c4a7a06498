//! Property listing entity
//!
//! The full listing document: nested location, specs, host profile,
//! policies and price plan. Field names follow the wire format the
//! admin UI and the document store already share (camelCase).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Location,
    pub specs: Specs,
    pub amenities: Vec<Amenity>,
    pub images: Vec<String>,
    /// Listing kind, e.g. "Self contained", "2 bedroom", "Shop".
    #[serde(rename = "type")]
    pub kind: String,
    pub available_from: String,
    pub pets: bool,
    pub furnished: bool,
    pub parking: bool,
    #[serde(default)]
    pub rating: f64,
    pub category: String,
    pub host: Host,
    pub policies: Policies,
    pub prices: PricePlan,
    /// Tokens required to view the contact details.
    pub rent_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

/// Nested location. `coordinates` is always a `[lat, lng]` pair kept in
/// sync with the `lat`/`lng` fields; mutate through [`Location::set_coordinates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub coordinates: [f64; 2],
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn set_coordinates(&mut self, lat: f64, lng: f64) {
        self.lat = lat;
        self.lng = lng;
        self.coordinates = [lat, lng];
    }

    pub fn coordinates_in_sync(&self) -> bool {
        self.coordinates == [self.lat, self.lng]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specs {
    pub beds: u32,
    pub baths: u32,
    pub sqft: u32,
    pub year_built: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityKind {
    Essential,
    Feature,
    Safety,
    Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AmenityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_super_host: bool,
    pub response_rate: f64,
    pub response_time: String,
    pub joined: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentSchedule {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policies {
    pub move_in_date: String,
    pub lease_terms: Vec<String>,
    pub security_deposit: f64,
    pub payment_schedule: PaymentSchedule,
    pub utilities: Vec<String>,
    pub maintenance_policy: String,
    pub min_lease_length: u32,
    pub max_occupants: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePlan {
    pub yearly_price: f64,
    /// Minimum lease length in months.
    pub lease_length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_coordinates_keeps_pair_in_sync() {
        let mut loc = Location {
            address: String::new(),
            city: String::new(),
            state: String::new(),
            country: "Nigeria".into(),
            coordinates: [0.0, 0.0],
            lat: 0.0,
            lng: 0.0,
        };
        loc.set_coordinates(9.082, 8.6753);
        assert!(loc.coordinates_in_sync());
        assert_eq!(loc.coordinates, [9.082, 8.6753]);
    }

    #[test]
    fn test_property_wire_format_uses_camel_case() {
        let plan = PricePlan {
            yearly_price: 1_200_000.0,
            lease_length: 12,
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("yearlyPrice").is_some());
        assert!(json.get("leaseLength").is_some());
    }

    #[test]
    fn test_amenity_kind_round_trips_lowercase() {
        let amenity = Amenity {
            id: "a1".into(),
            name: "Smoke alarm".into(),
            kind: AmenityKind::Safety,
            icon: None,
        };
        let json = serde_json::to_value(&amenity).unwrap();
        assert_eq!(json["type"], "safety");
        let back: Amenity = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, AmenityKind::Safety);
    }
}
