//! Users and waitlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Role tag written into the profile document on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Landlord,
    Renter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Landlord => "landlord",
            Role::Renter => "renter",
        }
    }
}

/// Registration input. The password is write-only: it is consumed by the
/// identity provider and stripped before the profile document is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationData {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Extra profile fields carried into the stored document as-is.
    #[serde(flatten)]
    pub extra: Value,
}

impl RegistrationData {
    /// Profile document for persistence: role tag, creation timestamp,
    /// every registration field except the password.
    pub fn profile_document(&self, role: Role, user_id: &str, created_at: DateTime<Utc>) -> Value {
        let mut doc = json!({
            "role": role.as_str(),
            "userId": user_id,
            "email": self.email,
            "name": self.name,
            "createdAt": created_at.to_rfc3339(),
        });
        if let (Some(target), Some(extra)) = (doc.as_object_mut(), self.extra.as_object()) {
            for (key, value) in extra {
                if key != "password" {
                    target.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        doc
    }
}

/// Stored profile, as read back from the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub user_id: String,
    pub created_at: String,
}

/// Read-only waitlist entry used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub joined_date: String,
    pub created_at: String,
}
