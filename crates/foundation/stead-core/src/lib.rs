//! Stead Core
//!
//! Shared entities and the tagged error contract used by every gateway.
//! Nothing platform-specific lives here: no bson, no provider payloads.

pub mod collections;
pub mod document;
pub mod error;
pub mod file;
pub mod property;
pub mod user;

pub use document::{CollectionPage, Document};
pub use error::{GatewayError, GatewayResult};
pub use file::FileMetadata;
pub use property::{Amenity, AmenityKind, ContactInfo, Host, Location, Policies, PricePlan, Property, Specs};
pub use user::{RegistrationData, Role, UserProfile, WaitlistEntry};
