//! Named document collections.

pub const PROPERTIES: &str = "properties";
pub const USERS: &str = "users";
pub const WAITLIST: &str = "waitlist";
pub const SUBSCRIBERS: &str = "subscribers";
pub const NEWSLETTERS: &str = "newsletters";
