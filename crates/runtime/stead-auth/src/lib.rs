//! Stead Auth
//!
//! The authentication gateway only sequences calls: the state machine
//! itself lives in the identity provider. Session state is an explicit
//! [`SessionContext`] created at sign-in and destroyed at sign-out,
//! carried as an opaque bearer token in the `admin-session` cookie.

pub mod gateway;
pub mod session;

pub use gateway::{AuthGateway, SignInOutcome};
pub use session::{removal_cookies, session_cookie, SessionContext, SESSION_COOKIE, USER_DATA_COOKIE};
