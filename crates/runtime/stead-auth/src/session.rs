//! Session context and cookie minting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "admin-session";
/// Legacy cookie some older clients still hold; deleted on sign-out.
pub const USER_DATA_COOKIE: &str = "user-data";

const MAX_AGE_SECS: u32 = 60 * 60 * 24; // 1 day

/// Explicit session object passed through request handling. Created at
/// sign-in, destroyed at sign-out, never mutated in place. The token is
/// an opaque provider credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: String,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            issued_at: Utc::now(),
        }
    }
}

/// `Set-Cookie` value for a fresh session. HttpOnly, lax same-site,
/// one-day max-age; `Secure` only when serving production traffic.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` values that expire both the session cookie and the
/// legacy user-data cookie.
pub fn removal_cookies() -> [String; 2] {
    [
        format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
        format!("{USER_DATA_COOKIE}=; Path=/; Max-Age=0; SameSite=Lax"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok123", false);
        assert!(cookie.starts_with("admin-session=tok123;"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_only_in_production() {
        assert!(session_cookie("tok", true).ends_with("; Secure"));
    }

    #[test]
    fn test_removal_expires_both_cookies() {
        let [session, legacy] = removal_cookies();
        assert!(session.starts_with("admin-session=;"));
        assert!(session.contains("Max-Age=0"));
        assert!(legacy.starts_with("user-data=;"));
        assert!(legacy.contains("Max-Age=0"));
    }
}
