//! Call sequencing for sign-in, registration and password flows.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use stead_core::{collections, GatewayError, GatewayResult, RegistrationData, Role};
use stead_identity::IdentityProvider;
use stead_store::{DocumentStore, Filter, QueryOptions};

use crate::session::{removal_cookies, session_cookie, SessionContext};

/// Successful sign-in or registration: the session context plus the
/// ready-to-set cookie.
#[derive(Debug, Clone, Serialize)]
pub struct SignInOutcome {
    pub user_id: String,
    pub token: String,
    #[serde(skip)]
    pub cookie: String,
}

pub struct AuthGateway {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    secure_cookies: bool,
}

impl AuthGateway {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            identity,
            store,
            secure_cookies,
        }
    }

    /// Authenticate, mint a session, build the cookie.
    pub async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<SignInOutcome> {
        let provider = self
            .identity
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))?;

        let session = SessionContext::new(provider.local_id, provider.id_token);
        Ok(SignInOutcome {
            cookie: session_cookie(&session.token, self.secure_cookies),
            user_id: session.user_id,
            token: session.token,
        })
    }

    /// Create an account, set the display name, mint a session.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> GatewayResult<SignInOutcome> {
        let provider = self
            .identity
            .sign_up(email, password)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))?;
        self.identity
            .update_profile(&provider.id_token, display_name)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))?;

        let session = SessionContext::new(provider.local_id, provider.id_token);
        Ok(SignInOutcome {
            cookie: session_cookie(&session.token, self.secure_cookies),
            user_id: session.user_id,
            token: session.token,
        })
    }

    /// Role-tagged registration. The email-uniqueness pre-check and the
    /// account creation are not atomic: two concurrent registrations with
    /// the same email can both pass the check. Preserved as documented
    /// behavior pending a store-level uniqueness decision.
    ///
    /// No session cookie is minted on this path; the caller signs in
    /// separately.
    pub async fn register_with_role(
        &self,
        role: Role,
        data: RegistrationData,
    ) -> GatewayResult<String> {
        let existing = self
            .store
            .query(
                collections::USERS,
                QueryOptions::filtered(vec![Filter::eq("email", data.email.clone())]),
            )
            .await?;
        if existing.count > 0 {
            return Err(GatewayError::auth("Email already exists"));
        }

        let provider = self
            .identity
            .sign_up(&data.email, &data.password)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))?;
        self.identity
            .update_profile(&provider.id_token, &data.name)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))?;

        // Account now exists at the provider; a profile-write failure
        // leaves it orphaned. Accepted partial-failure mode, logged.
        let profile = data.profile_document(role, &provider.local_id, Utc::now());
        if let Err(err) = self
            .store
            .add(collections::USERS, profile, "/dashboard")
            .await
        {
            tracing::error!(
                user_id = %provider.local_id,
                error = %err,
                "account created but profile write failed"
            );
            return Err(err);
        }

        Ok(provider.local_id)
    }

    /// Best-effort teardown: revoke at the provider, expire both cookies.
    /// Never fails outward.
    pub async fn sign_out(&self, session: &SessionContext) -> [String; 2] {
        if let Err(err) = self.identity.sign_out(&session.token).await {
            tracing::warn!(error = %err, "provider sign-out failed; clearing cookies anyway");
        }
        removal_cookies()
    }

    pub async fn forgot_password(&self, email: &str) -> GatewayResult<()> {
        self.identity
            .send_password_reset(email)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))
    }

    pub async fn reset_password(&self, oob_code: &str, new_password: &str) -> GatewayResult<()> {
        self.identity
            .confirm_password_reset(oob_code, new_password)
            .await
            .map_err(|e| GatewayError::auth(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stead_identity::{IdentityError, ProviderSession};
    use stead_store::MemoryStore;

    /// Provider stub: accepts everything, counts sign-ups.
    struct StubProvider {
        sign_ups: AtomicUsize,
        fail_sign_in: bool,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                sign_ups: AtomicUsize::new(0),
                fail_sign_in: false,
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for StubProvider {
        async fn sign_in_with_password(
            &self,
            _email: &str,
            _password: &str,
        ) -> stead_identity::Result<ProviderSession> {
            if self.fail_sign_in {
                return Err(IdentityError::Provider("INVALID_PASSWORD".into()));
            }
            Ok(ProviderSession {
                local_id: "uid-1".into(),
                id_token: "tok-1".into(),
                display_name: None,
            })
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &str,
        ) -> stead_identity::Result<ProviderSession> {
            let n = self.sign_ups.fetch_add(1, Ordering::SeqCst);
            Ok(ProviderSession {
                local_id: format!("uid-{n}"),
                id_token: format!("tok-{n}"),
                display_name: None,
            })
        }

        async fn update_profile(
            &self,
            _id_token: &str,
            _display_name: &str,
        ) -> stead_identity::Result<()> {
            Ok(())
        }

        async fn send_password_reset(&self, _email: &str) -> stead_identity::Result<()> {
            Ok(())
        }

        async fn confirm_password_reset(
            &self,
            _oob_code: &str,
            _new_password: &str,
        ) -> stead_identity::Result<()> {
            Ok(())
        }

        async fn sign_out(&self, _id_token: &str) -> stead_identity::Result<()> {
            Ok(())
        }
    }

    fn gateway() -> (AuthGateway, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let gateway = AuthGateway::new(Arc::new(StubProvider::new()), store.clone(), false);
        (gateway, store)
    }

    fn registration(email: &str) -> RegistrationData {
        serde_json::from_value(json!({
            "email": email,
            "password": "hunter2",
            "name": "Ada",
            "phone": "+2348000000000",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_mints_session_and_cookie() {
        let (gateway, _) = gateway();
        let outcome = gateway.sign_in("a@b.com", "pw").await.unwrap();
        assert_eq!(outcome.user_id, "uid-1");
        assert!(outcome.cookie.starts_with("admin-session=tok-1;"));
    }

    #[tokio::test]
    async fn test_failed_sign_in_surfaces_provider_message() {
        let store = Arc::new(MemoryStore::new());
        let provider = StubProvider {
            sign_ups: AtomicUsize::new(0),
            fail_sign_in: true,
        };
        let gateway = AuthGateway::new(Arc::new(provider), store, false);

        let err = gateway.sign_in("a@b.com", "bad").await.unwrap_err();
        assert_eq!(err.code, "auth-error");
        assert_eq!(err.message, "INVALID_PASSWORD");
    }

    #[tokio::test]
    async fn test_role_registration_persists_profile_without_password() {
        let (gateway, store) = gateway();
        gateway
            .register_with_role(Role::Landlord, registration("l@b.com"))
            .await
            .unwrap();

        let page = store
            .query(collections::USERS, QueryOptions::default())
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        let profile = &page.items[0].data;
        assert_eq!(profile["role"], "landlord");
        assert_eq!(profile["email"], "l@b.com");
        assert_eq!(profile["phone"], "+2348000000000");
        assert!(profile.get("password").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_fails_registration() {
        let (gateway, _) = gateway();
        gateway
            .register_with_role(Role::Renter, registration("r@b.com"))
            .await
            .unwrap();

        let err = gateway
            .register_with_role(Role::Renter, registration("r@b.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Email already exists");
    }

    // The uniqueness pre-check is not transactional with account
    // creation. This pins the current behavior: two registrations that
    // both pass the check both succeed, leaving duplicate profiles.
    #[tokio::test]
    async fn test_concurrent_registration_race_both_succeed() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(AuthGateway::new(
            Arc::new(StubProvider::new()),
            store.clone(),
            false,
        ));

        let first = {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                gateway
                    .register_with_role(Role::Renter, registration("race@b.com"))
                    .await
            })
        };
        let second = {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                gateway
                    .register_with_role(Role::Renter, registration("race@b.com"))
                    .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        if results.iter().all(|r| r.is_ok()) {
            let page = store
                .query(
                    collections::USERS,
                    QueryOptions::filtered(vec![Filter::eq("email", "race@b.com")]),
                )
                .await
                .unwrap();
            assert_eq!(page.count, 2, "race window produced duplicate profiles");
        } else {
            // One task happened to observe the other's write; still valid.
            assert!(results.iter().any(|r| r.is_ok()));
        }
    }

    #[tokio::test]
    async fn test_sign_out_never_fails_and_clears_both_cookies() {
        let (gateway, _) = gateway();
        let session = SessionContext::new("uid-1", "tok-1");
        let [session_cookie, legacy] = gateway.sign_out(&session).await;
        assert!(session_cookie.contains("Max-Age=0"));
        assert!(legacy.starts_with("user-data=;"));
    }
}
