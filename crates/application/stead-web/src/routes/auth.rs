//! Authentication endpoints. The identity client is built per request so
//! a missing provider key fails the call, not process startup.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use stead_auth::{removal_cookies, AuthGateway, SessionContext, SESSION_COOKIE};
use stead_core::{GatewayError, RegistrationData, Role};
use stead_identity::RestIdentityClient;

use crate::routes::ApiError;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/register", post(register))
        .route("/api/auth/register-landlord", post(register_landlord))
        .route("/api/auth/register-renter", post(register_renter))
        .route("/api/auth/signout", post(sign_out))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
}

fn gateway(state: &AppState) -> Result<AuthGateway, ApiError> {
    let identity =
        RestIdentityClient::from_env().map_err(|e| GatewayError::config(e.to_string()))?;
    Ok(AuthGateway::new(
        Arc::new(identity),
        state.store.clone(),
        state.secure_cookies,
    ))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetBody {
    oob_code: String,
    new_password: String,
}

#[derive(Deserialize)]
struct EmailBody {
    email: String,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = gateway(&state)?.sign_in(&body.email, &body.password).await?;
    Ok((
        AppendHeaders([(SET_COOKIE, outcome.cookie.clone())]),
        Json(json!({ "success": true, "userId": outcome.user_id })),
    ))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = gateway(&state)?
        .register(&body.email, &body.password, &body.name)
        .await?;
    Ok((
        AppendHeaders([(SET_COOKIE, outcome.cookie.clone())]),
        Json(json!({ "success": true, "userId": outcome.user_id })),
    ))
}

/// Role registrations persist a profile but mint no session; the client
/// signs in separately.
async fn register_landlord(
    State(state): State<Arc<AppState>>,
    Json(data): Json<RegistrationData>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = gateway(&state)?
        .register_with_role(Role::Landlord, data)
        .await?;
    Ok(Json(json!({ "success": true, "userId": user_id })))
}

async fn register_renter(
    State(state): State<Arc<AppState>>,
    Json(data): Json<RegistrationData>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = gateway(&state)?
        .register_with_role(Role::Renter, data)
        .await?;
    Ok(Json(json!({ "success": true, "userId": user_id })))
}

/// Sign-out never fails outward: the cookies are cleared even when the
/// identity client cannot be built, and provider revocation stays
/// best-effort.
async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let token = cookie_value(&headers, SESSION_COOKIE).unwrap_or_default();
    let session = SessionContext::new("", token);
    let [session_removal, legacy_removal] = teardown_cookies(gateway(&state), &session).await;
    (
        AppendHeaders([(SET_COOKIE, session_removal), (SET_COOKIE, legacy_removal)]),
        Json(json!({ "success": true })),
    )
}

async fn teardown_cookies(
    gateway: Result<AuthGateway, ApiError>,
    session: &SessionContext,
) -> [String; 2] {
    match gateway {
        Ok(gateway) => gateway.sign_out(session).await,
        Err(err) => {
            tracing::warn!(code = %err.0.code, "identity client unavailable; clearing cookies anyway");
            removal_cookies()
        }
    }
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EmailBody>,
) -> Result<impl IntoResponse, ApiError> {
    gateway(&state)?.forgot_password(&body.email).await?;
    Ok(Json(json!({ "success": true })))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetBody>,
) -> Result<impl IntoResponse, ApiError> {
    gateway(&state)?
        .reset_password(&body.oob_code, &body.new_password)
        .await?;
    Ok(Json(json!({ "success": true })))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
