//! Waitlist, subscriber and newsletter endpoints. The SMTP transport is
//! built per request from the environment; confirmation mail failures
//! are logged and never fail the write that triggered them.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use stead_core::{collections, GatewayError};
use stead_mailer::Mailer;
use stead_store::{Filter, QueryOptions};

use crate::routes::{document_json, ApiError};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/waitlist", get(list_waitlist).post(join_waitlist))
        .route("/api/subscribe", post(subscribe))
        .route("/api/newsletter", post(send_newsletter))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WaitlistBody {
    name: String,
    email: String,
    user_type: String,
}

#[derive(Deserialize)]
struct SubscribeBody {
    email: String,
}

#[derive(Deserialize)]
struct NewsletterBody {
    subject: String,
    content: String,
}

fn require_email(email: &str) -> Result<(), ApiError> {
    if email.contains('@') && !email.trim().is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation("A valid email address is required"))
    }
}

async fn list_waitlist(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .store
        .query(collections::WAITLIST, QueryOptions::default())
        .await?;
    let items: Vec<Value> = page.items.iter().map(document_json).collect();
    Ok(Json(json!({ "items": items, "count": page.count })))
}

async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<WaitlistBody>,
) -> Result<impl IntoResponse, ApiError> {
    require_email(&body.email)?;

    let entry = json!({
        "name": body.name,
        "email": body.email,
        "userType": body.user_type,
    });
    let doc = state.store.add(collections::WAITLIST, entry, "/dashboard").await?;

    match Mailer::from_env() {
        Ok(mailer) => {
            if let Err(err) = mailer
                .send_waitlist_notification(&body.name, &body.email, &body.user_type)
                .await
            {
                tracing::warn!(email = %body.email, %err, "waitlist notification failed");
            }
        }
        Err(err) => tracing::warn!(%err, "mailer not configured; skipping notification"),
    }

    Ok(Json(json!({ "success": true, "id": doc.id })))
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubscribeBody>,
) -> Result<impl IntoResponse, ApiError> {
    require_email(&body.email)?;

    let existing = state
        .store
        .query(
            collections::SUBSCRIBERS,
            QueryOptions::filtered(vec![Filter::eq("email", body.email.clone())]),
        )
        .await?;
    if existing.count > 0 {
        return Ok(Json(json!({ "success": true, "message": "Already subscribed" })));
    }

    state
        .store
        .add(
            collections::SUBSCRIBERS,
            json!({ "email": body.email, "status": "active" }),
            "/",
        )
        .await?;

    match Mailer::from_env() {
        Ok(mailer) => {
            if let Err(err) = mailer.send_subscription_confirmation(&body.email).await {
                tracing::warn!(email = %body.email, %err, "subscription confirmation failed");
            }
        }
        Err(err) => tracing::warn!(%err, "mailer not configured; skipping confirmation"),
    }

    Ok(Json(json!({ "success": true })))
}

/// Bcc blast to every subscriber; the newsletter document is recorded
/// only after the send succeeds.
async fn send_newsletter(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewsletterBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.subject.trim().is_empty() || body.content.trim().is_empty() {
        return Err(ApiError::validation("Subject and content are required"));
    }

    let subscribers = state
        .store
        .query(collections::SUBSCRIBERS, QueryOptions::default())
        .await?;
    let recipients: Vec<String> = subscribers
        .items
        .iter()
        .filter_map(|doc| doc.str_field("email").map(str::to_string))
        .collect();
    if recipients.is_empty() {
        return Err(ApiError::validation("No subscribers to send to"));
    }

    let mailer = Mailer::from_env().map_err(|e| GatewayError::config(e.to_string()))?;
    mailer
        .send_newsletter(&body.subject, &body.content, &recipients)
        .await
        .map_err(|e| GatewayError::mail(e.to_string()))?;

    let record: Value = json!({
        "subject": body.subject,
        "content": body.content,
        "recipients": recipients.len(),
    });
    state.store.add(collections::NEWSLETTERS, record, "/").await?;

    Ok(Json(json!({ "success": true, "recipients": recipients.len() })))
}
