pub mod auth;
pub mod health;
pub mod mail;
pub mod pages;
pub mod properties;
pub mod uploads;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use stead_core::{Document, GatewayError};

/// HTML-escape a string to prevent XSS in hand-built HTML responses.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wrap page content in the base shell.
pub fn wrap_page(title: &str, content: &str) -> String {
    let base = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Stead Admin | __TITLE__</title>
</head>
<body>
    <nav class="sidebar">
        <span class="logo-text">Stead Admin</span>
        <ul class="nav-links">
            <li><a href="/dashboard">Dashboard</a></li>
            <li><a href="/property">Properties</a></li>
        </ul>
    </nav>
    <main id="main">
__CONTENT__
    </main>
</body>
</html>"##;
    base.replace("__TITLE__", &html_escape(title))
        .replace("__CONTENT__", content)
}

/// JSON body for a document: the data object with the id merged in.
pub fn document_json(doc: &Document) -> serde_json::Value {
    let mut body = doc.data.clone();
    if let Some(map) = body.as_object_mut() {
        map.insert("id".to_string(), serde_json::Value::String(doc.id.clone()));
    }
    body
}

/// Uniform API failure: the tagged `{code, message}` body with a status
/// derived from the code.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(GatewayError::new("validation-error", message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::error!(code = %self.0.code, message = %self.0.message, "request failed");
        (status, Json(self.0)).into_response()
    }
}

fn status_for(error: &GatewayError) -> StatusCode {
    match error.code.as_str() {
        "auth-error" if error.message == "Email already exists" => StatusCode::CONFLICT,
        "auth-error" => StatusCode::UNAUTHORIZED,
        "validation-error" => StatusCode::UNPROCESSABLE_ENTITY,
        "delete-document-error" if error.message == "Document does not exist" => {
            StatusCode::NOT_FOUND
        }
        "upload-error" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_escape_neutralizes_markup() {
        assert_eq!(
            html_escape(r#"<b onclick="x('y')">&</b>"#),
            "&lt;b onclick=&quot;x(&#x27;y&#x27;)&quot;&gt;&amp;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_document_json_merges_id() {
        let doc = Document::new("abc", json!({"title": "Flat"}));
        let body = document_json(&doc);
        assert_eq!(body["id"], "abc");
        assert_eq!(body["title"], "Flat");
    }

    #[test]
    fn test_status_mapping_by_code() {
        assert_eq!(
            status_for(&GatewayError::auth("Invalid password")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&GatewayError::auth("Email already exists")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&GatewayError::store("delete-document", "Document does not exist")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&GatewayError::store("fetch-collection", "network down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
