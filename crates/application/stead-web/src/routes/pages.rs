//! Server-rendered admin pages.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use stead_core::{collections, Document};
use stead_store::QueryOptions;

use crate::routes::{html_escape, wrap_page, ApiError};
use crate::table::{self, RecencySort, TablePage};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/property", get(property_page))
}

#[derive(Deserialize, Default)]
struct TableQuery {
    q: Option<String>,
    page: Option<usize>,
    sort: Option<String>,
}

impl TableQuery {
    fn sort(&self) -> RecencySort {
        match self.sort.as_deref() {
            Some("asc") => RecencySort::Asc,
            Some("desc") => RecencySort::Desc,
            _ => RecencySort::Unsorted,
        }
    }
}

async fn index() -> impl IntoResponse {
    Redirect::to("/dashboard")
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let waitlist = state
        .store
        .query(collections::WAITLIST, QueryOptions::default())
        .await?;

    let growth = growth_by_day(&waitlist.items);
    let page = view(&waitlist.items, &query);

    let mut content = format!(
        "<h1>Dashboard</h1>\n<p>Total waitlist registrations: <strong>{}</strong></p>\n",
        waitlist.count
    );
    content.push_str("<h2>Growth by day</h2>\n<ul>\n");
    for (day, count) in &growth {
        content.push_str(&format!("<li>{}: {}</li>\n", html_escape(day), count));
    }
    content.push_str("</ul>\n");
    content.push_str(&render_table(
        &page,
        &["name", "email", "userType", "createdAt"],
        "/dashboard",
        &query,
    ));

    Ok(Html(wrap_page("Dashboard", &content)))
}

async fn property_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let properties = state
        .store
        .query(collections::PROPERTIES, QueryOptions::default())
        .await?;

    let page = view(&properties.items, &query);

    let mut content = format!(
        "<h1>Properties</h1>\n<p>{} listings</p>\n",
        properties.count
    );
    content.push_str(&render_table(
        &page,
        &["title", "type", "category", "createdAt"],
        "/property",
        &query,
    ));
    content.push_str(
        "<h2>New listing</h2>\n<form method=\"post\" action=\"/api/properties\">\n\
         <input name=\"title\" placeholder=\"Title\">\n\
         <textarea name=\"description\" placeholder=\"Description\"></textarea>\n\
         <input name=\"price\" placeholder=\"Price\">\n\
         <button type=\"submit\">Create</button>\n</form>\n",
    );

    Ok(Html(wrap_page("Properties", &content)))
}

fn view(docs: &[Document], query: &TableQuery) -> TablePage {
    let mut rows = table::search(docs, query.q.as_deref().unwrap_or(""));
    table::sort_by_recency(&mut rows, query.sort());
    table::paginate(&rows, query.page.unwrap_or(1))
}

/// Count registrations per calendar day from the `createdAt` stamps,
/// oldest day first. Rows without a stamp are skipped.
fn growth_by_day(docs: &[Document]) -> Vec<(String, usize)> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for doc in docs {
        if let Some(stamp) = doc.str_field("createdAt") {
            if stamp.len() >= 10 {
                *buckets.entry(stamp[..10].to_string()).or_insert(0) += 1;
            }
        }
    }
    buckets.into_iter().collect()
}

fn render_table(page: &TablePage, columns: &[&str], base: &str, query: &TableQuery) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for doc in &page.items {
        html.push_str("<tr>");
        for column in columns {
            let cell = doc.str_field(column).unwrap_or("");
            html.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    let q = query.q.as_deref().unwrap_or("");
    let sort = query.sort.as_deref().unwrap_or("");
    html.push_str(&format!(
        "<p>Page {} of {} ({} rows)</p>\n",
        page.page, page.total_pages, page.total_items
    ));
    if page.has_prev() {
        html.push_str(&format!(
            "<a href=\"{base}?page={}&q={}&sort={}\">Previous</a>\n",
            page.page - 1,
            html_escape(q),
            html_escape(sort)
        ));
    }
    if page.has_next() {
        html.push_str(&format!(
            "<a href=\"{base}?page={}&q={}&sort={}\">Next</a>\n",
            page.page + 1,
            html_escape(q),
            html_escape(sort)
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_growth_buckets_by_day_in_date_order() {
        let docs = vec![
            Document::new("a", json!({"createdAt": "2026-08-02T10:00:00Z"})),
            Document::new("b", json!({"createdAt": "2026-08-01T09:00:00Z"})),
            Document::new("c", json!({"createdAt": "2026-08-02T23:59:59Z"})),
            Document::new("d", json!({"name": "no stamp"})),
        ];
        let growth = growth_by_day(&docs);
        assert_eq!(
            growth,
            vec![
                ("2026-08-01".to_string(), 1),
                ("2026-08-02".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_render_table_escapes_cell_values() {
        let docs = vec![Document::new(
            "a",
            json!({"name": "<script>alert(1)</script>", "createdAt": "2026-08-01T00:00:00Z"}),
        )];
        let page = table::paginate(&docs, 1);
        let html = render_table(&page, &["name"], "/dashboard", &TableQuery::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_pagination_links_follow_bounds() {
        let docs: Vec<Document> = (0..25)
            .map(|i| Document::new(format!("id-{i}"), json!({"name": format!("Row {i}")})))
            .collect();
        let first = table::paginate(&docs, 1);
        let html = render_table(&first, &["name"], "/dashboard", &TableQuery::default());
        assert!(html.contains("Next"));
        assert!(!html.contains("Previous"));

        let last = table::paginate(&docs, 3);
        let html = render_table(&last, &["name"], "/dashboard", &TableQuery::default());
        assert!(html.contains("Previous"));
        assert!(!html.contains("Next"));
    }
}
