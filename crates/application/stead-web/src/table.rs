//! Pure view model for the admin tables: search, recency sort, paging.

use serde_json::Value;

use stead_core::Document;

pub const PAGE_SIZE: usize = 10;

/// Tri-state sort on `createdAt`. Each click advances one state; the
/// fourth click is back to the stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecencySort {
    #[default]
    Unsorted,
    Asc,
    Desc,
}

impl RecencySort {
    pub fn cycle(self) -> Self {
        match self {
            Self::Unsorted => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::Unsorted,
        }
    }
}

/// One page of rows plus the cursor facts the controls need.
#[derive(Debug, Clone)]
pub struct TablePage {
    pub items: Vec<Document>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl TablePage {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Case-insensitive substring match over every top-level string field.
/// An empty query keeps everything.
pub fn search(docs: &[Document], query: &str) -> Vec<Document> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return docs.to_vec();
    }
    docs.iter()
        .filter(|doc| {
            doc.data.as_object().is_some_and(|map| {
                map.values().any(|v| match v {
                    Value::String(s) => s.to_lowercase().contains(&needle),
                    _ => false,
                })
            })
        })
        .cloned()
        .collect()
}

/// Order rows by their `createdAt` stamp. ISO-8601 strings compare
/// correctly lexicographically; rows without a stamp sort first.
pub fn sort_by_recency(docs: &mut [Document], sort: RecencySort) {
    let key = |doc: &Document| doc.str_field("createdAt").unwrap_or("").to_string();
    match sort {
        RecencySort::Unsorted => {}
        RecencySort::Asc => docs.sort_by_key(key),
        RecencySort::Desc => {
            docs.sort_by_key(key);
            docs.reverse();
        }
    }
}

/// Slice out one page. Page numbers are 1-based and clamped into range;
/// an empty set yields a single empty page.
pub fn paginate(docs: &[Document], page: usize) -> TablePage {
    let total_items = docs.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * PAGE_SIZE;
    let items = docs
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect();
    TablePage {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: usize, name: &str, created_at: &str) -> Document {
        Document::new(
            format!("id-{id}"),
            json!({"name": name, "createdAt": created_at, "tokens": id}),
        )
    }

    fn rows(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| doc(i, &format!("Row {i}"), &format!("2026-01-{:02}T00:00:00Z", i % 28 + 1)))
            .collect()
    }

    #[test]
    fn test_page_three_of_twenty_five_has_five_and_no_next() {
        let page = paginate(&rows(25), 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_is_clamped_into_range() {
        let docs = rows(25);
        assert_eq!(paginate(&docs, 0).page, 1);
        assert_eq!(paginate(&docs, 99).page, 3);
        let empty = paginate(&[], 5);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_string_only() {
        let docs = vec![doc(1, "Lekki Flat", "2026-01-01"), doc(2, "Yaba Shop", "2026-01-02")];
        let hits = search(&docs, "lekki");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "id-1");
        assert_eq!(search(&docs, "  ").len(), 2);
    }

    #[test]
    fn test_search_ignores_non_string_fields() {
        let docs = vec![Document::new("n", json!({"name": "Flat", "tokens": 4242}))];
        assert!(search(&docs, "4242").is_empty());
    }

    #[test]
    fn test_sort_cycle_returns_to_stored_order() {
        let sort = RecencySort::default();
        let sort = sort.cycle();
        assert_eq!(sort, RecencySort::Asc);
        let sort = sort.cycle();
        assert_eq!(sort, RecencySort::Desc);
        assert_eq!(sort.cycle(), RecencySort::Unsorted);
    }

    #[test]
    fn test_recency_sort_orders_by_created_at() {
        let mut docs = vec![
            doc(1, "b", "2026-02-01T00:00:00Z"),
            doc(2, "a", "2026-01-01T00:00:00Z"),
        ];
        sort_by_recency(&mut docs, RecencySort::Asc);
        assert_eq!(docs[0].id, "id-2");
        sort_by_recency(&mut docs, RecencySort::Desc);
        assert_eq!(docs[0].id, "id-1");

        let unsorted = vec![doc(1, "b", "2"), doc(2, "a", "1")];
        let mut copy = unsorted.clone();
        sort_by_recency(&mut copy, RecencySort::Unsorted);
        assert_eq!(copy[0].id, unsorted[0].id);
    }
}
