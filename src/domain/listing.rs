//! In-process filtering and paging of content lists.
//!
//! Lists are fetched whole, newest first, and narrowed here: a free-text
//! search over a few text fields plus exact matches on category, status and
//! tag. Input order is always preserved.

use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: usize = 50;

/// Value of a facet selector meaning "do not filter".
const ANY: &str = "all";

pub trait Searchable {
    /// Text fields searched by `q`.
    fn search_fields(&self) -> Vec<&str>;

    fn category(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListQuery {
    pub fn filter(&self) -> ListFilter {
        ListFilter {
            q: self.q.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            tag: self.tag.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
}

impl ListFilter {
    pub fn search(q: impl Into<String>) -> Self {
        ListFilter { q: Some(q.into()), ..Default::default() }
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if let Some(needle) = active(&self.q) {
            let needle = needle.to_lowercase();
            let hit = item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        // Facets the entity does not carry are ignored
        if let (Some(wanted), Some(category)) = (active_facet(&self.category), item.category()) {
            if !category.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }

        if let (Some(wanted), Some(status)) = (active_facet(&self.status), item.status()) {
            if !status.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }

        if let Some(tag) = active_facet(&self.tag) {
            if !item.tags().iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        true
    }

    pub fn apply<T: Searchable>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn active_facet(value: &Option<String>) -> Option<&str> {
    active(value).filter(|v| !v.eq_ignore_ascii_case(ANY))
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Slices one 1-based page out of `items`. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page { items, page, per_page, total_items, total_pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        title: String,
        excerpt: String,
        category: String,
        tags: Vec<String>,
    }

    impl Searchable for Post {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.title.as_str(), self.excerpt.as_str()]
        }
        fn category(&self) -> Option<&str> {
            Some(self.category.as_str())
        }
        fn tags(&self) -> &[String] {
            &self.tags
        }
    }

    fn post(title: &str, category: &str) -> Post {
        Post {
            title: title.into(),
            excerpt: String::new(),
            category: category.into(),
            tags: vec!["rust".into()],
        }
    }

    #[test]
    fn search_is_case_insensitive_and_order_preserving() {
        let posts = vec![
            post("Async Rust", "dev"),
            post("Gardening", "life"),
            post("Cooking", "life"),
            post("Rust macros", "dev"),
            post("Travel", "life"),
        ];

        let found = ListFilter::search("RUST").apply(posts);
        let titles: Vec<_> = found.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Async Rust", "Rust macros"]);
    }

    #[test]
    fn status_facet_is_ignored_for_entities_without_status() {
        let posts = vec![post("a", "dev"), post("b", "life")];
        let filter = ListFilter { status: Some("unread".into()), ..Default::default() };
        assert_eq!(filter.apply(posts).len(), 2);

        let narrowed = ListFilter {
            status: Some("unread".into()),
            category: Some("dev".into()),
            ..Default::default()
        };
        assert_eq!(narrowed.apply(vec![post("a", "dev"), post("b", "life")]).len(), 1);
    }

    #[test]
    fn category_all_means_no_filter() {
        let posts = vec![post("a", "dev"), post("b", "life")];
        let filter = ListFilter { category: Some("all".into()), ..Default::default() };
        assert_eq!(filter.apply(posts).len(), 2);
    }

    #[test]
    fn category_and_search_combine() {
        let posts = vec![post("Rust", "dev"), post("Rust stew", "life")];
        let filter = ListFilter {
            q: Some("rust".into()),
            category: Some("Life".into()),
            ..Default::default()
        };
        let found = filter.apply(posts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rust stew");
    }

    #[test]
    fn tag_filter_matches_any_tag() {
        let posts = vec![post("a", "dev")];
        let filter = ListFilter { tag: Some("go".into()), ..Default::default() };
        assert!(filter.apply(posts).is_empty());
    }

    #[test]
    fn twenty_items_nine_per_page() {
        let sizes: Vec<usize> = (1..=4)
            .map(|page| paginate((0..20).collect::<Vec<_>>(), page, 9).items.len())
            .collect();
        assert_eq!(sizes, vec![9, 9, 2, 0]);

        let first = paginate((0..20).collect::<Vec<_>>(), 1, 9);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 20);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let page = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2]);
    }
}
