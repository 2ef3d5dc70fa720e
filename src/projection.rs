//! Derived, never-persisted views over a collection.
//!
//! [`project`] runs the full pipeline on every call: annotate membership,
//! narrow by category, then narrow by free-text query. [`ProjectionCache`]
//! reuses the previous result only when every input is unchanged.

use std::collections::HashSet;

use crate::models::{ClothingItem, IdSet, ItemView};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Exact, case-sensitive category match. `None` keeps every category.
    pub category: Option<String>,
    /// Case-insensitive substring query. Blank keeps everything.
    pub query: String,
}

impl ViewFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            query: String::new(),
        }
    }

    pub fn query(query: impl Into<String>) -> Self {
        Self {
            category: None,
            query: query.into(),
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    fn needle(&self) -> Option<String> {
        let query = self.query.trim();
        (!query.is_empty()).then(|| query.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Overlays<'a> {
    pub favorites: &'a IdSet,
    pub bookmarks: &'a IdSet,
}

pub fn project(items: &[ClothingItem], filter: &ViewFilter, overlays: Overlays<'_>) -> Vec<ItemView> {
    let needle = filter.needle();
    items
        .iter()
        .map(|item| ItemView {
            is_favorite: overlays.favorites.contains(&item.id),
            is_bookmarked: overlays.bookmarks.contains(&item.id),
            item: item.clone(),
        })
        .filter(|view| {
            filter
                .category
                .as_deref()
                .is_none_or(|category| view.item.category == category)
        })
        .filter(|view| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_query(&view.item, needle))
        })
        .collect()
}

/// `needle` must already be trimmed and lowercased.
pub fn matches_query(item: &ClothingItem, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);
    item.description.as_deref().is_some_and(contains)
        || contains(item.category.as_str())
        || item.tags.iter().any(|tag| contains(tag.as_str()))
        || item.brand.as_deref().is_some_and(contains)
        || item.season.as_deref().is_some_and(contains)
}

/// Distinct categories in first-seen order.
pub fn categories(items: &[ClothingItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.category.as_str()))
        .map(|item| item.category.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectionKey {
    revision: u64,
    overlay_revision: u64,
    filter: ViewFilter,
}

/// Memoizes the last projection, keyed by collection and overlay revisions
/// plus the filter.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    key: Option<ProjectionKey>,
    views: Vec<ItemView>,
    recomputes: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        items: &[ClothingItem],
        revision: u64,
        overlays: Overlays<'_>,
        overlay_revision: u64,
        filter: &ViewFilter,
    ) -> &[ItemView] {
        let key = ProjectionKey {
            revision,
            overlay_revision,
            filter: filter.clone(),
        };
        if self.key.as_ref() != Some(&key) {
            self.views = project(items, filter, overlays);
            self.key = Some(key);
            self.recomputes += 1;
        }
        &self.views
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// How many times the pipeline actually ran.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
