//! Per-session search state: the current query, its suggestions, and what
//! the map should be focused on.

use storefinder_core::{Coordinates, StoreFeature};

use crate::matcher::{search_stores, DEFAULT_LIMIT};

/// Why the map is centered where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// The user's own position.
    User,
    /// A search suggestion the user picked.
    Search,
    /// A store picked from the map or the list.
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLocation {
    pub coords: Coordinates,
    pub kind: LocationKind,
}

#[derive(Debug)]
pub struct SearchSession<'a> {
    dataset: &'a [StoreFeature],
    limit: usize,
    search_value: String,
    suggestions: Vec<&'a StoreFeature>,
    active_feature: Option<&'a StoreFeature>,
    active_location: Option<ActiveLocation>,
}

impl<'a> SearchSession<'a> {
    #[must_use]
    pub fn new(dataset: &'a [StoreFeature]) -> Self {
        Self::with_limit(dataset, DEFAULT_LIMIT)
    }

    #[must_use]
    pub fn with_limit(dataset: &'a [StoreFeature], limit: usize) -> Self {
        Self {
            dataset,
            limit,
            search_value: String::new(),
            suggestions: Vec::new(),
            active_feature: None,
            active_location: None,
        }
    }

    #[must_use]
    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    #[must_use]
    pub fn suggestions(&self) -> &[&'a StoreFeature] {
        &self.suggestions
    }

    #[must_use]
    pub fn active_feature(&self) -> Option<&'a StoreFeature> {
        self.active_feature
    }

    #[must_use]
    pub fn active_location(&self) -> Option<ActiveLocation> {
        self.active_location
    }

    /// Replace the search value and recompute suggestions.
    pub fn set_search_value(&mut self, value: impl Into<String>) -> &[&'a StoreFeature] {
        self.search_value = value.into();
        self.suggestions = search_stores(self.dataset, &self.search_value, self.limit);
        &self.suggestions
    }

    /// Pick the suggestion at `index`: it becomes the active feature and the
    /// map moves to it. Suggestions are cleared.
    ///
    /// Returns `None` and leaves the session untouched when `index` is out of
    /// range.
    pub fn select_suggestion(&mut self, index: usize) -> Option<&'a StoreFeature> {
        let feature = *self.suggestions.get(index)?;
        self.suggestions.clear();
        self.active_feature = Some(feature);
        if let Some(coords) = feature.coordinates() {
            self.active_location = Some(ActiveLocation {
                coords,
                kind: LocationKind::Search,
            });
        }
        Some(feature)
    }

    /// Clicking the active store again deselects it; clicking another store
    /// selects that one.
    pub fn toggle_feature(&mut self, feature: &'a StoreFeature) {
        let same = match (self.active_feature, feature.id()) {
            (Some(active), Some(id)) => active.id() == Some(id),
            (Some(active), None) => std::ptr::eq(active, feature),
            (None, _) => false,
        };

        if same {
            self.active_feature = None;
            return;
        }

        self.active_feature = Some(feature);
        if let Some(coords) = feature.coordinates() {
            self.active_location = Some(ActiveLocation {
                coords,
                kind: LocationKind::Store,
            });
        }
    }

    pub fn set_user_location(&mut self, coords: Coordinates) {
        self.active_location = Some(ActiveLocation {
            coords,
            kind: LocationKind::User,
        });
    }

    /// Reset the query, suggestions, and selection. The active location is
    /// kept so the map does not jump.
    pub fn clear(&mut self) {
        self.search_value.clear();
        self.suggestions.clear();
        self.active_feature = None;
    }
}
