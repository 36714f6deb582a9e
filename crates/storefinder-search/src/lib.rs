//! Store search: the suggestion matcher, the viewport filter, and the
//! per-session state that ties them to a selection on the map.

pub mod matcher;
pub mod normalize;
pub mod session;
pub mod viewport;

pub use matcher::{search_stores, SearchQuery, DEFAULT_LIMIT, MIN_QUERY_CHARS};
pub use normalize::{build_search_haystack, fold_diacritics, normalize_text};
pub use session::{ActiveLocation, LocationKind, SearchSession};
pub use viewport::{features_in_view, Bounds, MIN_VIEWPORT_ZOOM};
