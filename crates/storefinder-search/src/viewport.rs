//! Stores visible in the current map viewport.

use std::collections::HashSet;

use storefinder_core::{Coordinates, StoreFeature};

/// Below this (rounded) zoom level the viewport list is empty. Non-finite
/// zoom values count as below it.
pub const MIN_VIEWPORT_ZOOM: f64 = 10.0;

/// Label used in the dedup key of records that have neither id nor name.
const UNNAMED: &str = "ukjent";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.longitude >= self.west
            && point.longitude <= self.east
            && point.latitude >= self.south
            && point.latitude <= self.north
    }

    /// `west <= east` and `south <= north`, with no NaN edges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.west <= self.east && self.south <= self.north
    }
}

/// Features inside `bounds`, in dataset order, without duplicates.
///
/// Duplicates share an id, or, for records without one, the same
/// `"<lng>,<lat>-<name>"` key.
#[must_use]
pub fn features_in_view<'a>(
    features: &'a [StoreFeature],
    bounds: &Bounds,
    zoom: f64,
) -> Vec<&'a StoreFeature> {
    if !zoom.is_finite() || zoom.round() < MIN_VIEWPORT_ZOOM {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut visible = Vec::new();

    for feature in features {
        let Some(properties) = feature.properties.as_ref() else {
            continue;
        };
        let Some(coords) = feature.coordinates() else {
            continue;
        };
        if !bounds.contains(coords) {
            continue;
        }

        let key = properties.id.as_ref().map_or_else(
            || {
                format!(
                    "{},{}-{}",
                    coords.longitude,
                    coords.latitude,
                    properties.name.as_deref().unwrap_or(UNNAMED)
                )
            },
            ToString::to_string,
        );

        if seen.insert(key) {
            visible.push(feature);
        }
    }

    visible
}
