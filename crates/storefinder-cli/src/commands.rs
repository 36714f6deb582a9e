//! Subcommand handlers. Each prints a plain-text table to stdout.

use storefinder_core::{StoreDataset, StoreFeature};
use storefinder_search::{features_in_view, search_stores, Bounds};

/// Print matches for `query`, centers first.
pub(crate) fn run_search(dataset: &StoreDataset, query: &str, limit: usize) {
    let results = search_stores(dataset.features(), query, limit);
    if results.is_empty() {
        println!("no stores match \"{}\"", query.trim());
        return;
    }
    print_features(&results);
}

/// Print features inside `bounds` at `zoom`.
///
/// # Errors
///
/// Returns an error if the bounds are inverted.
pub(crate) fn run_in_view(
    dataset: &StoreDataset,
    bounds: &Bounds,
    zoom: f64,
) -> anyhow::Result<()> {
    if !bounds.is_valid() {
        anyhow::bail!("invalid bounds: west must be <= east and south <= north");
    }

    let visible = features_in_view(dataset.features(), bounds, zoom);
    if visible.is_empty() {
        println!("no stores in view at zoom {zoom}");
        return Ok(());
    }
    print_features(&visible);
    Ok(())
}

pub(crate) fn run_centers(dataset: &StoreDataset) {
    let centers: Vec<&StoreFeature> = dataset
        .features()
        .iter()
        .filter(|f| f.is_shopping_center())
        .collect();

    if centers.is_empty() {
        println!("no shopping centers in dataset");
        return;
    }

    println!("{:<8}{:<32}{:<20}STORES", "ID", "NAME", "CITY");
    for center in centers {
        let Some(props) = center.properties.as_ref() else {
            continue;
        };
        println!(
            "{:<8}{:<32}{:<20}{}",
            center.id().map(ToString::to_string).unwrap_or_default(),
            truncate(props.display_name().unwrap_or("-"), 30),
            props.city.as_deref().unwrap_or("-"),
            props
                .store_count
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        );
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DatasetStats {
    pub features: usize,
    pub malformed: usize,
    pub centers: usize,
    pub stores: usize,
    pub without_coordinates: usize,
}

pub(crate) fn dataset_stats(dataset: &StoreDataset) -> DatasetStats {
    let mut stats = DatasetStats {
        features: dataset.len(),
        malformed: dataset.skipped(),
        ..DatasetStats::default()
    };

    for feature in dataset.features() {
        match feature.properties.as_ref() {
            None => stats.malformed += 1,
            Some(p) if p.is_shopping_center => stats.centers += 1,
            Some(_) => stats.stores += 1,
        }
        if feature.coordinates().is_none() {
            stats.without_coordinates += 1;
        }
    }
    stats
}

pub(crate) fn run_stats(dataset: &StoreDataset) {
    let stats = dataset_stats(dataset);
    println!("features:            {}", stats.features);
    println!("shopping centers:    {}", stats.centers);
    println!("stores:              {}", stats.stores);
    println!("malformed:           {}", stats.malformed);
    println!("without coordinates: {}", stats.without_coordinates);
}

fn print_features(features: &[&StoreFeature]) {
    println!(
        "{:<8}{:<8}{:<32}{:<20}{:<24}",
        "ID", "KIND", "NAME", "CITY", "CENTER"
    );
    for feature in features {
        let Some(props) = feature.properties.as_ref() else {
            continue;
        };
        let kind = if props.is_shopping_center {
            "center"
        } else {
            "store"
        };
        println!(
            "{:<8}{:<8}{:<32}{:<20}{:<24}",
            feature.id().map(ToString::to_string).unwrap_or_default(),
            kind,
            truncate(props.display_name().unwrap_or("-"), 30),
            props.city.as_deref().unwrap_or("-"),
            props.shopping_center.as_deref().unwrap_or("-"),
        );
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars - 3).collect::<String>())
    } else {
        value.to_string()
    }
}
