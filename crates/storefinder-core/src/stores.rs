//! Store dataset types and the GeoJSON loader.
//!
//! The dataset is a GeoJSON `FeatureCollection` whose feature `properties`
//! carry the store fields in camelCase. It is parsed once at startup and
//! treated as read-only afterwards.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier of a store record. Datasets use both string and numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreId {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreId::Text(s) => write!(f, "{s}"),
            StoreId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Properties of a single location.
///
/// A center record has `is_shopping_center` set and describes itself; a store
/// record names its parent center through `shopping_center`.
///
/// Hand-maintained datasets mix value types (`"zipCode": 550`,
/// `"storeCount": "70"`), so text fields accept any JSON scalar and
/// `store_count` accepts a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub id: Option<StoreId>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    /// Brand/chain name.
    #[serde(default, deserialize_with = "scalar_text")]
    pub butikk: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub address_line: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub shopping_center: Option<String>,
    #[serde(default)]
    pub is_shopping_center: bool,
    /// Only meaningful when `is_shopping_center` is true.
    #[serde(default, deserialize_with = "scalar_count")]
    pub store_count: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }),
    )
}

/// Non-numeric or out-of-range counts read as absent.
fn scalar_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.and_then(|value| match value {
            Scalar::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }),
    )
}

impl StoreRecord {
    /// Best display label: `name`, then `butikk`, then `shopping_center`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.butikk, &self.shopping_center]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `[longitude, latitude]` as in GeoJSON.
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// One GeoJSON feature. Features without `properties` are malformed and
/// ignored by every consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreFeature {
    pub properties: Option<StoreRecord>,
    pub geometry: Option<Geometry>,
}

impl StoreFeature {
    #[must_use]
    pub fn new(properties: StoreRecord, coordinates: Option<Coordinates>) -> Self {
        Self {
            properties: Some(properties),
            geometry: coordinates.map(|c| Geometry {
                kind: Some("Point".to_string()),
                coordinates: vec![c.longitude, c.latitude],
            }),
        }
    }

    /// Longitude/latitude pair, if the geometry carries at least two values.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = &self.geometry.as_ref()?.coordinates;
        match coords.as_slice() {
            [longitude, latitude, ..] => Some(Coordinates {
                longitude: *longitude,
                latitude: *latitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&StoreId> {
        self.properties.as_ref()?.id.as_ref()
    }

    #[must_use]
    pub fn is_shopping_center(&self) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|p| p.is_shopping_center)
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read store dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

/// The loaded, read-only list of features in dataset order.
#[derive(Debug, Clone, Default)]
pub struct StoreDataset {
    features: Vec<StoreFeature>,
    skipped: usize,
}

impl StoreDataset {
    #[must_use]
    pub fn features(&self) -> &[StoreFeature] {
        &self.features
    }

    /// Features dropped at load time because they did not have feature shape.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a feature by the string form of its id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&StoreFeature> {
        self.features
            .iter()
            .find(|f| f.id().is_some_and(|fid| fid.to_string() == id))
    }
}

/// Parse a GeoJSON `FeatureCollection` into a [`StoreDataset`].
///
/// Individual features that cannot be decoded are skipped and counted rather
/// than failing the whole dataset.
///
/// # Errors
///
/// Returns [`DatasetError::Parse`] if the document itself is not a JSON
/// object with an optional `features` array.
pub fn parse_store_dataset(json: &str) -> Result<StoreDataset, DatasetError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;

    let mut skipped = 0;
    let mut features = Vec::with_capacity(collection.features.len());
    for (index, value) in collection.features.into_iter().enumerate() {
        match serde_json::from_value::<StoreFeature>(value) {
            Ok(feature) => features.push(feature),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable store feature");
                skipped += 1;
            }
        }
    }

    let missing_properties = features.iter().filter(|f| f.properties.is_none()).count();
    if missing_properties > 0 {
        tracing::warn!(
            missing_properties,
            "store dataset contains features without properties"
        );
    }

    Ok(StoreDataset { features, skipped })
}

/// Load and parse the store dataset from a GeoJSON file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_store_dataset(path: &Path) -> Result<StoreDataset, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let dataset = parse_store_dataset(&content)?;
    tracing::info!(
        path = %path.display(),
        features = dataset.len(),
        skipped = dataset.skipped(),
        "loaded store dataset"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [10.75, 59.91] },
                "properties": {
                    "id": "1",
                    "name": "Elkjøp",
                    "butikk": "Elkjøp",
                    "city": "Oslo",
                    "zipCode": "0150",
                    "shoppingCenter": "Oslo City"
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [10.76, 59.92] },
                "properties": {
                    "id": 2,
                    "name": "Oslo City",
                    "isShoppingCenter": true,
                    "storeCount": 93
                }
            },
            { "type": "Feature", "geometry": null },
            "not a feature"
        ]
    }"#;

    #[test]
    fn parses_string_and_numeric_ids() {
        let dataset = parse_store_dataset(SAMPLE).unwrap();
        assert_eq!(dataset.features()[0].id().unwrap().to_string(), "1");
        assert_eq!(dataset.features()[1].id().unwrap().to_string(), "2");
    }

    #[test]
    fn parses_camel_case_properties() {
        let dataset = parse_store_dataset(SAMPLE).unwrap();
        let store = dataset.features()[0].properties.as_ref().unwrap();
        assert_eq!(store.zip_code.as_deref(), Some("0150"));
        assert_eq!(store.shopping_center.as_deref(), Some("Oslo City"));
        assert!(!store.is_shopping_center);

        let center = dataset.features()[1].properties.as_ref().unwrap();
        assert!(center.is_shopping_center);
        assert_eq!(center.store_count, Some(93));
    }

    #[test]
    fn keeps_features_without_properties_and_skips_undecodable_ones() {
        let dataset = parse_store_dataset(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.features()[2].properties.is_none());
        assert_eq!(dataset.skipped(), 1);
    }

    #[test]
    fn coordinates_are_longitude_then_latitude() {
        let dataset = parse_store_dataset(SAMPLE).unwrap();
        let coords = dataset.features()[0].coordinates().unwrap();
        assert!((coords.longitude - 10.75).abs() < f64::EPSILON);
        assert!((coords.latitude - 59.91).abs() < f64::EPSILON);
        assert!(dataset.features()[2].coordinates().is_none());
    }

    #[test]
    fn missing_features_array_is_empty_dataset() {
        let dataset = parse_store_dataset(r#"{"type":"FeatureCollection"}"#).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_store_dataset("{ not json").unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }

    #[test]
    fn load_store_dataset_reports_missing_file() {
        let err = load_store_dataset(Path::new("/nonexistent/steder.geojson")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/steder.geojson"));
    }

    #[test]
    fn find_by_id_matches_string_form() {
        let dataset = parse_store_dataset(SAMPLE).unwrap();
        let center = dataset.find_by_id("2").unwrap();
        assert!(center.is_shopping_center());
        assert!(dataset.find_by_id("999").is_none());
    }

    #[test]
    fn scalar_values_are_coerced_instead_of_dropping_the_feature() {
        let dataset = parse_store_dataset(
            r#"{"features": [
                {"properties": {"id": 7, "name": "Kiwi Grünerløkka", "zipCode": 550}},
                {"properties": {"name": "Byporten", "isShoppingCenter": true, "storeCount": "70"}},
                {"properties": {"name": "Lagunen", "storeCount": "mange", "city": null}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.skipped(), 0);

        let kiwi = dataset.features()[0].properties.as_ref().unwrap();
        assert_eq!(kiwi.zip_code.as_deref(), Some("550"));

        let byporten = dataset.features()[1].properties.as_ref().unwrap();
        assert_eq!(byporten.store_count, Some(70));

        let lagunen = dataset.features()[2].properties.as_ref().unwrap();
        assert_eq!(lagunen.store_count, None);
        assert_eq!(lagunen.city, None);
    }

    #[test]
    fn display_name_falls_back_to_brand() {
        let record = StoreRecord {
            butikk: Some("Vinmonopolet".to_string()),
            name: Some("  ".to_string()),
            ..StoreRecord::default()
        };
        assert_eq!(record.display_name(), Some("Vinmonopolet"));
    }
}
