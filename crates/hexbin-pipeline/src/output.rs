//! GeoJSON FeatureCollection output.
//!
//! The whole collection is built in memory and written once: serialized to a
//! temporary file next to the destination, then renamed over it, so a failed
//! write never leaves a partial document behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use hexbin_common::{HexbinError, HexbinResult};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::record::HexRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Polygon,
}

/// `{"type": "FeatureCollection", "features": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: PolygonGeometry,
    pub properties: HexProperties,
}

/// GeoJSON Polygon; positions are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexProperties {
    /// `null` only in documents produced elsewhere; removed by [`refilter`].
    pub mean_value: Option<f64>,
}

impl Feature {
    pub fn from_record(record: &HexRecord) -> Self {
        let ring = record
            .polygon()
            .ring()
            .iter()
            .map(|&(lat, lon)| [lon, lat])
            .collect();

        Self {
            kind: FeatureType::Feature,
            geometry: PolygonGeometry {
                kind: GeometryType::Polygon,
                coordinates: vec![ring],
            },
            properties: HexProperties {
                mean_value: record.mean(),
            },
        }
    }

    /// True when the feature carries a usable mean.
    pub fn has_value(&self) -> bool {
        self.properties.mean_value.is_some_and(f64::is_finite)
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    /// Features for every record that has a mean, in record order.
    pub fn from_records(records: &[HexRecord]) -> Self {
        Self::new(
            records
                .iter()
                .filter(|r| !r.is_absent())
                .map(Feature::from_record)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Drop features without a value; returns how many were removed.
    pub fn retain_valued(&mut self) -> usize {
        let before = self.features.len();
        self.features.retain(Feature::has_value);
        before - self.features.len()
    }
}

/// Serialize `collection` to `path`, replacing any existing file.
pub fn write_feature_collection(path: &Path, collection: &FeatureCollection) -> HexbinResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let tmp = NamedTempFile::new_in(dir)
        .map_err(|e| HexbinError::output_write(path, e.to_string()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, collection)
            .map_err(|e| HexbinError::output_write(path, e.to_string()))?;
        writer
            .flush()
            .map_err(|e| HexbinError::output_write(path, e.to_string()))?;
    }

    tmp.persist(path)
        .map_err(|e| HexbinError::output_write(path, e.error.to_string()))?;

    debug!(path = %path.display(), features = collection.len(), "Wrote feature collection");
    Ok(())
}

/// Read a FeatureCollection written by [`write_feature_collection`] or any
/// GeoJSON tool using the same property name.
pub fn read_feature_collection(path: &Path) -> HexbinResult<FeatureCollection> {
    let file = File::open(path)?;
    let collection = serde_json::from_reader(BufReader::new(file))?;
    Ok(collection)
}

/// Counts from a [`refilter`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefilterReport {
    pub kept: usize,
    pub removed: usize,
}

/// Remove features whose `mean_value` is missing from an existing file,
/// rewriting it only when something was removed.
pub fn refilter(path: &Path) -> HexbinResult<RefilterReport> {
    let mut collection = read_feature_collection(path)?;
    let removed = collection.retain_valued();

    if removed > 0 {
        write_feature_collection(path, &collection)?;
    }

    info!(
        path = %path.display(),
        kept = collection.len(),
        removed,
        "Refiltered feature collection"
    );

    Ok(RefilterReport {
        kept: collection.len(),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tiler::{to_polygon, HexCell};

    fn record(mean: Option<f64>) -> HexRecord {
        let cell = HexCell::containing(52.5, 13.4, 7).unwrap();
        HexRecord::new(to_polygon(cell), mean)
    }

    #[test]
    fn test_geojson_shape() {
        let collection = FeatureCollection::from_records(&[record(Some(42.0)), record(None)]);
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().unwrap().len(), 1);

        let feature = &json["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["properties"]["mean_value"], 42.0);

        let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 7);
        assert_eq!(ring.first(), ring.last());

        // [lon, lat]
        let lon = ring[0][0].as_f64().unwrap();
        let lat = ring[0][1].as_f64().unwrap();
        assert!((lon - 13.4).abs() < 0.1);
        assert!((lat - 52.5).abs() < 0.1);
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");
        let collection = FeatureCollection::from_records(&[record(Some(1.5))]);

        write_feature_collection(&path, &collection).unwrap();
        assert_eq!(read_feature_collection(&path).unwrap(), collection);

        // Overwrites
        write_feature_collection(&path, &FeatureCollection::new(Vec::new())).unwrap();
        assert!(read_feature_collection(&path).unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_destination() {
        let path = Path::new("/nonexistent/dir/out.geojson");
        let err = write_feature_collection(path, &FeatureCollection::new(Vec::new())).unwrap_err();
        assert!(matches!(err, HexbinError::OutputWriteFailure { .. }));
    }

    #[test]
    fn test_refilter_removes_null_means() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.geojson");
        let mut features = vec![Feature::from_record(&record(Some(3.0)))];
        features.push(Feature::from_record(&record(None)));
        write_feature_collection(&path, &FeatureCollection::new(features)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"mean_value\":null"));

        let report = refilter(&path).unwrap();
        assert_eq!(report, RefilterReport { kept: 1, removed: 1 });

        let again = refilter(&path).unwrap();
        assert_eq!(again, RefilterReport { kept: 1, removed: 0 });
    }

    #[test]
    fn test_refilter_keeps_coordinates_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.geojson");
        let kept = Feature::from_record(&record(Some(3.0)));
        let features = vec![kept.clone(), Feature::from_record(&record(None))];
        write_feature_collection(&path, &FeatureCollection::new(features)).unwrap();

        refilter(&path).unwrap();

        let rewritten = read_feature_collection(&path).unwrap();
        assert_eq!(rewritten.features.len(), 1);
        let expected = &kept.geometry.coordinates[0];
        let actual = &rewritten.features[0].geometry.coordinates[0];
        for (a, b) in expected.iter().zip(actual) {
            assert_eq!(a[0].to_bits(), b[0].to_bits());
            assert_eq!(a[1].to_bits(), b[1].to_bits());
        }
    }
}
