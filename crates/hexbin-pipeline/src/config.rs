//! Run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use hex_tiler::MAX_RESOLUTION;
use hexbin_common::{HexbinError, HexbinResult, InclusionRule};
use serde::{Deserialize, Serialize};

/// Everything a run needs, threaded explicitly through every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexbinConfig {
    /// H3 resolution (0-15). Higher means smaller, more numerous cells.
    pub resolution: u8,

    /// Hexagons per chunk.
    pub chunk_size: usize,

    /// Size of the worker pool.
    pub worker_count: usize,

    /// Pixel inclusion rule for zonal statistics.
    pub inclusion_rule: InclusionRule,

    /// Input GeoTIFF.
    pub raster_path: PathBuf,

    /// Output GeoJSON.
    pub output_path: PathBuf,
}

impl Default for HexbinConfig {
    fn default() -> Self {
        Self {
            resolution: 8,
            chunk_size: 1000,
            worker_count: 4,
            inclusion_rule: InclusionRule::AllTouched,
            raster_path: PathBuf::from("input.tif"),
            output_path: PathBuf::from("hexbin-8.geojson"),
        }
    }
}

impl HexbinConfig {
    /// Defaults overlaid with `HEXBIN_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load a YAML file; missing fields take their defaults.
    pub fn from_yaml(path: impl AsRef<Path>) -> HexbinResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            HexbinError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text).map_err(|e| {
            HexbinError::invalid_config(format!("invalid config {}: {}", path.display(), e))
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Overlay values from a variable lookup.
    ///
    /// Unparsable values are ignored and leave the current setting.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HEXBIN_RESOLUTION") {
            if let Ok(res) = val.trim().parse() {
                self.resolution = res;
            }
        }

        if let Some(val) = lookup("HEXBIN_CHUNK_SIZE") {
            if let Ok(size) = val.trim().parse() {
                self.chunk_size = size;
            }
        }

        if let Some(val) = lookup("HEXBIN_WORKERS") {
            if let Ok(count) = val.trim().parse() {
                self.worker_count = count;
            }
        }

        if let Some(val) = lookup("HEXBIN_INCLUSION") {
            if let Ok(rule) = val.parse() {
                self.inclusion_rule = rule;
            }
        }

        if let Some(val) = lookup("HEXBIN_RASTER") {
            self.raster_path = PathBuf::from(val);
        }

        if let Some(val) = lookup("HEXBIN_OUTPUT") {
            self.output_path = PathBuf::from(val);
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution > MAX_RESOLUTION {
            return Err(format!(
                "resolution must be 0-{}, got {}",
                MAX_RESOLUTION, self.resolution
            ));
        }

        if self.chunk_size == 0 {
            return Err("chunk_size must be > 0".to_string());
        }

        if self.worker_count == 0 {
            return Err("worker_count must be > 0".to_string());
        }

        if self.raster_path.as_os_str().is_empty() {
            return Err("raster_path must not be empty".to_string());
        }

        if self.output_path.as_os_str().is_empty() {
            return Err("output_path must not be empty".to_string());
        }

        Ok(())
    }
}

/// `<dir>/<stem>-<resolution>.geojson` next to the raster.
pub fn output_path_for(raster_path: &Path, resolution: u8) -> PathBuf {
    let stem = raster_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("hexbin");
    raster_path.with_file_name(format!("{}-{}.geojson", stem, resolution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = HexbinConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution, 8);
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.inclusion_rule, InclusionRule::AllTouched);
    }

    #[test]
    fn test_overrides() {
        let config = HexbinConfig::default().with_overrides(lookup(&[
            ("HEXBIN_RESOLUTION", "6"),
            ("HEXBIN_CHUNK_SIZE", "10000"),
            ("HEXBIN_WORKERS", " 8 "),
            ("HEXBIN_INCLUSION", "center_in"),
            ("HEXBIN_RASTER", "/data/dem.tif"),
            ("HEXBIN_OUTPUT", "/out/dem-6.geojson"),
        ]));

        assert_eq!(config.resolution, 6);
        assert_eq!(config.chunk_size, 10000);
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.inclusion_rule, InclusionRule::CenterIn);
        assert_eq!(config.raster_path, PathBuf::from("/data/dem.tif"));
        assert_eq!(config.output_path, PathBuf::from("/out/dem-6.geojson"));
    }

    #[test]
    fn test_unparsable_override_keeps_value() {
        let config = HexbinConfig::default().with_overrides(lookup(&[
            ("HEXBIN_WORKERS", "many"),
            ("HEXBIN_INCLUSION", "bilinear"),
        ]));
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.inclusion_rule, InclusionRule::AllTouched);
    }

    #[test]
    fn test_validate() {
        let config = HexbinConfig {
            resolution: 16,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("resolution"));

        let config = HexbinConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = HexbinConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = HexbinConfig {
            output_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_partial() {
        let config = HexbinConfig::from_yaml_str(
            "resolution: 5\ninclusion_rule: center-in\nraster_path: dem.tif\n",
        )
        .unwrap();
        assert_eq!(config.resolution, 5);
        assert_eq!(config.inclusion_rule, InclusionRule::CenterIn);
        assert_eq!(config.raster_path, PathBuf::from("dem.tif"));
        assert_eq!(config.chunk_size, 1000);
    }

    #[test]
    fn test_yaml_file_errors_are_configuration() {
        let err = HexbinConfig::from_yaml("/nonexistent/hexbin.yaml").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/data/srtm.tif"), 8),
            PathBuf::from("/data/srtm-8.geojson")
        );
        assert_eq!(
            output_path_for(Path::new("dem.tif"), 10),
            PathBuf::from("dem-10.geojson")
        );
    }
}
