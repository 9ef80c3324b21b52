//! Configuration for the annotation editor core.
//!
//! Settings load from `~/.config/cartomark/config.toml`; a missing file
//! means defaults. Map identity and georeferencing normally come from the
//! host at construction time rather than from the file, but they share the
//! same structure so headless embedders can configure everything in TOML.
//!
//! # Example TOML
//! ```toml
//! [map]
//! object_id = 12
//! image_dimensions = [1024, 768]
//!
//! [drawing]
//! default_color = "#00ff00"
//! circle_radius = 75.0
//!
//! [eraser]
//! radius_threshold = 25.0
//! ```

use crate::geometry::GeoBounds;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration for one editor instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Identity and georeferencing of the raster being annotated
    #[serde(default)]
    pub map: MapConfig,

    /// Drawing defaults (palette, color, circle radius)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Eraser behavior
    #[serde(default)]
    pub eraser: EraserConfig,
}

/// Identity and georeferencing of the raster overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Backend identifier of the map object
    #[serde(default)]
    pub object_id: u64,

    /// Geographic bounds of the raster overlay in map space
    #[serde(default = "default_image_bounds")]
    pub image_bounds: GeoBounds,

    /// Raster size in pixels (width, height)
    #[serde(default = "default_image_dimensions")]
    pub image_dimensions: (u32, u32),
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            object_id: 0,
            image_bounds: default_image_bounds(),
            image_dimensions: default_image_dimensions(),
        }
    }
}

/// Drawing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Hex palette offered for stroke colors
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Default stroke color as a hex string
    #[serde(default = "default_color")]
    pub default_color: String,

    /// Default circle radius in map units (valid range: 1.0 - 1000.0)
    #[serde(default = "default_circle_radius")]
    pub circle_radius: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            default_color: default_color(),
            circle_radius: default_circle_radius(),
        }
    }
}

/// Eraser behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EraserConfig {
    /// Hit distance for point-like shapes in map units (valid range: 1.0 - 200.0)
    #[serde(default = "default_eraser_radius")]
    pub radius_threshold: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            radius_threshold: default_eraser_radius(),
        }
    }
}

fn default_image_bounds() -> GeoBounds {
    GeoBounds {
        south: 0.0,
        west: 0.0,
        north: 1000.0,
        east: 1000.0,
    }
}

fn default_image_dimensions() -> (u32, u32) {
    (1000, 1000)
}

fn default_palette() -> Vec<String> {
    [
        "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#ffa500", "#800080",
        "#008000", "#000080", "#800000", "#000000",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_color() -> String {
    "#ff0000".to_string()
}

fn default_circle_radius() -> f64 {
    50.0
}

fn default_eraser_radius() -> f64 {
    20.0
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are replaced with the nearest valid value (or the
    /// default) and a warning is logged; loading never fails over a bad
    /// number.
    fn validate_and_clamp(&mut self) {
        // Eraser threshold: 1.0 - 200.0
        if !(1.0..=200.0).contains(&self.eraser.radius_threshold) {
            warn!(
                "Invalid eraser radius_threshold {:.1}, clamping to 1.0-200.0 range",
                self.eraser.radius_threshold
            );
            self.eraser.radius_threshold = self.eraser.radius_threshold.clamp(1.0, 200.0);
        }

        // Circle radius: 1.0 - 1000.0
        if !(1.0..=1000.0).contains(&self.drawing.circle_radius) {
            warn!(
                "Invalid circle_radius {:.1}, clamping to 1.0-1000.0 range",
                self.drawing.circle_radius
            );
            self.drawing.circle_radius = self.drawing.circle_radius.clamp(1.0, 1000.0);
        }

        // Zero-sized rasters break coordinate translation
        let (w, h) = self.map.image_dimensions;
        if w == 0 || h == 0 {
            warn!("Invalid image_dimensions {w}x{h}, falling back to 1000x1000");
            self.map.image_dimensions = default_image_dimensions();
        }

        if !is_hex_color(&self.drawing.default_color) {
            warn!(
                "Invalid default_color '{}', falling back to '#ff0000'",
                self.drawing.default_color
            );
            self.drawing.default_color = default_color();
        }

        self.drawing.palette.retain(|color| {
            let valid = is_hex_color(color);
            if !valid {
                warn!("Dropping invalid palette entry '{color}'");
            }
            valid
        });
        if self.drawing.palette.is_empty() {
            self.drawing.palette = default_palette();
        }
    }

    /// Loads configuration from the default location.
    ///
    /// Returns defaults when no config file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate_and_clamp();
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file location (`~/.config/cartomark/config.toml`).
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cartomark").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let mut config = Config::default();
        let before = format!("{config:?}");
        config.validate_and_clamp();
        assert_eq!(before, format!("{config:?}"));
        assert_eq!(config.eraser.radius_threshold, 20.0);
        assert_eq!(config.drawing.palette.len(), 12);
    }

    #[test]
    fn load_from_path_parses_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [map]
            object_id = 7
            image_dimensions = [800, 600]

            [eraser]
            radius_threshold = 35.0
            "#
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.map.object_id, 7);
        assert_eq!(config.map.image_dimensions, (800, 600));
        assert_eq!(config.eraser.radius_threshold, 35.0);
        // Untouched section keeps defaults
        assert_eq!(config.drawing.default_color, "#ff0000");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [map]
            image_dimensions = [0, 600]

            [drawing]
            default_color = "red"
            circle_radius = 5000.0

            [eraser]
            radius_threshold = 0.0
            "#
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.eraser.radius_threshold, 1.0);
        assert_eq!(config.drawing.circle_radius, 1000.0);
        assert_eq!(config.drawing.default_color, "#ff0000");
        assert_eq!(config.map.image_dimensions, (1000, 1000));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[map\nobject_id = ").unwrap();
        assert!(Config::load_from_path(file.path()).is_err());
    }
}
