use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{SkinError, SkinResult};

fn default_width() -> f64 {
    0.2
}
fn default_dist() -> f64 {
    0.25
}

/// User-facing shape options
///
/// Every field is either present or has a literal default. Radii have no default:
/// `inside_radius` and `outside_radius` each fall back to `radius`, and a build
/// with neither is rejected by [`ShapeConfig::validate`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    /// Full width of a tube profile
    #[serde(default = "default_width")]
    pub width: f64,
    /// Full height of a tube profile, defaults to `width`
    #[serde(default)]
    pub height: Option<f64>,
    /// Distance from a vertex along each edge where the profile sits
    #[serde(default = "default_dist")]
    pub dist: f64,
    /// Fallback for both pole radii
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub inside_radius: Option<f64>,
    #[serde(default)]
    pub outside_radius: Option<f64>,
    /// Sharpness stamped on the seams between neighbouring tubes; `None` disables creasing
    #[serde(default)]
    pub crease: Option<f64>,
    /// Sharpness for the seams along each tube wall, defaults to `crease`
    #[serde(default)]
    pub connector_crease: Option<f64>,
    /// Outward shell offset applied to poles and profile centers
    #[serde(default)]
    pub displace: Option<f64>,
    /// Scale poles and profiles by local edge length instead of absolute sizes
    #[serde(default)]
    pub proportional_scale: bool,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: None,
            dist: default_dist(),
            radius: None,
            inside_radius: None,
            outside_radius: None,
            crease: None,
            connector_crease: None,
            displace: None,
            proportional_scale: false,
        }
    }
}

impl ShapeConfig {
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_dist(mut self, dist: f64) -> Self {
        self.dist = dist;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_inside_radius(mut self, radius: f64) -> Self {
        self.inside_radius = Some(radius);
        self
    }

    pub fn with_outside_radius(mut self, radius: f64) -> Self {
        self.outside_radius = Some(radius);
        self
    }

    pub fn with_crease(mut self, crease: f64) -> Self {
        self.crease = Some(crease);
        self
    }

    pub fn with_connector_crease(mut self, crease: f64) -> Self {
        self.connector_crease = Some(crease);
        self
    }

    pub fn with_displace(mut self, displace: f64) -> Self {
        self.displace = Some(displace);
        self
    }

    pub fn with_proportional_scale(mut self, enabled: bool) -> Self {
        self.proportional_scale = enabled;
        self
    }

    /// Resolve fallbacks and check ranges before any geometry is built
    pub fn validate(&self) -> SkinResult<SkinParams> {
        let width = positive("width", self.width)?;
        let height = positive("height", self.height.unwrap_or(self.width))?;
        let dist = positive("dist", self.dist)?;

        let inside_radius = non_negative(
            "inside_radius",
            self.inside_radius
                .or(self.radius)
                .ok_or_else(|| missing_radius("inside_radius"))?,
        )?;
        let outside_radius = non_negative(
            "outside_radius",
            self.outside_radius
                .or(self.radius)
                .ok_or_else(|| missing_radius("outside_radius"))?,
        )?;

        let crease = self.crease.map(|c| unit_interval("crease", c)).transpose()?;
        let connector_crease = self
            .connector_crease
            .map(|c| unit_interval("connector_crease", c))
            .transpose()?;

        let displace = match self.displace {
            Some(d) if !d.is_finite() => {
                return Err(SkinError::configuration("displace", format!("must be finite, got {d}")));
            }
            other => other,
        };

        Ok(SkinParams {
            width_2: width / 2.0,
            height_2: height / 2.0,
            dist,
            inside_radius,
            outside_radius,
            crease,
            connector_crease: crease.map(|c| connector_crease.unwrap_or(c)),
            displace,
            proportional_scale: self.proportional_scale,
        })
    }
}

fn missing_radius(option: &'static str) -> SkinError {
    SkinError::configuration(option, "not set and no `radius` fallback given")
}

fn positive(option: &'static str, value: f64) -> SkinResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SkinError::configuration(option, format!("must be a positive number, got {value}")))
    }
}

fn non_negative(option: &'static str, value: f64) -> SkinResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SkinError::configuration(option, format!("must be finite and >= 0, got {value}")))
    }
}

fn unit_interval(option: &'static str, value: f64) -> SkinResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SkinError::configuration(option, format!("must be within [0, 1], got {value}")))
    }
}

/// Validated shape parameters, the only configuration the geometry code reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinParams {
    pub width_2: f64,
    pub height_2: f64,
    pub dist: f64,
    pub inside_radius: f64,
    pub outside_radius: f64,
    /// Crease for seams between neighbouring tubes at a cap
    pub crease: Option<f64>,
    /// Crease for seams along tube walls; `Some` exactly when `crease` is
    pub connector_crease: Option<f64>,
    pub displace: Option<f64>,
    pub proportional_scale: bool,
}

impl SkinParams {
    /// Displacement added to pole offsets and profile centers
    pub fn displacement(&self) -> f64 {
        self.displace.unwrap_or(0.0)
    }
}

/// Settings read from a `wireskin.toml` file
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub shape: Option<ShapeConfig>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

impl FileConfig {
    /// Load the first config file found on the search path
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::debug!("loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("wireskin.toml"));
    paths.push(PathBuf::from(".wireskin.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("wireskin").join("config.toml"));
        paths.push(config_dir.join("wireskin.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".wireskin.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShapeConfig::default();
        // dist is a plain float, not a pair
        let dist: f64 = config.dist;
        assert_eq!(dist, 0.25);
        assert_eq!(config.width, 0.2);
        assert!(config.height.is_none());
        assert!(!config.proportional_scale);
    }

    #[test]
    fn test_height_defaults_to_width() {
        let params = ShapeConfig::default().with_width(0.4).with_radius(0.1).validate().unwrap();
        assert!((params.width_2 - 0.2).abs() < 1e-12);
        assert!((params.height_2 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_radius_fallback() {
        let params = ShapeConfig::default()
            .with_radius(0.1)
            .with_inside_radius(0.05)
            .validate()
            .unwrap();
        assert_eq!(params.inside_radius, 0.05);
        assert_eq!(params.outside_radius, 0.1);
    }

    #[test]
    fn test_missing_radius_is_configuration_error() {
        let err = ShapeConfig::default().with_outside_radius(0.1).validate().unwrap_err();
        match err {
            SkinError::Configuration { option, .. } => assert_eq!(option, "inside_radius"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(ShapeConfig::default().with_radius(0.1).with_width(0.0).validate().is_err());
        assert!(ShapeConfig::default().with_radius(-0.1).validate().is_err());
        assert!(ShapeConfig::default().with_radius(0.1).with_crease(1.5).validate().is_err());
        assert!(ShapeConfig::default()
            .with_radius(0.1)
            .with_displace(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_connector_crease_follows_crease() {
        let params = ShapeConfig::default().with_radius(0.1).with_crease(0.4).validate().unwrap();
        assert_eq!(params.connector_crease, Some(0.4));

        let params = ShapeConfig::default()
            .with_radius(0.1)
            .with_crease(0.4)
            .with_connector_crease(1.0)
            .validate()
            .unwrap();
        assert_eq!(params.connector_crease, Some(1.0));

        // No seams are stamped at all without a base crease
        let params = ShapeConfig::default()
            .with_radius(0.1)
            .with_connector_crease(1.0)
            .validate()
            .unwrap();
        assert_eq!(params.connector_crease, None);
    }

    #[test]
    fn test_file_config_from_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            verbose = true
            output = "frame.stl"

            [shape]
            width = 0.3
            radius = 0.12
            crease = 0.8
            proportional_scale = true
            "#,
        )
        .unwrap();

        let shape = config.shape.unwrap();
        assert_eq!(shape.width, 0.3);
        assert_eq!(shape.dist, 0.25);
        assert_eq!(shape.radius, Some(0.12));
        assert!(shape.proportional_scale);
        assert!(config.verbose);
        assert_eq!(config.output, Some(PathBuf::from("frame.stl")));
    }

    #[test]
    fn test_unknown_shape_option_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[shape]\nradus = 0.1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wireskin.toml");
        std::fs::write(&path, "[shape]\nradius = 0.2\n").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert_eq!(config.shape.unwrap().radius, Some(0.2));
        assert!(FileConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }
}
