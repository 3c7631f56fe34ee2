use serde::Deserialize;
use std::path::Path;

use crate::pane::divider::{DIVIDER_WIDTH, HIT_TEST_MARGIN};
use crate::pane::{MAX_RATIO, MIN_RATIO};

/// Upper bound accepted for `layout.max_nesting`.
const MAX_NESTING_CEILING: usize = 16;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub divider: DividerConfig,
}

/// Split tree limits.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Maximum nesting depth of splits; a split that would exceed it is rejected.
    pub max_nesting: usize,
    /// Ratio a freshly created split starts with.
    pub default_ratio: f32,
}

/// Divider geometry used for resize drags.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerConfig {
    pub width: f32,
    pub hit_margin: f32,
}

/// Why a layout config could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate structs ──────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    layout: RawLayoutConfig,
    divider: RawDividerConfig,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawLayoutConfig {
    max_nesting: usize,
    default_ratio: f32,
}

impl Default for RawLayoutConfig {
    fn default() -> Self {
        let defaults = LayoutConfig::default();
        Self {
            max_nesting: defaults.max_nesting,
            default_ratio: defaults.default_ratio,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawDividerConfig {
    width: f32,
    hit_margin: f32,
}

impl Default for RawDividerConfig {
    fn default() -> Self {
        let defaults = DividerConfig::default();
        Self {
            width: defaults.width,
            hit_margin: defaults.hit_margin,
        }
    }
}

// ── Defaults ────────────────────────────────────────────────────────────

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_nesting: 4,
            default_ratio: 0.5,
        }
    }
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            width: DIVIDER_WIDTH,
            hit_margin: HIT_TEST_MARGIN,
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────────

impl Config {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let config = Self {
            layout: LayoutConfig {
                max_nesting: raw.layout.max_nesting,
                default_ratio: raw.layout.default_ratio,
            },
            divider: DividerConfig {
                width: raw.divider.width,
                hit_margin: raw.divider.hit_margin,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values outside the ranges the layout engine accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.max_nesting == 0 || self.layout.max_nesting > MAX_NESTING_CEILING {
            return Err(ConfigError::Validation(format!(
                "max_nesting must be between 1 and {MAX_NESTING_CEILING}"
            )));
        }

        if !(MIN_RATIO..=MAX_RATIO).contains(&self.layout.default_ratio) {
            return Err(ConfigError::Validation(format!(
                "default_ratio must be between {MIN_RATIO} and {MAX_RATIO}"
            )));
        }

        if self.divider.width.is_nan() || self.divider.width <= 0.0 {
            return Err(ConfigError::Validation("divider width must be > 0".to_string()));
        }

        if self.divider.hit_margin.is_nan() || self.divider.hit_margin < 0.0 {
            return Err(ConfigError::Validation(
                "divider hit_margin must be >= 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The default configuration as a commented TOML document.
    pub fn default_toml() -> String {
        let defaults = Self::default();
        format!(
            "[layout]\n\
             # Deepest allowed chain of nested splits\n\
             max_nesting = {}\n\
             # Share of the first pane in a new split\n\
             default_ratio = {:?}\n\
             \n\
             [divider]\n\
             width = {:?}\n\
             # Extra grab area on each side of a divider\n\
             hit_margin = {:?}\n",
            defaults.layout.max_nesting,
            defaults.layout.default_ratio,
            defaults.divider.width,
            defaults.divider.hit_margin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── Defaults ────────────────────────────────────────────────────

    #[test]
    fn default_max_nesting() {
        assert_eq!(Config::default().layout.max_nesting, 4);
    }

    #[test]
    fn default_ratio_is_even() {
        assert_eq!(Config::default().layout.default_ratio, 0.5);
    }

    #[test]
    fn default_divider_geometry() {
        let config = Config::default();
        assert_eq!(config.divider.width, 2.0);
        assert_eq!(config.divider.hit_margin, 8.0);
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config = Config::from_toml(&Config::default_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    // ── Parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_complete_toml() {
        let toml = r#"
[layout]
max_nesting = 6
default_ratio = 0.6

[divider]
width = 4.0
hit_margin = 3.0
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.layout.max_nesting, 6);
        assert_eq!(config.layout.default_ratio, 0.6);
        assert_eq!(config.divider.width, 4.0);
        assert_eq!(config.divider.hit_margin, 3.0);
    }

    #[test]
    fn missing_keys_fall_back_per_field() {
        let config = Config::from_toml("[layout]\nmax_nesting = 2\n").unwrap();
        assert_eq!(config.layout.max_nesting, 2);
        assert_eq!(config.layout.default_ratio, 0.5);
        assert_eq!(config.divider, DividerConfig::default());
    }

    #[test]
    fn empty_document_is_default_config() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_sections_and_keys_are_ignored() {
        let toml = r#"
[layout]
max_nesting = 3
unknown_key = "value"

[unknown_section]
foo = "bar"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.layout.max_nesting, 3);
    }

    #[test]
    fn parse_malformed_toml_is_parse_error() {
        let result = Config::from_toml("[layout\nmax_nesting = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    // ── Validation ──────────────────────────────────────────────────

    #[test]
    fn invalid_zero_max_nesting() {
        let result = Config::from_toml("[layout]\nmax_nesting = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_huge_max_nesting() {
        let result = Config::from_toml("[layout]\nmax_nesting = 64\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_default_ratio_outside_bounds() {
        assert!(Config::from_toml("[layout]\ndefault_ratio = 0.05\n").is_err());
        assert!(Config::from_toml("[layout]\ndefault_ratio = 0.95\n").is_err());
    }

    #[test]
    fn invalid_zero_divider_width() {
        assert!(Config::from_toml("[divider]\nwidth = 0.0\n").is_err());
    }

    #[test]
    fn invalid_negative_hit_margin() {
        assert!(Config::from_toml("[divider]\nhit_margin = -1.0\n").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        {
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(b"[layout]\nmax_nesting = 5\n").unwrap();
        }
        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout.max_nesting, 5);
        assert_eq!(config.divider, DividerConfig::default());
    }

    #[test]
    fn absent_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Config::load(dir.path()), Err(ConfigError::Io(_))));
    }

    // ── Errors ──────────────────────────────────────────────────────

    #[test]
    fn validation_error_names_the_field() {
        let err = ConfigError::Validation("max_nesting must be between 1 and 16".to_string());
        assert!(format!("{err}").contains("max_nesting"));
    }
}
