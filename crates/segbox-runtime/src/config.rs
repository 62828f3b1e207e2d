#![forbid(unsafe_code)]

//! Runtime configuration for a [`SegBox`](crate::SegBox).
//!
//! # Loading
//!
//! ```toml
//! # segbox.toml
//! root = "editor"
//! min_size = 48.0
//! debounce_ms = 150
//! gutter = 6.0
//! save = true
//! ```
//!
//! ```rust,ignore
//! let config = SegBoxConfig::from_toml_file("segbox.toml")?;
//! let config = SegBoxConfig::from_env();
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use segbox_layout::{DEFAULT_MIN_SIZE, DEFAULT_ROOT_NAME};

/// Default quiescence window before leaves are reported.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
/// Default divider track width, in pixels.
pub const DEFAULT_GUTTER: f64 = 8.0;

const MAX_MIN_SIZE: f64 = 4096.0;
const MAX_DEBOUNCE_MS: u64 = 5_000;
const MAX_GUTTER: f64 = 64.0;

/// Configuration for one partition root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegBoxConfig {
    /// Root name; also keys the persisted layout.
    pub root: String,

    /// Smallest pane extent a gesture may leave behind.
    /// Default: 36px.
    pub min_size: f64,

    /// Quiescence window before a change notification fires.
    /// Default: 100ms.
    #[serde(with = "duration_ms", rename = "debounce_ms")]
    pub debounce: Duration,

    /// Divider track width used when solving bounds.
    /// Default: 8px.
    pub gutter: f64,

    /// Persist the layout on every settled change and restore it on startup.
    /// Default: false.
    pub save: bool,
}

impl Default for SegBoxConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT_NAME.to_owned(),
            min_size: DEFAULT_MIN_SIZE,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            gutter: DEFAULT_GUTTER,
            save: false,
        }
    }
}

impl SegBoxConfig {
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    #[must_use]
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Storage key of the persisted layout.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("segbox#{}.layout", self.root)
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `SEGBOX_ROOT`: root name
    /// - `SEGBOX_MIN_SIZE`: minimum pane size in pixels
    /// - `SEGBOX_DEBOUNCE_MS`: notification window in milliseconds
    /// - `SEGBOX_GUTTER`: divider width in pixels
    /// - `SEGBOX_SAVE`: "1" or "true" to enable persistence
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SEGBOX_ROOT")
            && !val.trim().is_empty()
        {
            config.root = val.trim().to_owned();
        }

        if let Ok(val) = std::env::var("SEGBOX_MIN_SIZE")
            && let Ok(px) = val.parse::<f64>()
        {
            config.min_size = px;
        }

        if let Ok(val) = std::env::var("SEGBOX_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.debounce = Duration::from_millis(ms);
        }

        if let Ok(val) = std::env::var("SEGBOX_GUTTER")
            && let Ok(px) = val.parse::<f64>()
        {
            config.gutter = px;
        }

        if let Ok(val) = std::env::var("SEGBOX_SAVE") {
            config.save = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// - `min_size` to 0-4096px (non-finite falls back to the default)
    /// - `debounce` to at most 5s
    /// - `gutter` to 0-64px (non-finite falls back to the default)
    /// - an empty root falls back to `"0"`
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.min_size = if self.min_size.is_finite() {
            self.min_size.clamp(0.0, MAX_MIN_SIZE)
        } else {
            DEFAULT_MIN_SIZE
        };
        self.gutter = if self.gutter.is_finite() {
            self.gutter.clamp(0.0, MAX_GUTTER)
        } else {
            DEFAULT_GUTTER
        };
        let debounce_ms = u64::try_from(self.debounce.as_millis()).unwrap_or(u64::MAX);
        self.debounce = Duration::from_millis(debounce_ms.min(MAX_DEBOUNCE_MS));
        if self.root.is_empty() {
            self.root = DEFAULT_ROOT_NAME.to_owned();
        }
        self
    }

    /// Check that every value is inside its valid range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Human-readable list of out-of-range values. Empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.root.is_empty() {
            errors.push("root must not be empty".into());
        }
        if !(0.0..=MAX_MIN_SIZE).contains(&self.min_size) {
            errors.push(format!(
                "min_size must be in [0, {MAX_MIN_SIZE}], got {}",
                self.min_size
            ));
        }
        if self.debounce > Duration::from_millis(MAX_DEBOUNCE_MS) {
            errors.push(format!(
                "debounce_ms must be <= {MAX_DEBOUNCE_MS}, got {}",
                self.debounce.as_millis()
            ));
        }
        if !(0.0..=MAX_GUTTER).contains(&self.gutter) {
            errors.push(format!(
                "gutter must be in [0, {MAX_GUTTER}], got {}",
                self.gutter
            ));
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Values out of range.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SegBoxConfig::default();
        assert_eq!(config.root, "0");
        assert_eq!(config.min_size, 36.0);
        assert_eq!(config.debounce, Duration::from_millis(100));
        assert_eq!(config.gutter, 8.0);
        assert!(!config.save);
        assert!(config.is_valid());
        assert_eq!(config.storage_key(), "segbox#0.layout");
    }

    #[test]
    fn validated_clamps_out_of_range_values() {
        let config = SegBoxConfig::default()
            .with_root("")
            .with_min_size(f64::INFINITY)
            .with_gutter(-3.0)
            .with_debounce(Duration::from_secs(60))
            .validated();
        assert_eq!(config.root, "0");
        assert_eq!(config.min_size, DEFAULT_MIN_SIZE);
        assert_eq!(config.gutter, 0.0);
        assert_eq!(config.debounce, Duration::from_millis(MAX_DEBOUNCE_MS));
        assert!(config.is_valid());
    }

    #[test]
    fn json_uses_millisecond_debounce() {
        let config =
            SegBoxConfig::from_json_str(r#"{"root":"side","debounce_ms":250,"save":true}"#)
                .expect("valid config");
        assert_eq!(config.root, "side");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert!(config.save);
        assert_eq!(config.min_size, DEFAULT_MIN_SIZE);
    }

    #[test]
    fn json_rejects_out_of_range() {
        let err = SegBoxConfig::from_json_str(r#"{"min_size":-5}"#).expect_err("negative");
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("min_size"));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("segbox.json");
        let config = SegBoxConfig::default().with_root("files").with_save(true);
        std::fs::write(&path, serde_json::to_string(&config).expect("serializable"))
            .expect("write config");
        assert_eq!(
            SegBoxConfig::from_json_file(&path).expect("load"),
            config
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SegBoxConfig::from_json_file("/nonexistent/segbox.json").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_loading() {
        let config = SegBoxConfig::from_toml_str("root = \"t\"\ngutter = 4.0\ndebounce_ms = 20\n")
            .expect("valid toml");
        assert_eq!(config.root, "t");
        assert_eq!(config.gutter, 4.0);
        assert_eq!(config.debounce, Duration::from_millis(20));
    }
}
