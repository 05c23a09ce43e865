use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Viewport;
use crate::walker::{ExtractOptions, DEFAULT_MAX_DEPTH, DEFAULT_SELECTOR};
use crate::walker::validate::DEFAULT_MAX_OUTPUT_BYTES;

/// Settings loaded from `config.toml`. Every section and key is optional;
/// unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub limits: LimitsConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_depth: usize,
    pub include_hidden: bool,
    pub compute_styles: bool,
    pub selector: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_hidden: false,
            compute_styles: true,
            selector: DEFAULT_SELECTOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_output_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub node_command: String,
    pub viewport: Viewport,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            navigation_timeout: Duration::from_secs(30),
            network_idle_timeout: Duration::from_secs(10),
            process_timeout: Duration::from_secs(45),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// `~/.config/h2f/config.toml`, when `HOME` is set.
    pub fn central_config_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config").join("h2f").join("config.toml"))
    }

    /// Explicit path, then the central config if it exists, then defaults.
    /// An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)?;
            return Ok(Self::from_toml_str(&raw)?);
        }
        match Self::central_config_path().filter(|p| p.is_file()) {
            Some(central) => {
                let raw = std::fs::read_to_string(central)?;
                Ok(Self::from_toml_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.extraction.selector.trim().is_empty() {
            return Err("extraction.selector must not be empty".to_string());
        }
        if self.limits.max_output_bytes == 0 {
            return Err("limits.max_output_bytes must be greater than zero".to_string());
        }
        let timeouts = [
            ("capture.navigation_timeout", self.capture.navigation_timeout),
            ("capture.network_idle_timeout", self.capture.network_idle_timeout),
            ("capture.process_timeout", self.capture.process_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(format!("{name} must be greater than zero"));
            }
        }
        if self.capture.node_command.trim().is_empty() {
            return Err("capture.node_command must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_depth: self.extraction.max_depth,
            include_hidden: self.extraction.include_hidden,
            compute_styles: self.extraction.compute_styles,
            selector: self.extraction.selector.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert_eq!(cfg.extraction.max_depth, 50);
        assert!(!cfg.extraction.include_hidden);
        assert!(cfg.extraction.compute_styles);
        assert_eq!(cfg.extraction.selector, "body");
        assert_eq!(cfg.limits.max_output_bytes, 10 * 1024 * 1024);
        assert_eq!(cfg.capture.viewport.width, 1440);
        assert_eq!(cfg.capture.viewport.height, 900);
        assert_eq!(cfg.capture.navigation_timeout, Duration::from_secs(30));
        assert_eq!(cfg.capture.network_idle_timeout, Duration::from_secs(10));
        assert_eq!(cfg.capture.process_timeout, Duration::from_secs(45));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults_and_ignores_unknown_keys() {
        let cfg = Config::from_toml_str(
            r##"
            unrelated = 1

            [extraction]
            max_depth = 5
            selector = "#app"
            colour = "blue"

            [capture]
            navigation_timeout = "2m"
            viewport = { width = 1280, height = 720 }
            "##,
        )
        .unwrap();

        assert_eq!(cfg.extraction.max_depth, 5);
        assert_eq!(cfg.extraction.selector, "#app");
        assert!(cfg.extraction.compute_styles);
        assert_eq!(cfg.capture.navigation_timeout, Duration::from_secs(120));
        assert_eq!(cfg.capture.process_timeout, Duration::from_secs(45));
        assert_eq!(cfg.capture.viewport.width, 1280);
        assert_eq!(cfg.limits, LimitsConfig::default());
    }

    #[test]
    fn validate_rejects_empty_selector_and_zero_limits() {
        let mut cfg = Config::default();
        cfg.extraction.selector = "  ".into();
        assert!(cfg.validate().unwrap_err().contains("selector"));

        let mut cfg = Config::default();
        cfg.limits.max_output_bytes = 0;
        assert!(cfg.validate().unwrap_err().contains("max_output_bytes"));

        let mut cfg = Config::default();
        cfg.capture.process_timeout = Duration::ZERO;
        assert!(cfg.validate().unwrap_err().contains("process_timeout"));
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_output_bytes = 2048").unwrap();
        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.limits.max_output_bytes, 2048);
    }

    #[test]
    fn load_fails_for_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }

    #[test]
    fn extract_options_follow_extraction_section() {
        let mut cfg = Config::default();
        cfg.extraction.include_hidden = true;
        cfg.extraction.max_depth = 3;
        let options = cfg.to_extract_options();
        assert!(options.include_hidden);
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.selector, "body");
    }
}
