use std::path::Path;
use std::time::Duration;

use h2f_lib::{CaptureOptions, Config, ExtractOptions, H2fError, Viewport};
use log::debug;

use crate::cli::WalkArgs;

/// Tracks which walk flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct WalkFlagSources {
    pub selector: bool,
    pub max_depth: bool,
    pub include_hidden: bool,
    pub no_styles: bool,
    pub max_bytes: bool,
}

impl WalkFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            selector: flag_present(args, "--selector"),
            max_depth: flag_present(args, "--max-depth"),
            include_hidden: flag_present(args, "--include-hidden"),
            no_styles: flag_present(args, "--no-styles"),
            max_bytes: flag_present(args, "--max-bytes"),
        }
    }
}

/// Tracks which capture flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct CaptureFlagSources {
    pub viewport: bool,
    pub nav_timeout: bool,
    pub network_idle_timeout: bool,
    pub process_timeout: bool,
}

impl CaptureFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            viewport: flag_present(args, "--viewport"),
            nav_timeout: flag_present(args, "--nav-timeout"),
            network_idle_timeout: flag_present(args, "--network-idle-timeout"),
            process_timeout: flag_present(args, "--process-timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Resolved walk settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedWalkSettings {
    pub options: ExtractOptions,
    pub max_bytes: usize,
}

/// Merge walk flags with the config file, preferring CLI when flags are present.
pub fn resolve_walk_settings(
    walk: &WalkArgs,
    config: &Config,
    flags: &WalkFlagSources,
) -> ResolvedWalkSettings {
    let defaults = config.to_extract_options();
    ResolvedWalkSettings {
        options: ExtractOptions {
            max_depth: if flags.max_depth {
                walk.max_depth
            } else {
                defaults.max_depth
            },
            include_hidden: if flags.include_hidden {
                walk.include_hidden
            } else {
                defaults.include_hidden
            },
            compute_styles: if flags.no_styles {
                !walk.no_styles
            } else {
                defaults.compute_styles
            },
            selector: if flags.selector {
                walk.selector.clone()
            } else {
                defaults.selector
            },
        },
        max_bytes: if flags.max_bytes {
            walk.max_bytes
        } else {
            config.limits.max_output_bytes
        },
    }
}

/// Merge capture flags with the config file, preferring CLI when flags are present.
pub fn resolve_capture_settings(
    cli_viewport: Viewport,
    cli_nav_timeout: u64,
    cli_network_idle_timeout: u64,
    cli_process_timeout: u64,
    config: &Config,
    flags: &CaptureFlagSources,
) -> CaptureOptions {
    let capture = &config.capture;
    CaptureOptions {
        node_command: capture.node_command.clone(),
        viewport: if flags.viewport {
            cli_viewport
        } else {
            capture.viewport
        },
        navigation_timeout: if flags.nav_timeout {
            Duration::from_secs(cli_nav_timeout)
        } else {
            capture.navigation_timeout
        },
        network_idle_timeout: if flags.network_idle_timeout {
            Duration::from_secs(cli_network_idle_timeout)
        } else {
            capture.network_idle_timeout
        },
        process_timeout: if flags.process_timeout {
            Duration::from_secs(cli_process_timeout)
        } else {
            capture.process_timeout
        },
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/h2f/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, H2fError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        H2fError::Config(format!("Failed to read config file {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config file ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config file: {}", e));
        H2fError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Log the effective settings (visible with --verbose).
pub fn log_effective_config(
    config_source: Option<&Path>,
    walk: &ResolvedWalkSettings,
    capture: Option<&CaptureOptions>,
) {
    debug!("{}", format_effective_config(config_source, walk, capture));
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    config_source: Option<&Path>,
    walk: &ResolvedWalkSettings,
    capture: Option<&CaptureOptions>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let options = &walk.options;
    let mut summary = format!(
        "Effective config [{source}]: selector={:?}, max_depth={}, include_hidden={}, compute_styles={}, max_bytes={}",
        options.selector,
        options.max_depth,
        options.include_hidden,
        options.compute_styles,
        walk.max_bytes
    );
    if let Some(capture) = capture {
        summary.push_str(&format!(
            ", viewport={}, timeouts: nav={}s, network-idle={}s, process={}s, node={}",
            capture.viewport,
            capture.navigation_timeout.as_secs(),
            capture.network_idle_timeout.as_secs(),
            capture.process_timeout.as_secs(),
            capture.node_command
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn walk_args() -> WalkArgs {
        WalkArgs {
            selector: "main".to_string(),
            max_depth: 4,
            include_hidden: true,
            no_styles: true,
            max_bytes: 512,
            allow_oversize: false,
            format: OutputFormat::Json,
            output: None,
        }
    }

    #[test]
    fn flag_present_matches_bare_and_assigned_forms() {
        let args: Vec<String> = ["h2f", "extract", "--max-depth=3", "--selector", "main"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(flag_present(&args, "--max-depth"));
        assert!(flag_present(&args, "--selector"));
        assert!(!flag_present(&args, "--max-bytes"));
    }

    #[test]
    fn resolve_walk_settings_prefers_config_when_flags_absent() {
        let mut cfg = Config::default();
        cfg.extraction.selector = "#app".into();
        cfg.extraction.max_depth = 9;
        cfg.limits.max_output_bytes = 4096;

        let resolved = resolve_walk_settings(&walk_args(), &cfg, &WalkFlagSources::default());

        assert_eq!(resolved.options.selector, "#app");
        assert_eq!(resolved.options.max_depth, 9);
        assert!(!resolved.options.include_hidden);
        assert!(resolved.options.compute_styles);
        assert_eq!(resolved.max_bytes, 4096);
    }

    #[test]
    fn resolve_walk_settings_prefers_cli_when_flags_present() {
        let flags = WalkFlagSources {
            selector: true,
            max_depth: true,
            include_hidden: true,
            no_styles: true,
            max_bytes: true,
        };
        let resolved = resolve_walk_settings(&walk_args(), &Config::default(), &flags);

        assert_eq!(resolved.options.selector, "main");
        assert_eq!(resolved.options.max_depth, 4);
        assert!(resolved.options.include_hidden);
        assert!(!resolved.options.compute_styles);
        assert_eq!(resolved.max_bytes, 512);
    }

    #[test]
    fn resolve_capture_settings_mixes_sources() {
        let mut cfg = Config::default();
        cfg.capture.network_idle_timeout = Duration::from_secs(3);
        let flags = CaptureFlagSources {
            viewport: true,
            nav_timeout: true,
            ..CaptureFlagSources::default()
        };
        let resolved = resolve_capture_settings(
            Viewport {
                width: 10,
                height: 20,
            },
            50,
            60,
            70,
            &cfg,
            &flags,
        );

        assert_eq!(resolved.viewport.width, 10);
        assert_eq!(resolved.navigation_timeout, Duration::from_secs(50));
        assert_eq!(resolved.network_idle_timeout, Duration::from_secs(3));
        assert_eq!(resolved.process_timeout, Duration::from_secs(45));
    }

    #[test]
    fn load_config_reports_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h2f.toml");
        std::fs::write(&path, "[extraction]\nselector = \"\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid config file"), "got: {msg}");
        assert!(msg.contains("selector"), "got: {msg}");
    }

    #[test]
    fn load_config_reports_unreadable_file() {
        let err = load_config(Some(Path::new("/definitely/missing/h2f.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let walk = ResolvedWalkSettings {
            options: ExtractOptions::default(),
            max_bytes: 2048,
        };
        let capture = CaptureOptions {
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            navigation_timeout: Duration::from_secs(12),
            network_idle_timeout: Duration::from_secs(8),
            ..CaptureOptions::default()
        };
        let summary =
            format_effective_config(Some(Path::new("h2f.toml")), &walk, Some(&capture));
        assert!(summary.contains("selector=\"body\""));
        assert!(summary.contains("max_depth=50"));
        assert!(summary.contains("max_bytes=2048"));
        assert!(summary.contains("viewport=1280x720"));
        assert!(summary.contains("nav=12s"));
        assert!(summary.contains("network-idle=8s"));
        assert!(summary.contains("process=45s"));
        assert!(summary.contains("h2f.toml"));

        let summary = format_effective_config(None, &walk, None);
        assert!(summary.contains("[defaults]"));
        assert!(!summary.contains("viewport"));
    }
}
