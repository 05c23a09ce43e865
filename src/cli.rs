use clap::{Args, Parser, Subcommand, ValueEnum};
use h2f_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "h2f")]
#[command(
    version,
    about = "HTML to Figma - Extract design-ready style trees from rendered pages",
    long_about = "HTML to Figma (h2f)\n\nModes:\n- extract: walk a saved host snapshot (JSON) and emit the normalized visual tree.\n- capture: render a live URL in a headless browser (Node + Playwright), then walk it.\n\nExit codes: 0 success, 1 oversize result, 2 error.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for extraction/limits/capture; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk a saved host snapshot
    Extract {
        #[arg(long, short, value_name = "PATH", help = "Host snapshot JSON file")]
        input: PathBuf,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Capture a live page and walk it
    Capture {
        #[arg(long, help = "Page URL (http, https or file)")]
        url: String,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport dimensions (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(
            long,
            default_value = "30",
            help = "Navigation timeout in seconds for page load"
        )]
        nav_timeout: u64,

        #[arg(
            long,
            default_value = "10",
            help = "Network idle wait timeout in seconds after navigation"
        )]
        network_idle_timeout: u64,

        #[arg(
            long,
            default_value = "45",
            help = "Overall Playwright process timeout in seconds"
        )]
        process_timeout: u64,

        #[command(flatten)]
        walk: WalkArgs,
    },
}

/// Flags shared by every walking subcommand.
#[derive(Args, Debug, Clone)]
pub struct WalkArgs {
    #[arg(long, default_value = "body", help = "Traversal root selector")]
    pub selector: String,

    #[arg(
        long,
        default_value = "50",
        help = "Maximum depth below the root (0 keeps only the root)"
    )]
    pub max_depth: usize,

    #[arg(long, help = "Keep hidden elements and their subtrees")]
    pub include_hidden: bool,

    #[arg(long, help = "Skip style translation (structure only)")]
    pub no_styles: bool,

    #[arg(
        long,
        default_value = "10485760",
        help = "Output budget in bytes for the serialized page data"
    )]
    pub max_bytes: usize,

    #[arg(
        long,
        help = "Emit the data even when it exceeds --max-bytes (exit code stays 1)"
    )]
    pub allow_oversize: bool,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
