use std::path::PathBuf;
use std::process::ExitCode;

use h2f_lib::output::{SourceDescriptor, SourceKind};
use h2f_lib::{capture_page, sanitize_url, Viewport};
use log::info;

use crate::cli::WalkArgs;
use crate::formatting::render_error;
use crate::settings::{
    load_config, log_effective_config, resolve_capture_settings, resolve_walk_settings,
    CaptureFlagSources, WalkFlagSources,
};

use super::emit_page;

/// Run the capture command: render a live URL, then walk it.
#[allow(clippy::too_many_arguments)]
pub async fn run_capture(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    url: String,
    viewport: Viewport,
    nav_timeout: u64,
    network_idle_timeout: u64,
    process_timeout: u64,
    walk: WalkArgs,
) -> ExitCode {
    let format = walk.format;
    let output = walk.output.clone();
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let settings = resolve_walk_settings(&walk, &config, &WalkFlagSources::from_args(raw_args));
    let capture = resolve_capture_settings(
        viewport,
        nav_timeout,
        network_idle_timeout,
        process_timeout,
        &config,
        &CaptureFlagSources::from_args(raw_args),
    );
    if verbose {
        log_effective_config(config_path.as_deref(), &settings, Some(&capture));
    }

    info!("Capturing {}", sanitize_url(&url));
    let document = match capture_page(&url, &capture).await {
        Ok(doc) => doc,
        Err(err) => return render_error(err, format, output),
    };

    emit_page(
        &document,
        SourceDescriptor {
            kind: SourceKind::Url,
            value: sanitize_url(&url),
        },
        &settings,
        walk.allow_oversize,
        format,
        output,
    )
}
