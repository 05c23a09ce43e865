use std::path::PathBuf;
use std::process::ExitCode;

use h2f_lib::output::{SourceDescriptor, SourceKind};
use h2f_lib::{H2fError, HostDocument};
use log::debug;

use crate::cli::WalkArgs;
use crate::formatting::render_error;
use crate::settings::{load_config, log_effective_config, resolve_walk_settings, WalkFlagSources};

use super::emit_page;

/// Run the extract command over a saved host snapshot.
pub async fn run_extract(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    input: PathBuf,
    walk: WalkArgs,
) -> ExitCode {
    let format = walk.format;
    let output = walk.output.clone();
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let settings = resolve_walk_settings(&walk, &config, &WalkFlagSources::from_args(raw_args));
    if verbose {
        log_effective_config(config_path.as_deref(), &settings, None);
    }

    let raw = match tokio::fs::read_to_string(&input).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return render_error(
                H2fError::Config(format!("Snapshot file not found: {}", input.display())),
                format,
                output,
            )
        }
        Err(err) => return render_error(H2fError::Io(err), format, output),
    };
    let document: HostDocument = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(err) => return render_error(H2fError::Serialization(err), format, output),
    };
    debug!("Loaded snapshot {} ({} bytes)", input.display(), raw.len());

    emit_page(
        &document,
        SourceDescriptor {
            kind: SourceKind::Snapshot,
            value: input.display().to_string(),
        },
        &settings,
        walk.allow_oversize,
        format,
        output,
    )
}
