mod capture;
mod extract;

pub use capture::run_capture;
pub use extract::run_extract;

use std::path::PathBuf;
use std::process::ExitCode;

use h2f_lib::output::{ExtractOutput, ExtractStats, SourceDescriptor};
use h2f_lib::{
    check_output_size, count_nodes, extract_page_data, resolve_fonts, validate_page_data,
    Delivery, FontCache, H2fError, H2fOutput, HostDocument, H2F_OUTPUT_VERSION,
};
use log::{info, warn};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_extract, render_error, write_output};
use crate::settings::ResolvedWalkSettings;

/// Walk a host document, apply the size policy and write the result.
pub(crate) fn emit_page(
    document: &HostDocument,
    source: SourceDescriptor,
    settings: &ResolvedWalkSettings,
    allow_oversize: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let page = match extract_page_data(document, &settings.options) {
        Ok(page) => page,
        Err(err) => return render_error(err, format, output),
    };
    if let Err(err) = validate_page_data(&page) {
        return render_error(err, format, output);
    }

    let (size_bytes, oversize) = match check_output_size(&page, settings.max_bytes) {
        Ok(report) => (report.size_bytes, false),
        Err(H2fError::OversizeResult { size_bytes, .. }) if allow_oversize => {
            warn!(
                "Extracted data exceeds budget ({} > {} bytes); emitting anyway",
                size_bytes, settings.max_bytes
            );
            (size_bytes, true)
        }
        Err(err) if err.is_recoverable() => {
            render_error(err, format, output);
            return exit_code_for_extract(true);
        }
        Err(err) => return render_error(err, format, output),
    };

    let mut fonts = FontCache::default();
    let fonts_to_load = resolve_fonts(&page.tree, &mut fonts);

    let stats = ExtractStats {
        node_count: count_nodes(&page.tree),
        image_count: page.images.len(),
        svg_count: page.svgs.len(),
        size_bytes,
        max_bytes: settings.max_bytes,
        oversize,
    };
    info!(
        "Extracted {} nodes from {} ({} bytes)",
        stats.node_count, source.value, stats.size_bytes
    );

    let body = H2fOutput::Extract(Box::new(ExtractOutput {
        version: H2F_OUTPUT_VERSION.to_string(),
        source,
        stats,
        fonts_to_load,
        data: page,
    }));
    match write_output(&body, format, output) {
        Delivery::Delivered { .. } => exit_code_for_extract(oversize),
        Delivery::Undelivered { reason } => {
            render_error(H2fError::Config(reason), format, None)
        }
    }
}
