use std::fmt::Write as FmtWrite;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use h2f_lib::{deliver, deliver_text, Delivery, H2fError, H2fOutput, Sink, VisualNode};

use crate::cli::OutputFormat;

/// Maximum number of tree lines shown in the human-readable outline.
const OUTLINE_LIMIT: usize = 40;

/// Write output in the requested format.
pub fn write_output(body: &H2fOutput, format: OutputFormat, output: Option<PathBuf>) -> Delivery {
    let sink = Sink::from_output_path(output);
    match format {
        OutputFormat::Json => deliver(body, &sink),
        OutputFormat::Pretty => write_pretty_output(body, &sink),
    }
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: H2fError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let mut payload = H2fOutput::error(error_payload);
    if let H2fOutput::Error(out) = &mut payload {
        out.message = Some(out.error.message.clone());
    }

    if let Delivery::Undelivered { reason } = write_output(&payload, format, output.clone()) {
        eprintln!("Failed to write error output: {}", reason);
        if output.is_some() {
            // Fall back to stdout.
            if let Delivery::Undelivered { reason } = deliver(&payload, &Sink::Stdout) {
                eprintln!("Failed to write error output: {}", reason);
            }
        }
    }

    // Reserve exit code 2 for fatal/errors; oversize results use 1.
    ExitCode::from(2)
}

/// Write pretty output: human-readable on a terminal, indented JSON otherwise.
fn write_pretty_output(body: &H2fOutput, sink: &Sink) -> Delivery {
    let use_human = *sink == Sink::Stdout && std::io::stdout().is_terminal();

    if use_human {
        return deliver_text(&format_pretty(body, true), sink);
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    match serde_json::to_string_pretty(body) {
        Ok(content) => deliver_text(&content, sink),
        Err(err) => Delivery::Undelivered {
            reason: format!("serialization failed: {err}"),
        },
    }
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &H2fOutput, colorize: bool) -> String {
    match body {
        H2fOutput::Extract(out) => {
            let mut buf = String::new();
            let stats = &out.stats;
            let header = if stats.oversize {
                color("[OVERSIZE]", "33", colorize)
            } else {
                color("[EXTRACT]", "32", colorize)
            };
            writeln!(
                buf,
                "{} {} nodes from {} ({:?})",
                header, stats.node_count, out.source.value, out.source.kind
            )
            .ok();
            let size = format!(
                "{:.2} MB of {:.2} MB",
                stats.size_bytes as f64 / 1024.0 / 1024.0,
                stats.max_bytes as f64 / 1024.0 / 1024.0
            );
            let size_code = if stats.oversize { "31" } else { "32" };
            writeln!(buf, "Size: {}", color(&size, size_code, colorize)).ok();
            writeln!(
                buf,
                "Assets: {} images, {} svgs, {} font families",
                stats.image_count,
                stats.svg_count,
                out.data.fonts.len()
            )
            .ok();

            if !out.fonts_to_load.is_empty() {
                writeln!(buf, "Fonts to load:").ok();
                for font in &out.fonts_to_load {
                    writeln!(buf, "- {} {}", font.family, font.style).ok();
                }
            }

            writeln!(buf, "Tree:").ok();
            let mut lines = 0;
            outline(&out.data.tree, 0, &mut lines, &mut buf);
            if stats.node_count > lines {
                writeln!(buf, "  … {} more nodes", stats.node_count - lines).ok();
            }
            buf
        }
        H2fOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or(out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn outline(node: &VisualNode, depth: usize, lines: &mut usize, buf: &mut String) {
    if *lines >= OUTLINE_LIMIT {
        return;
    }
    *lines += 1;
    let indent = "  ".repeat(depth + 1);
    match &node.direct_text {
        Some(text) => {
            let short: String = text.chars().take(32).collect();
            let ellipsis = if text.chars().count() > 32 { "…" } else { "" };
            writeln!(buf, "{indent}{} [{:?}] \"{short}{ellipsis}\"", node.tag_name, node.kind).ok()
        }
        None => writeln!(buf, "{indent}{} [{:?}]", node.tag_name, node.kind).ok(),
    };
    for child in &node.children {
        outline(child, depth + 1, lines, buf);
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for a walk: oversize results are recoverable.
pub fn exit_code_for_extract(oversize: bool) -> ExitCode {
    if oversize {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2f_lib::output::{ExtractOutput, ExtractStats, SourceDescriptor, SourceKind};
    use h2f_lib::{
        traverse, ExtractOptions, FontName, HostElement, PageData, H2F_OUTPUT_VERSION,
    };
    use h2f_lib::types::PageMetadata;

    fn extract_output(oversize: bool) -> H2fOutput {
        let root = HostElement::new("body")
            .with_child(HostElement::new("h1").with_text("A fairly long heading that gets cut short"))
            .with_child(HostElement::new("div"));
        let tree = traverse(&root, 0, &ExtractOptions::default()).unwrap();
        H2fOutput::Extract(Box::new(ExtractOutput {
            version: H2F_OUTPUT_VERSION.to_string(),
            source: SourceDescriptor {
                kind: SourceKind::Snapshot,
                value: "page.json".to_string(),
            },
            stats: ExtractStats {
                node_count: 3,
                image_count: 1,
                svg_count: 0,
                size_bytes: 2 * 1024 * 1024,
                max_bytes: 1024 * 1024,
                oversize,
            },
            fonts_to_load: vec![FontName::new("Inter", "Bold")],
            data: PageData {
                metadata: PageMetadata {
                    url: None,
                    title: None,
                    timestamp: 1,
                    viewport: Default::default(),
                    version: H2F_OUTPUT_VERSION.to_string(),
                },
                tree,
                images: vec![],
                svgs: vec![],
                fonts: vec!["Inter".to_string()],
            },
        }))
    }

    #[test]
    fn exit_code_for_extract_maps_oversize() {
        assert_eq!(exit_code_for_extract(false), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_extract(true), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("err.json");
        let code = render_error(
            H2fError::Config("boom".to_string()),
            OutputFormat::Json,
            Some(path.clone()),
        );
        assert_eq!(code, ExitCode::from(2));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["mode"], "error");
        assert_eq!(written["message"], "boom");
        assert_eq!(written["error"]["code"], "CONFIG_ERROR");
    }

    #[test]
    fn format_pretty_includes_stats_fonts_and_outline() {
        let pretty = format_pretty(&extract_output(false), false);
        assert!(pretty.contains("[EXTRACT] 3 nodes from page.json"));
        assert!(pretty.contains("Size: 2.00 MB of 1.00 MB"));
        assert!(pretty.contains("1 images, 0 svgs, 1 font families"));
        assert!(pretty.contains("- Inter Bold"));
        assert!(pretty.contains("h1 [Text] \"A fairly long heading that gets …\""));
        assert!(pretty.contains("    div [Container]"));
    }

    #[test]
    fn format_pretty_flags_oversize() {
        let pretty = format_pretty(&extract_output(true), true);
        assert!(pretty.contains("[OVERSIZE]"));
        assert!(pretty.contains("\x1b[31m2.00 MB of 1.00 MB\x1b[0m"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let mut output = H2fOutput::error(h2f_lib::ErrorPayload::new(
            h2f_lib::ErrorCode::ConfigError,
            "bad input".to_string(),
            "check flags",
        ));
        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));

        if let H2fOutput::Error(out) = &mut output {
            out.message = Some("overridden".to_string());
        }
        assert!(format_pretty(&output, false).contains("[ERROR] overridden"));
    }

    #[test]
    fn pretty_output_to_file_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let delivery = write_output(&extract_output(false), OutputFormat::Pretty, Some(path.clone()));
        assert!(delivery.is_delivered());
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\n  \"mode\": \"extract\""));
    }
}
