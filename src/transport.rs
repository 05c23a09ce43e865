//! Delivery of serialized output to its destination.
//!
//! Every attempt ends in a [`Delivery`]; write and serialization failures
//! come back as [`Delivery::Undelivered`] instead of being dropped.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, warn};
use serde::Serialize;

use crate::output::H2fOutput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    pub fn from_output_path(path: Option<PathBuf>) -> Self {
        path.map(Sink::File).unwrap_or(Sink::Stdout)
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("stdout"),
            Sink::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Delivery {
    Delivered { bytes: usize, target: String },
    Undelivered { reason: String },
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

/// Serialize `output` as compact JSON and write it to `sink`.
pub fn deliver(output: &H2fOutput, sink: &Sink) -> Delivery {
    match serde_json::to_string(output) {
        Ok(content) => deliver_text(&content, sink),
        Err(err) => {
            warn!("transport: failed to serialize output: {err}");
            Delivery::Undelivered {
                reason: format!("serialization failed: {err}"),
            }
        }
    }
}

/// Write already-rendered text to `sink`, newline terminated.
pub fn deliver_text(content: &str, sink: &Sink) -> Delivery {
    let result = match sink {
        Sink::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{content}").and_then(|_| handle.flush())
        }
        Sink::File(path) => std::fs::write(path, format!("{content}\n")),
    };
    match result {
        Ok(()) => {
            let bytes = content.len() + 1;
            debug!("transport: wrote {bytes} bytes to {sink}");
            Delivery::Delivered {
                bytes,
                target: sink.to_string(),
            }
        }
        Err(err) => {
            warn!("transport: failed to write to {sink}: {err}");
            Delivery::Undelivered {
                reason: format!("failed to write to {sink}: {err}"),
            }
        }
    }
}
