//! Logging setup and debug snapshots of editing state
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=chord=trace,caret=debug` - scoped filtering
//! - `RUST_LOG=brf_edit::codec=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/brf-edit/logs/brf-edit.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{EditorModel, ViewKind};

/// Base name of the rolling log file
pub const LOG_FILE_NAME: &str = "brf-edit.log";

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`); the file layer always
/// records debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Caret position of one pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneCaret {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Both panes' carets plus the document shape, for before/after diffs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretSnapshot {
    pub active: ViewKind,
    pub braille: PaneCaret,
    pub ascii: PaneCaret,
    pub line_count: usize,
    pub revision: u64,
}

impl CaretSnapshot {
    pub fn from_model(model: &EditorModel) -> Self {
        let pane = |kind: ViewKind| {
            let view = model.view(kind);
            let (line, column) = view.caret_position(&model.document);
            PaneCaret {
                offset: view.caret(),
                line,
                column,
            }
        };
        Self {
            active: model.active,
            braille: pane(ViewKind::Braille),
            ascii: pane(ViewKind::Ascii),
            line_count: model.document.line_count(),
            revision: model.document.revision,
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &CaretSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.active != other.active {
            changes.push(format!("focus {:?} → {:?}", self.active, other.active));
        }
        for (name, before, after) in [
            ("braille", self.braille, other.braille),
            ("ascii", self.ascii, other.ascii),
        ] {
            if before != after {
                changes.push(format!(
                    "{}: ({},{}) → ({},{})",
                    name, before.line, before.column, after.line, after.column
                ));
            }
        }
        if self.line_count != other.line_count {
            changes.push(format!("lines {} → {}", self.line_count, other.line_count));
        }
        if self.revision != other.revision {
            changes.push(format!("rev {} → {}", self.revision, other.revision));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
