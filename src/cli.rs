//! Command-line interface
//!
//! Runs the engine headless:
//! - `info` prints document and page statistics
//! - `convert` rewrites a document in the format named by the output extension
//! - `rewrap` reflows overlong lines

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::codec::{self, Decoded, FileFormat};
use crate::layout::{self, PageMetrics};

/// Braille (BRF) document tool
#[derive(Parser, Debug)]
#[command(name = "brf-edit", version, about = "Braille (BRF) document engine")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show line, page and paragraph counts
    Info {
        file: PathBuf,
    },
    /// Convert between BRF and BZY (chosen by file extension)
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// Reflow lines longer than the page width
    Rewrap {
        file: PathBuf,
        /// Cells per line (defaults to the file's setting)
        #[arg(long, value_name = "N")]
        chars: Option<usize>,
        /// First line to reflow, 1-indexed
        #[arg(long, value_name = "L", default_value_t = 1)]
        from_line: usize,
        /// Write here instead of overwriting the input
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Statistics reported by `info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub format: FileFormat,
    pub lines: usize,
    pub pages: usize,
    pub paragraphs: usize,
    pub lines_per_page: usize,
    pub chars_per_line: usize,
    /// Lines wider than `chars_per_line`
    pub overlong: usize,
}

impl DocumentInfo {
    pub fn of(format: FileFormat, decoded: &Decoded) -> Self {
        let metrics = metrics_of(decoded);
        let doc = &decoded.document;
        let lines: Vec<_> = doc.lines().collect();
        Self {
            format,
            lines: lines.len(),
            pages: metrics.page_count(lines.len()),
            paragraphs: lines.iter().filter(|l| l.paragraph_end).count(),
            lines_per_page: metrics.lines_per_page(),
            chars_per_line: metrics.chars_per_line(),
            overlong: lines
                .iter()
                .filter(|l| l.len() > metrics.chars_per_line())
                .count(),
        }
    }
}

fn metrics_of(decoded: &Decoded) -> PageMetrics {
    let mut metrics = PageMetrics::default();
    decoded.apply_metrics(&mut metrics);
    metrics
}

fn open(path: &Path) -> Result<Decoded> {
    codec::read_file(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Execute a parsed command, writing any report to `out`
pub fn run(command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Info { file } => {
            let decoded = open(&file)?;
            let info = DocumentInfo::of(FileFormat::from_path(&file), &decoded);
            writeln!(out, "{}", file.display())?;
            writeln!(out, "  format:         {:?}", info.format)?;
            writeln!(out, "  lines:          {}", info.lines)?;
            writeln!(out, "  pages:          {}", info.pages)?;
            writeln!(out, "  paragraphs:     {}", info.paragraphs)?;
            writeln!(out, "  lines per page: {}", info.lines_per_page)?;
            writeln!(out, "  chars per line: {}", info.chars_per_line)?;
            if info.overlong > 0 {
                writeln!(out, "  overlong lines: {}", info.overlong)?;
            }
        }

        Command::Convert { input, output } => {
            let decoded = open(&input)?;
            let metrics = metrics_of(&decoded);
            codec::write_file(&output, &decoded.document, &metrics)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            writeln!(out, "{} -> {}", input.display(), output.display())?;
        }

        Command::Rewrap {
            file,
            chars,
            from_line,
            output,
        } => {
            let mut decoded = open(&file)?;
            let mut metrics = metrics_of(&decoded);
            if let Some(chars) = chars {
                if !metrics.set_chars_per_line(chars) {
                    bail!("--chars must be at least 1");
                }
            }
            let line_count = decoded.document.line_count();
            if from_line == 0 || from_line > line_count {
                bail!("--from-line must be between 1 and {}", line_count);
            }

            let changed = layout::rewrap_from_line(&mut decoded.document, &metrics, from_line - 1);
            let target = output.unwrap_or(file);
            codec::write_file(&target, &decoded.document, &metrics)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            let status = if changed { "rewrapped" } else { "unchanged" };
            writeln!(out, "{}: {}", target.display(), status)?;
        }
    }
    Ok(())
}
