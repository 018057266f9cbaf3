//! brf-edit - headless host for the braille document engine

use anyhow::Result;
use clap::Parser;

use brf_edit::cli::{self, CliArgs};

fn main() -> Result<()> {
    brf_edit::tracing::init();

    let args = CliArgs::parse();
    tracing::debug!(command = ?args.command, "starting");

    let stdout = std::io::stdout();
    cli::run(args.command, &mut stdout.lock())
}
