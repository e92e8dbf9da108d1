//! Main entry point for the reader token CLI

use clap::Parser;
use readertoken_cli::{run, Cli};
use readertoken_common::LoggingTransformer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    LoggingTransformer::init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    run(&cli, &mut stdout)?;
    Ok(())
}
