//! Binary crate for the `wxfeed` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - JSON and one-line summary output

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logger;

fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    logger::init(cmd.debug)?;
    cmd.run()
}
