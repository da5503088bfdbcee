//! `doc-unpack`: decode binary documents (stdin) to JSON text (stdout).
//!
//! Usage:
//!   doc-unpack [--pretty] [--verbose] < input.bin
//!
//! Each decoded document is written on its own line, or as an indented block
//! with `--pretty`.

use std::io::{self, Read, Write};

use anyhow::Context;
use clap::Parser;
use schematic::cli::{init_logging, unpack};

#[derive(Debug, Parser)]
#[command(name = "doc-unpack", version, about = "Decode binary documents to JSON text")]
struct Args {
    /// Indent nested fields two spaces per level.
    #[arg(short, long)]
    pretty: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("reading stdin")?;
    let text = unpack(&bytes, args.pretty)?;
    io::stdout()
        .write_all(text.as_bytes())
        .context("writing stdout")?;
    Ok(())
}
