//! `doc-pack`: encode lenient JSON documents (stdin) to the binary form (stdout).
//!
//! Usage:
//!   doc-pack [--verbose] < input.json > output.bin
//!
//! Several documents may follow one another in the input; their binary forms
//! are written back to back.

use std::io::{self, Read, Write};

use anyhow::Context;
use clap::Parser;
use schematic::cli::{init_logging, pack};

#[derive(Debug, Parser)]
#[command(name = "doc-pack", version, about = "Encode JSON documents to the binary form")]
struct Args {
    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("reading stdin")?;
    let bytes = pack(&text)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes).context("writing stdout")?;
    stdout.flush().context("writing stdout")?;
    Ok(())
}
