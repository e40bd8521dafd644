//! CLI for the inventory-to-tagfile converter.

mod convert;

use anyhow::Result;
use clap::Parser;

pub use convert::run_convert;

/// Convert a Sphinx object inventory into a Doxygen tag file.
#[derive(Debug, Parser)]
#[command(name = "inv2tag")]
#[command(about = "Convert a Sphinx object inventory into a Doxygen tag file", long_about = None)]
pub struct Cli {
    /// Package name; the output file is `<package>.tag`.
    pub package: String,

    /// Base URL of the hosted documentation (where objects.inv lives).
    pub url: String,
}

/// Parse arguments and run the conversion.
///
/// A wrong argument count is a usage problem, not a failure: the usage text
/// is printed and the process exits with status 0. Runtime failures (fetch,
/// format, write) bubble up to `main` and exit 1.
pub fn run_from_args() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Covers --help/--version as well as any wrong argument count.
            err.print()?;
            return Ok(());
        }
    };
    run_convert(&cli.package, &cli.url)
}
