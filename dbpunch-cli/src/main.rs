//! Entry point for the `dbpunch` binary.

use anyhow::Result;

fn main() -> Result<()> {
    dbpunch_cli::cli::execute()
}
