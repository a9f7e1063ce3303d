//! # Exists Subcommand
//!
//! Test whether a collection has a member with a given id. The answer is the
//! exit code: 0 when present, 1 when absent.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tydoc_collection::Collection;

use crate::config::CliConfig;
use crate::{input, report, EXIT_INVALID, EXIT_OK};

/// Arguments for the exists subcommand.
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Member id to look for.
    #[arg(long)]
    pub id: String,

    /// Collection to search (JSON or YAML array).
    pub collection: PathBuf,
}

/// Execute the exists subcommand.
pub fn run_exists(args: &ExistsArgs, _config: &CliConfig) -> Result<u8> {
    let collection = Collection::new(input::load_documents(&args.collection)?);
    match collection.exists(&args.id) {
        Ok(true) => {
            tracing::info!(id = %args.id, "member found");
            Ok(EXIT_OK)
        }
        Ok(false) => {
            tracing::info!(id = %args.id, "member not found");
            Ok(EXIT_INVALID)
        }
        Err(e) => Ok(report(&e)),
    }
}
