//! # Check Subcommand
//!
//! Merge one document into a schema (when one is configured) and check its
//! typed leaves. Prints the normalized document on success.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tydoc_core::TydocError;
use tydoc_schema::merge_and_check;

use crate::config::CliConfig;
use crate::{input, print_value, report, resolve_schema, EXIT_OK};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document to merge into. Defaults to `TYDOC_SCHEMA`.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Document to check (JSON or YAML).
    pub document: PathBuf,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &CliConfig) -> Result<u8> {
    let schema = resolve_schema(args.schema.as_ref(), config)?;
    let document = input::load_document(&args.document)?;

    match merge_and_check(schema.as_ref(), document.into_value()) {
        Ok(normalized) => {
            tracing::info!(document = %args.document.display(), "document is valid");
            print_value(&normalized, config.output)?;
            Ok(EXIT_OK)
        }
        Err(e) => Ok(report(&TydocError::from(e))),
    }
}
