//! # Collection Subcommand
//!
//! Validate a submitted collection and reconcile it with the stored
//! revision. Steps run in a fixed order:
//!
//! 1. validated construction (merge, check, uniqueness)
//! 2. `--purge-invalid`
//! 3. `--append-removed`
//! 4. `--generate-ids`
//! 5. `--only-active`, `--only-visible`, `--not-deleted`
//!
//! Prints the resulting collection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tydoc_collection::Collection;
use tydoc_core::{Document, TydocError, Value};

use crate::config::CliConfig;
use crate::{input, print_value, report, resolve_schema, EXIT_OK};

/// Arguments for the collection subcommand.
#[derive(Args, Debug)]
pub struct CollectionArgs {
    /// Schema document every member is merged into. Defaults to `TYDOC_SCHEMA`.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Previously stored revision of the collection.
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Assign fresh ids to members that lack one.
    #[arg(long)]
    pub generate_ids: bool,

    /// Append members of the previous revision that were removed, marked deleted.
    #[arg(long, requires = "previous")]
    pub append_removed: bool,

    /// Drop members without an id or unknown to the previous revision.
    #[arg(long, requires = "previous")]
    pub purge_invalid: bool,

    /// Keep only active members.
    #[arg(long)]
    pub only_active: bool,

    /// Keep only visible members.
    #[arg(long)]
    pub only_visible: bool,

    /// Drop logically deleted members.
    #[arg(long)]
    pub not_deleted: bool,

    /// Member id exempt from the filters. Repeatable.
    #[arg(long = "ignore", value_name = "ID")]
    pub ignore: Vec<String>,

    /// Submitted collection (JSON or YAML array).
    pub collection: PathBuf,
}

/// Execute the collection subcommand.
pub fn run_collection(args: &CollectionArgs, config: &CliConfig) -> Result<u8> {
    let schema = resolve_schema(args.schema.as_ref(), config)?;
    let documents = input::load_documents(&args.collection)?;
    let previous = args
        .previous
        .as_deref()
        .map(|path| {
            input::load_documents(path)
                .map(Collection::new)
                .context("cannot load previous revision")
        })
        .transpose()?;

    match reconcile(args, schema.as_ref(), documents, previous.as_ref()) {
        Ok(collection) => {
            tracing::info!(documents = collection.len(), "collection is valid");
            print_value(&collection.to_value(), config.output)?;
            Ok(EXIT_OK)
        }
        Err(e) => Ok(report(&e)),
    }
}

/// Apply the requested steps to `documents`.
pub fn reconcile(
    args: &CollectionArgs,
    schema: Option<&Value>,
    documents: Vec<Document>,
    previous: Option<&Collection>,
) -> Result<Collection, TydocError> {
    let mut collection = Collection::validated(schema, documents)?;

    if let Some(previous) = previous {
        if args.purge_invalid {
            collection.purge_invalid_items(previous)?;
        }
        if args.append_removed {
            collection.append_removed_items(previous)?;
        }
    }
    if args.generate_ids {
        let generated = collection.generate_missing_ids();
        tracing::info!(generated = generated.len(), "assigned new ids");
    }
    if args.only_active {
        collection.filter_active(&args.ignore)?;
    }
    if args.only_visible {
        collection.filter_visible(&args.ignore)?;
    }
    if args.not_deleted {
        collection.filter_not_deleted(&args.ignore)?;
    }
    Ok(collection)
}
