//! # tydoc-cli: Command-Line Interface
//!
//! Provides the `tydoc` binary over the library crates.
//!
//! ## Subcommands
//!
//! - `tydoc check` merges a document into a schema and checks it.
//! - `tydoc collection` validates a collection and reconciles it with a
//!   previous revision.
//! - `tydoc exists` tests a collection for a member id.
//!
//! ```bash
//! tydoc check --schema item.schema.json item.json
//! tydoc collection --previous stored.json --purge-invalid --append-removed submitted.json
//! tydoc exists --id 7c889624 stored.json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (or, for `exists`, the id is present) |
//! | 1 | Validation failure (or, for `exists`, the id is absent) |
//! | 2 | Operational error: I/O, parse, configuration |
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the library crates; no document logic lives here.
//! - Results go to stdout, logs to stderr.

pub mod check;
pub mod collection;
pub mod config;
pub mod exists;
pub mod input;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tydoc_core::{codec, TydocError, Value};

use crate::config::{CliConfig, OutputStyle};

/// Success.
pub const EXIT_OK: u8 = 0;
/// Validation failure.
pub const EXIT_INVALID: u8 = 1;
/// I/O, parse or configuration error.
pub const EXIT_FAILURE: u8 = 2;

/// Print a value on stdout in the configured layout.
pub fn print_value(value: &Value, style: OutputStyle) -> Result<()> {
    println!("{}", codec::to_text(value, style.is_pretty())?);
    Ok(())
}

/// Log a validation failure and return its exit code.
pub fn report(error: &TydocError) -> u8 {
    tracing::error!(code = error.kind().code(), "{error}");
    EXIT_INVALID
}

/// The schema to use: the flag when given, else the configured default.
pub fn schema_path<'a>(flag: Option<&'a Path>, config: &'a CliConfig) -> Option<&'a Path> {
    flag.or(config.schema.as_deref())
}

/// Load the schema named by [`schema_path`], if any.
pub fn resolve_schema(flag: Option<&PathBuf>, config: &CliConfig) -> Result<Option<Value>> {
    schema_path(flag.map(PathBuf::as_path), config)
        .map(input::load_schema)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tydoc_core::{ErrorKind, UniquenessError};

    #[test]
    fn flag_wins_over_configured_schema() {
        let config = CliConfig {
            schema: Some(PathBuf::from("env.json")),
            ..CliConfig::default()
        };
        assert_eq!(
            schema_path(Some(Path::new("flag.json")), &config),
            Some(Path::new("flag.json"))
        );
        assert_eq!(schema_path(None, &config), Some(Path::new("env.json")));
        assert_eq!(schema_path(None, &CliConfig::default()), None);
    }

    #[test]
    fn validation_failures_map_to_exit_one() {
        let error = TydocError::from(UniquenessError::malformed("no id"));
        assert_eq!(error.kind(), ErrorKind::MalformedSearchableNode);
        assert_eq!(report(&error), EXIT_INVALID);
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let flag = PathBuf::from("/nonexistent/schema.json");
        assert!(resolve_schema(Some(&flag), &CliConfig::default()).is_err());
        assert!(resolve_schema(None, &CliConfig::default()).unwrap().is_none());
    }
}
