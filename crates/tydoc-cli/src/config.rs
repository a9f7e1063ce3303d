//! CLI configuration.
//!
//! Defaults suit interactive use. Override via environment variables; flags
//! given on the command line take precedence over both.

use std::path::PathBuf;
use std::str::FromStr;

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(other.to_string()),
        }
    }
}

/// Layout of the JSON printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Indented.
    #[default]
    Pretty,
    /// Single line.
    Compact,
}

impl OutputStyle {
    pub fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(other.to_string()),
        }
    }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub log_format: LogFormat,
    pub output: OutputStyle,
    /// Schema used when a subcommand is not given `--schema`.
    pub schema: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TYDOC_LOG_FORMAT` (`text` | `json`, default: `text`)
    /// - `TYDOC_OUTPUT` (`pretty` | `compact`, default: `pretty`)
    /// - `TYDOC_SCHEMA` (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            log_format: parse_var(&lookup, "TYDOC_LOG_FORMAT")?.unwrap_or_default(),
            output: parse_var(&lookup, "TYDOC_OUTPUT")?.unwrap_or_default(),
            schema: lookup("TYDOC_SCHEMA")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|value| ConfigError::InvalidValue { var, value }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}
