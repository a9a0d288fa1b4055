//! Configuration error types.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration. All of them are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for the expected schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is empty.
    #[error("configuration value '{0}' must not be empty")]
    Missing(&'static str),

    /// A repository entry lacks its bracketed branch list.
    #[error(
        "invalid repository entry '{0}'; specify branches to monitor as Repository[Branch1, Branch2]"
    )]
    Repository(String),

    /// A tester mapping entry does not split into `name:DOMAIN\account`.
    #[error("invalid tester mapping '{0}'; separate entries with ':' like name:DOMAIN\\NAME")]
    TesterMapping(String),

    /// The polling interval is not a positive number of minutes.
    #[error("update interval must be a positive number of minutes, got {0}")]
    Interval(f64),

    /// The comment template does not compile.
    #[error("invalid comment template: {0}")]
    Template(String),

    /// The pull request page size is neither a positive integer nor `all`.
    #[error("pull_requests_to_take must be a positive integer or \"all\", got '{0}'")]
    PageSize(String),
}
