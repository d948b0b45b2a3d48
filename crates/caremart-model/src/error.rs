use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config{}: {source}", describe_path(.path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown target '{name}' (available: {available})")]
    UnknownTarget { name: String, available: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

fn describe_path(path: Option<&std::path::Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ConfigError>;
