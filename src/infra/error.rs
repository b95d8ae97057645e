use std::path::PathBuf;

use thiserror::Error;

/// Failures while standing the engine up. Runtime failures are typed per
/// operation in the usecases layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read engine config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse engine config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
