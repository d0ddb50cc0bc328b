use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LauncherError>;

/// Everything the launcher surfaces to the user. Network and install
/// failures drive the controller to `Failed`; launch failures are reported
/// without touching controller state.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Version fetch or archive download failed.
    #[error("network error: {context}")]
    Network {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Archive extraction or a filesystem write failed.
    #[error("install error: {context}")]
    Install {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Launch requested but no executable is present.
    #[error("nothing installed: {} does not exist", path.display())]
    NotInstalled { path: PathBuf },

    /// The executable exists but could not be started.
    #[error("could not start {}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LauncherError {
    pub fn network(context: impl Into<String>, source: impl Into<anyhow::Error>) -> LauncherError {
        LauncherError::Network {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn install(context: impl Into<String>, source: impl Into<anyhow::Error>) -> LauncherError {
        LauncherError::Install {
            context: context.into(),
            source: source.into(),
        }
    }
}
