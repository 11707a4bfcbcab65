use std::{io, path::PathBuf};
use thiserror::Error;

/// Fatal outcomes of an update run. Each one ends the updater with exit code 1.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("no argument for {flag}")]
    MissingArgumentValue { flag: &'static str },

    #[error("{flag} is required (both --update-source-path and --update-dest-path must be given)")]
    MissingRequiredArgument { flag: &'static str },

    #[error("--update-source-path file does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("unable to copy file to the destination after {attempts} attempts, giving up: {source}")]
    UpdateInstallFailed {
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("update installed but relaunch failed: {0}")]
    RelaunchFailed(#[from] LaunchError),
}

/// Failure to create a new process for an executable.
#[derive(Debug, Error)]
#[error("failed to start {}: {source}", path.display())]
pub struct LaunchError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
