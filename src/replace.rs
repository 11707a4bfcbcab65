use crate::{config::RetryPolicy, error::UpdateError};
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

/// One attempt at putting `source` in place of `destination`.
pub trait FileCopier {
    fn copy(&mut self, source: &Path, destination: &Path) -> io::Result<u64>;
}

/// Copies into a sibling staging file, then renames it over the destination.
///
/// A failed attempt never leaves the destination partially written: either
/// the rename lands the complete file or the old file stays as it was.
#[derive(Debug, Default, Clone, Copy)]
pub struct StagedCopier;

impl StagedCopier {
    pub fn staging_path(destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".partial");
        destination.with_file_name(name)
    }
}

impl FileCopier for StagedCopier {
    fn copy(&mut self, source: &Path, destination: &Path) -> io::Result<u64> {
        let staging = Self::staging_path(destination);

        let result = fs::copy(source, &staging).and_then(|bytes| {
            fs::rename(&staging, destination)?;
            Ok(bytes)
        });

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}

/// Outcome of a successful replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replaced {
    /// 1-based number of the attempt that succeeded.
    pub attempts: u32,
    pub bytes: u64,
}

/// Copy `source` over `destination`, retrying per `policy`.
///
/// Every failure is logged and followed by `sleep(policy.delay)`, except the
/// last one. Returns `UpdateInstallFailed` carrying the last error once the
/// attempt budget is spent.
pub fn replace_with_retry(
    copier: &mut dyn FileCopier,
    sleep: &mut dyn FnMut(Duration),
    policy: RetryPolicy,
    source: &Path,
    destination: &Path,
) -> Result<Replaced, UpdateError> {
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        log::info!("Applying update, attempt #{attempt}");

        match copier.copy(source, destination) {
            Ok(bytes) => {
                log::info!(
                    "Installed {} ({} bytes) on attempt #{attempt}",
                    destination.display(),
                    bytes
                );
                return Ok(Replaced {
                    attempts: attempt + 1,
                    bytes,
                });
            }
            Err(e) => {
                log::warn!("Could not copy file to destination: {e}");
                last_error = Some(e);
            }
        }

        if attempt + 1 < policy.max_attempts {
            sleep(policy.delay);
        }
    }

    Err(UpdateError::UpdateInstallFailed {
        attempts: policy.max_attempts,
        source: last_error
            .unwrap_or_else(|| io::Error::other("no copy attempts were allowed")),
    })
}
