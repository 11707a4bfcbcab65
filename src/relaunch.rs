use crate::error::LaunchError;
use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

pub const COMPLETING_UPDATE_FLAG: &str = "--completing-update";

/// A process that was started and let go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchHandle {
    pub path: PathBuf,
    pub pid: u32,
}

/// Starts executables as processes independent of the caller.
pub trait ProcessLauncher {
    /// Start `path` with `args` and return without waiting on it.
    fn spawn_detached(&mut self, path: &Path, args: &[String]) -> Result<LaunchHandle, LaunchError>;

    /// Start `path` with `args` and block until it exits, returning its exit
    /// code (1 when the process ended without one).
    fn run_to_completion(&mut self, path: &Path, args: &[String]) -> Result<i32, LaunchError>;
}

/// Command line handed to the freshly installed application.
pub fn relaunch_args(from_version: Option<&str>) -> Vec<String> {
    let mut args = vec![COMPLETING_UPDATE_FLAG.to_string()];
    if let Some(version) = from_version {
        args.push(crate::args::FROM_FLAG.to_string());
        args.push(version.to_string());
    }
    args
}

/// `ProcessLauncher` using the OS process APIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsLauncher;

impl OsLauncher {
    /// The child inherits our working directory. A bare relative name is
    /// anchored to that directory instead of being looked up on `PATH`.
    fn command(path: &Path, args: &[String]) -> Command {
        let program = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
    cmd.creation_flags(CREATE_NEW_CONSOLE);
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(any(windows, unix)))]
fn detach(_cmd: &mut Command) {}

impl ProcessLauncher for OsLauncher {
    fn spawn_detached(&mut self, path: &Path, args: &[String]) -> Result<LaunchHandle, LaunchError> {
        let mut cmd = Self::command(path, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);

        let child = cmd.spawn().map_err(|source| LaunchError {
            path: path.to_path_buf(),
            source,
        })?;

        // Dropping the Child closes our handles; the process keeps running.
        let pid = child.id();
        drop(child);

        Ok(LaunchHandle {
            path: path.to_path_buf(),
            pid,
        })
    }

    fn run_to_completion(&mut self, path: &Path, args: &[String]) -> Result<i32, LaunchError> {
        let status = Self::command(path, args)
            .status()
            .map_err(|source| LaunchError {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io;

    /// Records launches instead of starting processes.
    #[derive(Default)]
    pub(crate) struct RecordingLauncher {
        pub launches: Vec<(PathBuf, Vec<String>)>,
        pub fail: bool,
        pub exit_code: i32,
    }

    impl RecordingLauncher {
        fn record(&mut self, path: &Path, args: &[String]) -> Result<(), LaunchError> {
            self.launches.push((path.to_path_buf(), args.to_vec()));
            if self.fail {
                return Err(LaunchError {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                });
            }
            Ok(())
        }
    }

    impl ProcessLauncher for RecordingLauncher {
        fn spawn_detached(&mut self, path: &Path, args: &[String]) -> Result<LaunchHandle, LaunchError> {
            self.record(path, args)?;
            Ok(LaunchHandle {
                path: path.to_path_buf(),
                pid: 4242,
            })
        }

        fn run_to_completion(&mut self, path: &Path, args: &[String]) -> Result<i32, LaunchError> {
            self.record(path, args)?;
            Ok(self.exit_code)
        }
    }

    #[test]
    fn relaunch_args_without_version() {
        assert_eq!(relaunch_args(None), vec!["--completing-update"]);
    }

    #[test]
    fn relaunch_args_forward_version_verbatim() {
        assert_eq!(
            relaunch_args(Some("v1.2.3")),
            vec!["--completing-update", "--update-from", "v1.2.3"]
        );
    }

    #[test]
    fn spawning_missing_executable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-there");

        let err = OsLauncher
            .spawn_detached(&missing, &relaunch_args(None))
            .unwrap_err();
        assert_eq!(err.path, missing);
    }

    #[cfg(unix)]
    #[test]
    fn run_to_completion_reports_exit_code() {
        let code = OsLauncher
            .run_to_completion(Path::new("/bin/sh"), &["-c".to_string(), "exit 3".to_string()])
            .unwrap();
        assert_eq!(code, 3);
    }

    /// Removes a file created in the working directory when dropped.
    #[cfg(unix)]
    struct RemoveOnDrop(PathBuf);

    #[cfg(unix)]
    impl Drop for RemoveOnDrop {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[cfg(unix)]
    #[test]
    fn bare_relative_name_resolves_against_working_directory() {
        let name = format!("mm-relaunch-target-{}", std::process::id());
        let installed = std::env::current_dir().unwrap().join(&name);
        std::fs::copy("/bin/sh", &installed).unwrap();
        let _cleanup = RemoveOnDrop(installed);

        let code = OsLauncher
            .run_to_completion(Path::new(&name), &["-c".to_string(), "exit 4".to_string()])
            .unwrap();
        assert_eq!(code, 4);

        let handle = OsLauncher
            .spawn_detached(Path::new(&name), &["-c".to_string(), "exit 0".to_string()])
            .unwrap();
        assert!(handle.pid > 0);
    }

    #[cfg(unix)]
    #[test]
    fn spawn_detached_returns_pid() {
        let handle = OsLauncher
            .spawn_detached(Path::new("/bin/sh"), &["-c".to_string(), "exit 0".to_string()])
            .unwrap();
        assert!(handle.pid > 0);
    }
}
