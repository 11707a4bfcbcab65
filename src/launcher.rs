use crate::{
    config::LaunchMode,
    error::LaunchError,
    relaunch::ProcessLauncher,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("{} not found next to the launcher", path.display())]
    TargetMissing { path: PathBuf },

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Start `target_name` from `install_dir`.
///
/// Returns the exit code the launcher should finish with: 0 once a detached
/// start succeeded, or the application's own code in `Wait` mode.
pub fn launch_from_dir(
    launcher: &mut dyn ProcessLauncher,
    install_dir: &Path,
    target_name: &str,
    mode: LaunchMode,
) -> Result<i32, LauncherError> {
    let target = install_dir.join(target_name);
    if !target.exists() {
        return Err(LauncherError::TargetMissing { path: target });
    }

    log::info!("Starting {}", target.display());
    match mode {
        LaunchMode::Detached => {
            let handle = launcher.spawn_detached(&target, &[])?;
            log::info!("Started pid {}", handle.pid);
            Ok(0)
        }
        LaunchMode::Wait => {
            let code = launcher.run_to_completion(&target, &[])?;
            log::info!("{} exited with code {}", target_name, code);
            Ok(code)
        }
    }
}
