use crate::{
    args::{UpdateRequest, parse_args},
    config::{RetryPolicy, UpdaterConfig},
    error::UpdateError,
    process::{ProcessManager, SystemProcessManager},
    relaunch::{LaunchHandle, OsLauncher, ProcessLauncher, relaunch_args},
    replace::{FileCopier, StagedCopier, replace_with_retry},
};
use std::time::Duration;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Running instances a kill was issued to.
    pub terminated: usize,
    /// Copy attempts used, including the successful one.
    pub copy_attempts: u32,
    pub relaunched: LaunchHandle,
}

/// The update sequence: terminate, replace, relaunch.
///
/// Each collaborator is a seam so the sequence can run against fakes.
pub struct Updater<P, C, L, S> {
    pub target_exe_name: String,
    pub retry: RetryPolicy,
    pub processes: P,
    pub copier: C,
    pub launcher: L,
    pub sleep: S,
}

pub type SystemUpdater = Updater<SystemProcessManager, StagedCopier, OsLauncher, fn(Duration)>;

impl SystemUpdater {
    pub fn from_config(config: &UpdaterConfig) -> Self {
        Updater {
            target_exe_name: config.target_exe_name.clone(),
            retry: config.retry,
            processes: SystemProcessManager::new(),
            copier: StagedCopier,
            launcher: OsLauncher,
            sleep: std::thread::sleep,
        }
    }
}

impl<P, C, L, S> Updater<P, C, L, S>
where
    P: ProcessManager,
    C: FileCopier,
    L: ProcessLauncher,
    S: FnMut(Duration),
{
    /// Validate the raw arguments, then run the update.
    ///
    /// Nothing is terminated or touched unless the arguments are valid.
    pub fn run_with_args<I, T>(&mut self, args: I) -> Result<UpdateReport, UpdateError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let request = parse_args(args)?;
        self.run(&request)
    }

    pub fn run(&mut self, request: &UpdateRequest) -> Result<UpdateReport, UpdateError> {
        // Best-effort by intent: a kill that fails is covered by the copy
        // retries below, so this stage cannot fail the run.
        let terminated = self.processes.terminate_all_named(&self.target_exe_name);
        log::info!(
            "Stopped {} running instance(s) of {}",
            terminated,
            self.target_exe_name
        );
        if self.processes.is_running(&self.target_exe_name) {
            log::warn!(
                "{} is still shutting down; relying on copy retries",
                self.target_exe_name
            );
        }

        let replaced = replace_with_retry(
            &mut self.copier,
            &mut self.sleep,
            self.retry,
            &request.source_path,
            &request.destination_path,
        )?;

        let args = relaunch_args(request.from_version.as_deref());
        log::info!(
            "Booting update: {} {}",
            request.destination_path.display(),
            args.join(" ")
        );
        let relaunched = self
            .launcher
            .spawn_detached(&request.destination_path, &args)?;

        Ok(UpdateReport {
            terminated,
            copy_attempts: replaced.attempts,
            relaunched,
        })
    }
}

/// Process exit status for a finished run: 0 once the update is installed and
/// relaunched, 1 for any failure.
pub fn exit_code(result: &Result<UpdateReport, UpdateError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
