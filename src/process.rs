use std::{ffi::OsStr, path::Path};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

/// Finds and stops running instances of an executable by file name.
pub trait ProcessManager {
    /// Force-stop every process whose executable name matches `name`
    /// (ASCII case-insensitive). Returns how many kills were issued.
    ///
    /// Best-effort: processes that cannot be stopped are skipped, never
    /// reported as an error.
    fn terminate_all_named(&mut self, name: &str) -> usize;

    /// Whether any process with a matching executable name is running.
    fn is_running(&mut self, name: &str) -> bool;
}

/// `ProcessManager` backed by the host process table.
pub struct SystemProcessManager {
    sys: System,
    own_pid: Option<Pid>,
}

impl SystemProcessManager {
    pub fn new() -> Self {
        SystemProcessManager {
            sys: System::new(),
            own_pid: sysinfo::get_current_pid().ok(),
        }
    }

    fn refresh(&mut self) {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
        );
    }

    fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a Pid, &'a Process)> + 'a {
        self.sys
            .processes()
            .iter()
            .filter(move |(pid, _)| Some(**pid) != self.own_pid)
            .filter(move |(_, process)| process_matches(process.name(), process.exe(), name))
    }
}

impl Default for SystemProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessManager for SystemProcessManager {
    fn terminate_all_named(&mut self, name: &str) -> usize {
        self.refresh();

        let mut terminated = 0;
        for (pid, process) in self.matching(name) {
            // Failure here usually means access denied or the process already
            // exited; either way the copy retry loop covers it.
            if process.kill() {
                log::info!("Terminated running instance {} (pid {})", name, pid);
                terminated += 1;
            } else {
                log::debug!("Could not terminate pid {}", pid);
            }
        }
        terminated
    }

    fn is_running(&mut self, name: &str) -> bool {
        self.refresh();
        self.matching(name).next().is_some()
    }
}

/// Compare a process against the target executable name.
///
/// The reported name is checked first; the file name of the executable path
/// covers platforms that truncate process names (Linux caps them at 15 bytes).
fn process_matches(process_name: &OsStr, exe: Option<&Path>, target: &str) -> bool {
    let name_eq = |candidate: &OsStr| candidate.to_string_lossy().eq_ignore_ascii_case(target);

    name_eq(process_name) || exe.and_then(Path::file_name).is_some_and(name_eq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_name_case_insensitively() {
        assert!(process_matches(
            OsStr::new("me3tweaksmodmanager.EXE"),
            None,
            "ME3TweaksModManager.exe"
        ));
        assert!(!process_matches(
            OsStr::new("ME3TweaksModManager.exe.bak"),
            None,
            "ME3TweaksModManager.exe"
        ));
    }

    #[test]
    fn falls_back_to_executable_file_name() {
        let exe = Path::new("/opt/mm/ME3TweaksModManager");
        assert!(process_matches(
            OsStr::new("ME3TweaksModMan"),
            Some(exe),
            "ME3TweaksModManager"
        ));
        assert!(!process_matches(
            OsStr::new("bash"),
            Some(Path::new("/usr/bin/bash")),
            "ME3TweaksModManager"
        ));
    }

    #[test]
    fn nothing_matches_an_unused_name() {
        let mut manager = SystemProcessManager::new();
        let name = "no-such-process-4f1c2a9e";
        assert!(!manager.is_running(name));
        assert_eq!(manager.terminate_all_named(name), 0);
    }

    #[cfg(unix)]
    #[test]
    fn kills_running_instance_with_truncated_name() {
        use std::os::unix::process::ExitStatusExt;

        let dir = tempfile::tempdir().unwrap();
        let name = format!("TargetApplicationSleeper{}", std::process::id());
        let exe = dir.path().join(&name);
        std::fs::copy("/bin/sleep", &exe).unwrap();

        let mut child = std::process::Command::new(&exe).arg("30").spawn().unwrap();

        let mut manager = SystemProcessManager::new();
        let lowered = name.to_lowercase();
        assert!(manager.is_running(&lowered));
        assert_eq!(manager.terminate_all_named(&lowered), 1);

        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(9));
    }
}
