use std::{env, path::PathBuf, time::Duration};

// ---- Target Executable ----

#[cfg(target_os = "windows")]
pub const TARGET_EXE_NAME: &str = "ME3TweaksModManager.exe";

#[cfg(not(target_os = "windows"))]
pub const TARGET_EXE_NAME: &str = "ME3TweaksModManager";

// ---- Retry Policy ----

pub const MAX_COPY_ATTEMPTS: u32 = 10;
pub const COPY_RETRY_DELAY: Duration = Duration::from_secs(1);

// ---- Environment Overrides ----

pub const TARGET_EXE_ENV: &str = "MODMANAGER_TARGET_EXE";
pub const LOG_DIR_ENV: &str = "MODMANAGER_LOG_DIR";
pub const LAUNCHER_WAIT_ENV: &str = "MODMANAGER_LAUNCHER_WAIT";

/// Bounded retry for the file replace stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_COPY_ATTEMPTS,
            delay: COPY_RETRY_DELAY,
        }
    }
}

/// How the launcher hands control to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Spawn and exit 0 without waiting.
    Detached,
    /// Block until the application exits and forward its exit code.
    Wait,
}

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub target_exe_name: String,
    pub retry: RetryPolicy,
    pub log_dir: PathBuf,
    pub launch_mode: LaunchMode,
}

impl UpdaterConfig {
    /// Defaults with any `MODMANAGER_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup(TARGET_EXE_ENV).filter(|v| !v.trim().is_empty()) {
            config.target_exe_name = name.trim().to_string();
        }
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(wait) = lookup(LAUNCHER_WAIT_ENV) {
            let wait = wait.trim();
            if wait == "1" || wait.eq_ignore_ascii_case("true") {
                config.launch_mode = LaunchMode::Wait;
            }
        }

        config
    }
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            target_exe_name: TARGET_EXE_NAME.to_string(),
            retry: RetryPolicy::default(),
            log_dir: env::temp_dir().join("modmanager_updater").join("logs"),
            launch_mode: LaunchMode::Detached,
        }
    }
}
