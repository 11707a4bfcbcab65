use std::{env, process::exit};

use anyhow::{Context, Result};
use modmanager_updater::{
    UpdaterConfig, launcher::launch_from_dir, logging::init_logging, relaunch::OsLauncher,
};

fn run(config: &UpdaterConfig) -> Result<i32> {
    let self_exe = env::current_exe().context("Failed to resolve launcher path")?;
    let install_dir = self_exe
        .parent()
        .context("Launcher executable has no parent directory")?;

    let code = launch_from_dir(
        &mut OsLauncher,
        install_dir,
        &config.target_exe_name,
        config.launch_mode,
    )?;
    Ok(code)
}

fn main() {
    let config = UpdaterConfig::from_env();

    let _logger = match init_logging(&config.log_dir, "modmanager_launcher") {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("ERROR: could not start logging: {e:#}");
            exit(1);
        }
    };

    for arg in env::args().skip(1) {
        log::info!("Ignoring argument: {arg}");
    }

    match run(&config) {
        Ok(code) => exit(code),
        Err(e) => {
            log::error!("{e:#}");
            exit(1);
        }
    }
}
