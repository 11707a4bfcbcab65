use std::process::exit;

use modmanager_updater::{
    UpdaterConfig,
    logging::init_logging,
    updater::{SystemUpdater, exit_code},
};

fn main() {
    let config = UpdaterConfig::from_env();

    let _logger = match init_logging(&config.log_dir, "modmanager_updater") {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("ERROR: could not start logging: {e:#}");
            exit(1);
        }
    };
    log::info!("Mod manager updater started.");

    let mut updater = SystemUpdater::from_config(&config);
    let result = updater.run_with_args(std::env::args().skip(1));
    match &result {
        Ok(report) => log::info!(
            "Update complete after {} attempt(s); relaunched pid {}.",
            report.copy_attempts,
            report.relaunched.pid
        ),
        Err(e) => log::error!("ERROR: {e}"),
    }
    exit(exit_code(&result));
}
