//! Self-update helper for the mod manager.
//!
//! The updater binary runs a fixed pipeline: parse arguments, stop any
//! running instance of the target application, copy the staged update over
//! the installed executable, then relaunch it. The launcher binary is the
//! small shim that starts the application from its install directory.

pub mod args;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod process;
pub mod relaunch;
pub mod replace;
pub mod updater;

pub use args::{UpdateRequest, parse_args};
pub use config::UpdaterConfig;
pub use error::{LaunchError, UpdateError};
pub use updater::{UpdateReport, Updater};
