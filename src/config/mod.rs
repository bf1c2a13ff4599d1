//! Configuration loading and management for the donor scheduler.
//!
//! This module loads the clinic configuration from YAML files: listener,
//! storage and logging settings, the proposal and recall rules, and the
//! weekly schedule a fresh store starts with.
//!
//! # Example
//!
//! ```no_run
//! use donor_scheduler::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap().into_config();
//! println!("Recall window: {} days", config.scheduling().expiring_window_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BootstrapAdmin, ClinicConfig, ClinicSettings, SchedulingConfig, ServerConfig, StorageConfig,
    TelemetryConfig,
};
