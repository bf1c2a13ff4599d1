//! Configuration types for the clinic.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files in the configuration directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::{NewDonor, Schedule};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the snapshot lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot file. Without one the store is kept in memory only.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Appointment scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Days after today used for proposal dates the caller leaves out.
    #[serde(default = "default_proposal_offsets")]
    pub proposal_offsets_days: Vec<i64>,
    /// Recall window for the expiring-soon queue.
    #[serde(default = "default_expiring_window")]
    pub expiring_window_days: i64,
}

fn default_proposal_offsets() -> Vec<i64> {
    vec![7, 14, 21]
}

fn default_expiring_window() -> i64 {
    crate::calculation::EXPIRING_WINDOW_DAYS
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            proposal_offsets_days: default_proposal_offsets(),
            expiring_window_days: default_expiring_window(),
        }
    }
}

/// The first administrator, created when the store holds no users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    /// Login email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

impl BootstrapAdmin {
    /// The donor record to insert.
    pub fn to_new_donor(&self) -> NewDonor {
        NewDonor {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_admin: true,
            is_active: true,
            ..NewDonor::default()
        }
    }
}

/// Contents of `clinic.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicSettings {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Snapshot storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Scheduling rules.
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    /// Optional first administrator.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// The complete clinic configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicConfig {
    settings: ClinicSettings,
    default_schedule: Schedule,
}

impl ClinicConfig {
    /// Creates a configuration from its parts.
    pub fn new(settings: ClinicSettings, default_schedule: Schedule) -> Self {
        Self {
            settings,
            default_schedule,
        }
    }

    /// Returns the `clinic.yaml` settings.
    pub fn settings(&self) -> &ClinicSettings {
        &self.settings
    }

    /// Returns a mutable reference to the settings (CLI overrides).
    pub fn settings_mut(&mut self) -> &mut ClinicSettings {
        &mut self.settings
    }

    /// Returns the weekly schedule a fresh store starts with.
    pub fn default_schedule(&self) -> &Schedule {
        &self.default_schedule
    }

    /// Returns the scheduling rules.
    pub fn scheduling(&self) -> &SchedulingConfig {
        &self.settings.scheduling
    }
}
