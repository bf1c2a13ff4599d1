//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the clinic
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::Schedule;

use super::types::{ClinicConfig, ClinicSettings};

/// Loads and validates the clinic configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── clinic.yaml    # Server, storage, telemetry and scheduling settings
/// └── schedule.yaml  # Weekly schedule a fresh store starts with
/// ```
///
/// # Example
///
/// ```no_run
/// use donor_scheduler::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Listening on port {}", loader.config().settings().server.port);
/// # Ok::<(), donor_scheduler::error::SchedulerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ClinicConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML,
    /// or carries values the scheduler cannot work with.
    pub fn load<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let path = path.as_ref();

        let clinic_path = path.join("clinic.yaml");
        let settings = Self::load_yaml::<ClinicSettings>(&clinic_path)?;
        Self::validate(&clinic_path, &settings)?;

        let schedule_path = path.join("schedule.yaml");
        let schedule = Self::load_yaml::<Schedule>(&schedule_path)?;

        Ok(Self {
            config: ClinicConfig::new(settings, schedule),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SchedulerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| SchedulerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SchedulerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(path: &Path, settings: &ClinicSettings) -> SchedulerResult<()> {
        let invalid = |message: &str| SchedulerError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        let offsets = &settings.scheduling.proposal_offsets_days;
        if offsets.is_empty() {
            return Err(invalid("scheduling.proposal_offsets_days must not be empty"));
        }
        if offsets.iter().any(|days| *days < 0) {
            return Err(invalid("scheduling.proposal_offsets_days must not be negative"));
        }
        if settings.scheduling.expiring_window_days < 0 {
            return Err(invalid("scheduling.expiring_window_days must not be negative"));
        }
        if let Some(admin) = &settings.bootstrap_admin {
            if admin.email.trim().is_empty() {
                return Err(invalid("bootstrap_admin.email must not be empty"));
            }
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ClinicConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DaySchedule;
    use tempfile::TempDir;

    fn config_path() -> &'static str {
        "./config"
    }

    const SCHEDULE_YAML: &str = "\
monday: { open: true, capacity: 10 }
tuesday: { open: true, capacity: 9 }
wednesday: { open: false, capacity: 10 }
thursday: { open: false, capacity: 10 }
friday: { open: true, capacity: 10 }
saturday: { open: false, capacity: 10 }
sunday: { open: false, capacity: 10 }
";

    fn write_config(clinic: &str, schedule: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clinic.yaml"), clinic).unwrap();
        fs::write(dir.path().join("schedule.yaml"), schedule).unwrap();
        dir
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        let scheduling = loader.config().scheduling();
        assert_eq!(scheduling.proposal_offsets_days, vec![7, 14, 21]);
        assert_eq!(scheduling.expiring_window_days, 14);
        assert_eq!(loader.config().default_schedule(), &Schedule::default());
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let dir = write_config("{}\n", SCHEDULE_YAML);
        let config = ConfigLoader::load(dir.path()).unwrap().into_config();

        assert_eq!(config.settings().server.host, "127.0.0.1");
        assert_eq!(config.settings().server.port, 8080);
        assert_eq!(config.settings().telemetry.log_level, "info");
        assert!(config.settings().storage.data_file.is_none());
        assert!(config.settings().bootstrap_admin.is_none());
    }

    #[test]
    fn test_custom_schedule_and_admin() {
        let schedule = SCHEDULE_YAML.replace(
            "saturday: { open: false, capacity: 10 }",
            "saturday: { open: true, capacity: 4 }",
        );
        let clinic = "\
server:
  port: 9000
bootstrap_admin:
  email: admin@clinic.example
  first_name: Ada
";
        let dir = write_config(clinic, &schedule);
        let config = ConfigLoader::load(dir.path()).unwrap().into_config();

        assert_eq!(config.settings().server.port, 9000);
        assert_eq!(config.default_schedule().saturday, DaySchedule::open(4));
        let admin = config.settings().bootstrap_admin.as_ref().unwrap().to_new_donor();
        assert!(admin.is_admin);
        assert_eq!(admin.email, "admin@clinic.example");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("./nonexistent/path");
        match result {
            Err(SchedulerError::ConfigNotFound { path }) => {
                assert!(path.contains("clinic.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = write_config("server: [unterminated\n", SCHEDULE_YAML);
        let result = ConfigLoader::load(dir.path());
        assert!(matches!(result, Err(SchedulerError::ConfigParseError { .. })));
    }

    #[test]
    fn test_incomplete_schedule_returns_parse_error() {
        let dir = write_config("{}\n", "monday: { open: true, capacity: 10 }\n");
        let result = ConfigLoader::load(dir.path());
        match result {
            Err(SchedulerError::ConfigParseError { path, .. }) => {
                assert!(path.contains("schedule.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_proposal_offsets_rejected() {
        let dir = write_config("scheduling:\n  proposal_offsets_days: []\n", SCHEDULE_YAML);
        let result = ConfigLoader::load(dir.path());
        match result {
            Err(SchedulerError::ConfigParseError { message, .. }) => {
                assert!(message.contains("proposal_offsets_days"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
