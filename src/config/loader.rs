//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading scheme
//! parameters from YAML files.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

use super::types::{
    ClassificationThresholds, EligibilityThresholds, OptOutParameters, PhaseRates, SchemeConfig,
    SchemeMetadata, StagingCalendar,
};

/// Non-metadata scheme parameters, as laid out in `parameters.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct ParametersFile {
    thresholds: EligibilityThresholds,
    classification: ClassificationThresholds,
    opt_out: OptOutParameters,
    staging: StagingCalendar,
}

/// Contribution phases, as laid out in `phases.yaml`.
#[derive(Debug, Clone, Deserialize)]
struct PhasesFile {
    phases: Vec<PhaseRates>,
}

/// Loads and provides access to the scheme configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// validates that the contribution phases form a complete escalation
/// schedule.
///
/// # Directory Structure
///
/// ```text
/// config/ae_scheme/
/// ├── scheme.yaml      # Scheme metadata
/// ├── parameters.yaml  # Thresholds, opt-out windows, staging calendar
/// └── phases.yaml      # The four contribution phases
/// ```
///
/// # Example
///
/// ```no_run
/// use pension_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ae_scheme").unwrap();
/// println!("Loaded scheme: {}", loader.scheme().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SchemeConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/ae_scheme")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The phases do not form a complete 1-to-4 schedule
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<SchemeMetadata>(&path.join("scheme.yaml"))?;
        let parameters = Self::load_yaml::<ParametersFile>(&path.join("parameters.yaml"))?;
        let phases_path = path.join("phases.yaml");
        let phases = Self::load_yaml::<PhasesFile>(&phases_path)?.phases;

        Self::validate_phases(&phases, &phases_path.display().to_string())?;

        Ok(Self {
            config: SchemeConfig {
                metadata,
                thresholds: parameters.thresholds,
                classification: parameters.classification,
                phases,
                opt_out: parameters.opt_out,
                staging: parameters.staging,
            },
        })
    }

    /// Creates a loader carrying the built-in statutory parameters.
    pub fn statutory() -> Self {
        Self {
            config: SchemeConfig::statutory(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Checks that the phases are exactly 1 through 4 in order, with
    /// contiguous year ranges and an open-ended final phase.
    fn validate_phases(phases: &[PhaseRates], path: &str) -> EngineResult<()> {
        if phases.len() != 4 {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("expected 4 contribution phases, found {}", phases.len()),
            });
        }

        let mut expected_from_year = 1;
        for (index, phase) in phases.iter().enumerate() {
            let expected_phase = index as u8 + 1;
            if phase.phase != expected_phase {
                return Err(EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!(
                        "phase {} found where phase {} was expected",
                        phase.phase, expected_phase
                    ),
                });
            }
            if phase.from_year != expected_from_year {
                return Err(EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!(
                        "phase {} starts at year {} but year {} was expected",
                        phase.phase, phase.from_year, expected_from_year
                    ),
                });
            }
            match phase.to_year {
                Some(to_year) if index < 3 => {
                    if to_year < phase.from_year {
                        return Err(EngineError::ConfigParseError {
                            path: path.to_string(),
                            message: format!("phase {} ends before it starts", phase.phase),
                        });
                    }
                    expected_from_year = to_year + 1;
                }
                None if index == 3 => {}
                _ => {
                    return Err(EngineError::ConfigParseError {
                        path: path.to_string(),
                        message: format!(
                            "phase {} must be {} but is not",
                            phase.phase,
                            if index == 3 { "open-ended" } else { "bounded" }
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the underlying scheme configuration.
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Returns the scheme metadata.
    pub fn scheme(&self) -> &SchemeMetadata {
        &self.config.metadata
    }
}
