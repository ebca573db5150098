//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading master data
//! from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_PROCESS_RATE, TaxRates};

use super::types::{CompanyMetadata, MasterConfig, ProcessTypesConfig, TaxConfig};

/// Loads and provides access to master configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── company.yaml    # Company name, GSTIN, default HSN/SAC code
/// ├── tax.yaml        # CGST / SGST rates
/// └── processes.yaml  # Master process types and their rates
/// ```
///
/// # Example
///
/// ```no_run
/// use textile_billing::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Billing as: {}", loader.company().name);
/// println!("DYEING: {:?}", loader.master_rate("dyeing"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: MasterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A tax rate is negative
    /// - A process rate is negative or above [`MAX_PROCESS_RATE`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let company = Self::load_yaml::<CompanyMetadata>(&path.join("company.yaml"))?;

        let tax_path = path.join("tax.yaml");
        let tax = Self::load_yaml::<TaxConfig>(&tax_path)?;
        if tax.cgst_rate.is_sign_negative() || tax.sgst_rate.is_sign_negative() {
            return Err(EngineError::ConfigParseError {
                path: tax_path.display().to_string(),
                message: "tax rates must not be negative".to_string(),
            });
        }

        let processes_path = path.join("processes.yaml");
        let processes = Self::load_yaml::<ProcessTypesConfig>(&processes_path)?;
        if let Some(bad) = processes
            .process_types
            .iter()
            .find(|p| p.rate.is_sign_negative() || p.rate > MAX_PROCESS_RATE)
        {
            return Err(EngineError::ConfigParseError {
                path: processes_path.display().to_string(),
                message: format!(
                    "process type '{}' has rate {} outside 0 to {}",
                    bad.name, bad.rate, MAX_PROCESS_RATE
                ),
            });
        }

        debug!(
            path = %path.display(),
            process_types = processes.process_types.len(),
            "Loaded master configuration"
        );

        Ok(Self::from_config(MasterConfig::new(
            company,
            tax.into(),
            processes.process_types,
        )))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: MasterConfig) -> Self {
        Self { config }
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

    /// Returns the underlying master configuration.
    pub fn config(&self) -> &MasterConfig {
        &self.config
    }

    /// Returns the company details.
    pub fn company(&self) -> &CompanyMetadata {
        self.config.company()
    }

    /// Returns the GST rates.
    pub fn tax_rates(&self) -> &TaxRates {
        self.config.tax_rates()
    }

    /// Returns the HSN/SAC code used when none is supplied.
    pub fn default_hsn_code(&self) -> &str {
        &self.config.company().default_hsn_code
    }

    /// Gets the master rate for a process, if the process type exists.
    pub fn master_rate(&self, process: &str) -> Option<Decimal> {
        self.config.process_type(process).map(|p| p.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessType;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.company().name, "Shakti Process House");
        assert_eq!(loader.default_hsn_code(), "998821");
    }

    #[test]
    fn test_tax_rates_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.tax_rates().cgst, dec("0.025"));
        assert_eq!(loader.tax_rates().sgst, dec("0.025"));
    }

    #[test]
    fn test_master_rate_is_case_insensitive() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.master_rate("DYEING"), Some(dec("3")));
        assert_eq!(loader.master_rate(" dyeing "), Some(dec("3")));
    }

    #[test]
    fn test_master_rate_unknown_process() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.master_rate("EMBROIDERY"), None);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("company.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_process_names_keep_first() {
        let config = MasterConfig::new(
            CompanyMetadata {
                name: "Test Mill".to_string(),
                gstin: None,
                default_hsn_code: "9988".to_string(),
            },
            TaxRates::default(),
            vec![
                ProcessType {
                    name: "Dyeing".to_string(),
                    rate: dec("3"),
                    description: None,
                },
                ProcessType {
                    name: "DYEING".to_string(),
                    rate: dec("7"),
                    description: None,
                },
            ],
        );
        let loader = ConfigLoader::from_config(config);
        assert_eq!(loader.config().process_type_count(), 1);
        assert_eq!(loader.master_rate("dyeing"), Some(dec("3")));
    }

    #[test]
    fn test_master_lookup_folds_non_ascii_case() {
        let config = MasterConfig::new(
            CompanyMetadata {
                name: "Test Mill".to_string(),
                gstin: None,
                default_hsn_code: "9988".to_string(),
            },
            TaxRates::default(),
            vec![ProcessType {
                name: "RÉSINE".to_string(),
                rate: dec("6"),
                description: None,
            }],
        );
        let loader = ConfigLoader::from_config(config);
        assert_eq!(loader.master_rate(" résine "), Some(dec("6")));
    }

    #[test]
    fn test_load_rejects_rate_above_maximum() {
        let dir = std::env::temp_dir().join(format!("billing-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::copy(
            Path::new(config_path()).join("company.yaml"),
            dir.join("company.yaml"),
        )
        .unwrap();
        fs::copy(Path::new(config_path()).join("tax.yaml"), dir.join("tax.yaml")).unwrap();
        fs::write(
            dir.join("processes.yaml"),
            "process_types:\n  - name: DYEING\n    rate: \"1000000001\"\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("processes.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
