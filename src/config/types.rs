//! Configuration types for the billing engine.
//!
//! This module contains the strongly-typed master-data structures that are
//! deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{TaxRates, process_key};

/// Details of the mill issuing invoices.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyMetadata {
    /// The registered business name.
    pub name: String,
    /// The company's GST identification number.
    #[serde(default)]
    pub gstin: Option<String>,
    /// HSN/SAC code placed on invoice lines when the caller gives none.
    pub default_hsn_code: String,
}

/// Tax configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Central GST rate as a fraction.
    pub cgst_rate: Decimal,
    /// State GST rate as a fraction.
    pub sgst_rate: Decimal,
}

impl From<TaxConfig> for TaxRates {
    fn from(config: TaxConfig) -> Self {
        TaxRates {
            cgst: config.cgst_rate,
            sgst: config.sgst_rate,
        }
    }
}

/// A master process type and its standard rate.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessType {
    /// The process name (e.g. "DYEING").
    pub name: String,
    /// Standard rate per meter for clients without their own rate.
    pub rate: Decimal,
    /// A description of the process.
    #[serde(default)]
    pub description: Option<String>,
}

/// Process types configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessTypesConfig {
    /// All master process types.
    pub process_types: Vec<ProcessType>,
}

/// The complete master configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct MasterConfig {
    /// Company details.
    company: CompanyMetadata,
    /// GST rates.
    tax_rates: TaxRates,
    /// Process types keyed by lower-cased, trimmed name.
    process_types: HashMap<String, ProcessType>,
}

impl MasterConfig {
    /// Creates a new MasterConfig from its component parts.
    ///
    /// When two process types share a name (ignoring case), the first one wins.
    pub fn new(
        company: CompanyMetadata,
        tax_rates: TaxRates,
        process_types: Vec<ProcessType>,
    ) -> Self {
        let mut by_name = HashMap::new();
        for process_type in process_types {
            by_name
                .entry(process_key(&process_type.name))
                .or_insert(process_type);
        }
        Self {
            company,
            tax_rates,
            process_types: by_name,
        }
    }

    /// Returns the company details.
    pub fn company(&self) -> &CompanyMetadata {
        &self.company
    }

    /// Returns the GST rates.
    pub fn tax_rates(&self) -> &TaxRates {
        &self.tax_rates
    }

    /// Looks up a process type by name, ignoring case and surrounding spaces.
    pub fn process_type(&self, name: &str) -> Option<&ProcessType> {
        self.process_types.get(&process_key(name))
    }

    /// Returns the number of process types.
    pub fn process_type_count(&self) -> usize {
        self.process_types.len()
    }
}
