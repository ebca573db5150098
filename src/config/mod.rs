//! Configuration loading and management for the billing engine.
//!
//! This module loads the master data the calculators need from YAML files:
//! company details, GST rates and the master process-type rate table.
//!
//! # Example
//!
//! ```no_run
//! use textile_billing::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded company: {}", config.company().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CompanyMetadata, MasterConfig, ProcessType, ProcessTypesConfig, TaxConfig};
