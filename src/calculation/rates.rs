//! Process rate resolution.
//!
//! Rates are resolved per process in a fixed priority order: the client's own
//! negotiated rate, then the master process-type rate, then zero. Two
//! resolvers are provided and they are deliberately different:
//!
//! - [`resolve_process_rate`] resolves one named process (invoice creation).
//! - [`resolve_statement_rate`] resolves a whole challan from its *first*
//!   billing process only (client statements).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{Challan, Client, MAX_PROCESS_RATE};

/// Supplies client-specific and master process rates.
///
/// Implementations must match process names case-insensitively.
pub trait RateSource {
    /// The client's negotiated rate for a process, if any.
    fn client_rate(&self, process: &str) -> Option<Decimal>;
    /// The master process-type rate, if the process type exists.
    fn master_rate(&self, process: &str) -> Option<Decimal>;
}

/// A [`RateSource`] that combines one client with the master configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateBook<'a> {
    client: Option<&'a Client>,
    master: &'a ConfigLoader,
}

impl<'a> RateBook<'a> {
    /// Creates a rate book for a client (or for no client, master rates only).
    pub fn new(client: Option<&'a Client>, master: &'a ConfigLoader) -> Self {
        Self { client, master }
    }
}

impl RateSource for RateBook<'_> {
    fn client_rate(&self, process: &str) -> Option<Decimal> {
        self.client.and_then(|c| c.process_rate(process))
    }

    fn master_rate(&self, process: &str) -> Option<Decimal> {
        self.master.master_rate(process)
    }
}

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    /// The client's negotiated rate.
    Client,
    /// The master process-type rate.
    Master,
    /// No rate was found; zero was used.
    Default,
}

/// A resolved rate for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// The trimmed process name the rate was resolved for.
    pub process: String,
    /// The unit rate.
    pub rate: Decimal,
    /// Where the rate came from.
    pub origin: RateOrigin,
}

impl RateResolution {
    /// True when no rate was configured and zero was used.
    pub fn is_default(&self) -> bool {
        self.origin == RateOrigin::Default
    }

    /// Rejects a resolved rate outside `0..=MAX_PROCESS_RATE`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.rate < Decimal::ZERO || self.rate > MAX_PROCESS_RATE {
            return Err(EngineError::validation(
                "rate",
                format!(
                    "rate {} for '{}' is outside 0 to {}",
                    self.rate, self.process, MAX_PROCESS_RATE
                ),
            ));
        }
        Ok(())
    }
}

/// Resolves the rate of a single process: client → master → 0.
///
/// # Example
///
/// ```
/// use textile_billing::calculation::{RateOrigin, RateSource, resolve_process_rate};
/// use rust_decimal::Decimal;
///
/// struct Fixed;
/// impl RateSource for Fixed {
///     fn client_rate(&self, p: &str) -> Option<Decimal> {
///         p.eq_ignore_ascii_case("dyeing").then(|| Decimal::new(5, 0))
///     }
///     fn master_rate(&self, _p: &str) -> Option<Decimal> {
///         Some(Decimal::new(3, 0))
///     }
/// }
///
/// let dyeing = resolve_process_rate(&Fixed, " DYEING ");
/// assert_eq!(dyeing.rate, Decimal::new(5, 0));
/// assert_eq!(dyeing.origin, RateOrigin::Client);
/// assert_eq!(dyeing.process, "DYEING");
///
/// let printing = resolve_process_rate(&Fixed, "PRINTING");
/// assert_eq!(printing.origin, RateOrigin::Master);
/// ```
pub fn resolve_process_rate<R: RateSource + ?Sized>(rates: &R, process: &str) -> RateResolution {
    let process = process.trim();
    let (rate, origin) = if let Some(rate) = rates.client_rate(process) {
        (rate, RateOrigin::Client)
    } else if let Some(rate) = rates.master_rate(process) {
        (rate, RateOrigin::Master)
    } else {
        (Decimal::ZERO, RateOrigin::Default)
    };

    RateResolution {
        process: process.to_string(),
        rate,
        origin,
    }
}

/// Resolves one approximate rate for a whole challan, for statements.
///
/// Only the first billing process of the challan is considered. A challan
/// with no process resolves to zero with an empty process name.
pub fn resolve_statement_rate<R: RateSource + ?Sized>(
    rates: &R,
    challan: &Challan,
) -> RateResolution {
    match challan.first_process() {
        Some(process) => resolve_process_rate(rates, process),
        None => RateResolution {
            process: String::new(),
            rate: Decimal::ZERO,
            origin: RateOrigin::Default,
        },
    }
}
