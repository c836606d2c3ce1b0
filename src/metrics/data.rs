//! Data structures for normalized gateway readings.

use serde::{Deserialize, Serialize};

/// One converted gateway reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Gateway firmware versions
    pub firmware: Firmware,
    /// Gas meter readings
    pub gas: Gas,
    /// Electricity meter readings
    pub power: Power,
}

/// Gateway firmware information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firmware {
    /// Version currently running on the gateway
    pub running: i64,
    /// Latest version offered to the gateway
    pub available: i64,
    /// Whether a firmware update is pending
    pub update_available: bool,
}

/// Gas meter readings, in cubic meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gas {
    /// Cumulative consumption (counter)
    pub consumed: f64,
    /// Consumption during the current hour
    pub consumed_hour: f64,
}

/// Electricity meter readings.
///
/// Tariff totals are cumulative energy, everything else is an instantaneous
/// or current-hour value reported verbatim by the meter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Power {
    /// Active tariff indicator
    pub tariff: i64,
    pub consumed_tariff1: f64,
    pub produced_tariff1: f64,
    pub consumed_tariff2: f64,
    pub produced_tariff2: f64,
    /// Instantaneous power drawn over all phases
    pub consumed_total: i64,
    /// Instantaneous power returned over all phases
    pub produced_total: i64,
    pub consumed_l1: i64,
    pub consumed_l2: i64,
    pub consumed_l3: i64,
    pub produced_l1: i64,
    pub produced_l2: i64,
    pub produced_l3: i64,
    pub voltage_l1: i64,
    pub voltage_l2: i64,
    pub voltage_l3: i64,
    pub current_l1: i64,
    pub current_l2: i64,
    pub current_l3: i64,
    /// Consumption during the current hour
    pub consumed_hour: f64,
    /// Net consumption (delivered minus returned)
    pub consumed_net: f64,
}

/// Phase labels used for per-phase readings.
pub const PHASES: [&str; 3] = ["l1", "l2", "l3"];

impl Power {
    /// Per-phase consumed power, ordered as [`PHASES`].
    pub fn consumed_phases(&self) -> [i64; 3] {
        [self.consumed_l1, self.consumed_l2, self.consumed_l3]
    }

    /// Per-phase produced power, ordered as [`PHASES`].
    pub fn produced_phases(&self) -> [i64; 3] {
        [self.produced_l1, self.produced_l2, self.produced_l3]
    }

    /// Per-phase voltage, ordered as [`PHASES`].
    pub fn voltage_phases(&self) -> [i64; 3] {
        [self.voltage_l1, self.voltage_l2, self.voltage_l3]
    }

    /// Per-phase current, ordered as [`PHASES`].
    pub fn current_phases(&self) -> [i64; 3] {
        [self.current_l1, self.current_l2, self.current_l3]
    }
}
