//! Conversion of raw gateway fields into typed [`Stats`].

use crate::error::{ExporterError, Result};
use crate::gateway::{FieldValue, GatewayResponse};
use crate::metrics::data::{Firmware, Gas, Power, Stats};

const MISSING: &str = "<missing>";

/// Converts a [`GatewayResponse`] into [`Stats`].
///
/// Every field is parsed on its own; the first field that cannot be coerced
/// aborts the conversion, so a `Stats` value is either complete or absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsMapper;

impl StatsMapper {
    /// Create a new mapper.
    pub fn new() -> Self {
        Self
    }

    /// Convert one gateway reading.
    pub fn convert(&self, resp: &GatewayResponse) -> Result<Stats> {
        let firmware = Firmware {
            running: parse_int("firmware_running", &resp.firmware_running)?,
            available: parse_int("firmware_available", &resp.firmware_available)?,
            update_available: parse_bool(
                "firmware_update_available",
                &resp.firmware_update_available,
            )?,
        };

        let gas = Gas {
            consumed: parse_float("GasDelivered", &resp.gas_delivered)?,
            consumed_hour: parse_float("GasDeliveredHour", &resp.gas_delivered_hour)?,
        };

        let power = Power {
            tariff: parse_int("ElectricityTariff", &resp.electricity_tariff)?,
            consumed_tariff1: parse_float("EnergyDeliveredTariff1", &resp.energy_delivered_tariff1)?,
            produced_tariff1: parse_float("EnergyReturnedTariff1", &resp.energy_returned_tariff1)?,
            consumed_tariff2: parse_float("EnergyDeliveredTariff2", &resp.energy_delivered_tariff2)?,
            produced_tariff2: parse_float("EnergyReturnedTariff2", &resp.energy_returned_tariff2)?,
            consumed_total: parse_int("PowerDelivered_total", &resp.power_delivered_total)?,
            produced_total: parse_int("PowerReturned_total", &resp.power_returned_total)?,
            consumed_l1: parse_int("PowerDelivered_l1", &resp.power_delivered_l1)?,
            consumed_l2: parse_int("PowerDelivered_l2", &resp.power_delivered_l2)?,
            consumed_l3: parse_int("PowerDelivered_l3", &resp.power_delivered_l3)?,
            produced_l1: parse_int("PowerReturned_l1", &resp.power_returned_l1)?,
            produced_l2: parse_int("PowerReturned_l2", &resp.power_returned_l2)?,
            produced_l3: parse_int("PowerReturned_l3", &resp.power_returned_l3)?,
            voltage_l1: parse_int("Voltage_l1", &resp.voltage_l1)?,
            voltage_l2: parse_int("Voltage_l2", &resp.voltage_l2)?,
            voltage_l3: parse_int("Voltage_l3", &resp.voltage_l3)?,
            current_l1: parse_int("Current_l1", &resp.current_l1)?,
            current_l2: parse_int("Current_l2", &resp.current_l2)?,
            current_l3: parse_int("Current_l3", &resp.current_l3)?,
            consumed_hour: parse_float("PowerDeliveredHour", &resp.power_delivered_hour)?,
            consumed_net: parse_float("PowerDeliveredNetto", &resp.power_delivered_netto)?,
        };

        Ok(Stats {
            firmware,
            gas,
            power,
        })
    }
}

/// Parse an integer field: optional sign followed by digits.
fn parse_int(field: &'static str, value: &Option<FieldValue>) -> Result<i64> {
    const EXPECTED: &str = "integer";
    match value {
        Some(FieldValue::Text(s)) => s
            .parse::<i64>()
            .map_err(|_| ExporterError::field_error(field, s.as_str(), EXPECTED)),
        Some(FieldValue::Number(n)) => n
            .as_i64()
            .ok_or_else(|| ExporterError::field_error(field, n.to_string(), EXPECTED)),
        Some(other) => Err(ExporterError::field_error(field, other.to_string(), EXPECTED)),
        None => Err(ExporterError::field_error(field, MISSING, EXPECTED)),
    }
}

/// Parse a decimal floating point field.
fn parse_float(field: &'static str, value: &Option<FieldValue>) -> Result<f64> {
    const EXPECTED: &str = "float";
    match value {
        Some(FieldValue::Text(s)) => s
            .parse::<f64>()
            .map_err(|_| ExporterError::field_error(field, s.as_str(), EXPECTED)),
        Some(FieldValue::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ExporterError::field_error(field, n.to_string(), EXPECTED)),
        Some(other) => Err(ExporterError::field_error(field, other.to_string(), EXPECTED)),
        None => Err(ExporterError::field_error(field, MISSING, EXPECTED)),
    }
}

/// Parse a boolean field: `true`/`false` in any case, `t`/`f` or `1`/`0`.
fn parse_bool(field: &'static str, value: &Option<FieldValue>) -> Result<bool> {
    const EXPECTED: &str = "boolean";
    match value {
        Some(FieldValue::Bool(b)) => Ok(*b),
        Some(FieldValue::Text(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(ExporterError::field_error(field, s.as_str(), EXPECTED)),
        },
        Some(FieldValue::Number(n)) => match n.as_u64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(ExporterError::field_error(field, n.to_string(), EXPECTED)),
        },
        None => Err(ExporterError::field_error(field, MISSING, EXPECTED)),
    }
}
