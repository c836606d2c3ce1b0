//! Raw payload returned by the gateway's read endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single gateway-reported value.
///
/// Depending on the gateway firmware the same reading arrives either as a
/// JSON string (`"230"`) or as a native JSON number or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// The decoded gateway document.
///
/// Fields the gateway omits, or reports as `null`, are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayResponse {
    pub firmware_running: Option<FieldValue>,
    pub firmware_available: Option<FieldValue>,
    pub firmware_update_available: Option<FieldValue>,
    #[serde(rename = "ElectricityTariff")]
    pub electricity_tariff: Option<FieldValue>,
    #[serde(rename = "EnergyDeliveredTariff1")]
    pub energy_delivered_tariff1: Option<FieldValue>,
    #[serde(rename = "EnergyReturnedTariff1")]
    pub energy_returned_tariff1: Option<FieldValue>,
    #[serde(rename = "EnergyDeliveredTariff2")]
    pub energy_delivered_tariff2: Option<FieldValue>,
    #[serde(rename = "EnergyReturnedTariff2")]
    pub energy_returned_tariff2: Option<FieldValue>,
    #[serde(rename = "PowerDelivered_total")]
    pub power_delivered_total: Option<FieldValue>,
    #[serde(rename = "PowerReturned_total")]
    pub power_returned_total: Option<FieldValue>,
    #[serde(rename = "PowerDelivered_l1")]
    pub power_delivered_l1: Option<FieldValue>,
    #[serde(rename = "PowerDelivered_l2")]
    pub power_delivered_l2: Option<FieldValue>,
    #[serde(rename = "PowerDelivered_l3")]
    pub power_delivered_l3: Option<FieldValue>,
    #[serde(rename = "PowerReturned_l1")]
    pub power_returned_l1: Option<FieldValue>,
    #[serde(rename = "PowerReturned_l2")]
    pub power_returned_l2: Option<FieldValue>,
    #[serde(rename = "PowerReturned_l3")]
    pub power_returned_l3: Option<FieldValue>,
    #[serde(rename = "Voltage_l1")]
    pub voltage_l1: Option<FieldValue>,
    #[serde(rename = "Voltage_l2")]
    pub voltage_l2: Option<FieldValue>,
    #[serde(rename = "Voltage_l3")]
    pub voltage_l3: Option<FieldValue>,
    #[serde(rename = "Current_l1")]
    pub current_l1: Option<FieldValue>,
    #[serde(rename = "Current_l2")]
    pub current_l2: Option<FieldValue>,
    #[serde(rename = "Current_l3")]
    pub current_l3: Option<FieldValue>,
    #[serde(rename = "PowerDeliveredHour")]
    pub power_delivered_hour: Option<FieldValue>,
    #[serde(rename = "PowerDeliveredNetto")]
    pub power_delivered_netto: Option<FieldValue>,
    #[serde(rename = "GasDelivered")]
    pub gas_delivered: Option<FieldValue>,
    #[serde(rename = "GasDeliveredHour")]
    pub gas_delivered_hour: Option<FieldValue>,
}

impl GatewayResponse {
    /// Decode a gateway body.
    pub fn from_slice(body: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(body).map_err(|e| crate::ExporterError::decode_error(e.to_string()))
    }
}
