mod lifetime;
mod setup;

use serde_json::Value;

pub use self::{lifetime::Lifetime, setup::Setup};
use crate::error::ConfigurationError;

pub type ConfigMap = serde_json::Map<String, Value>;

pub mod keys {
    pub const KEY: &str = "key";
    pub const NAME: &str = "name";
    pub const POWER_ENTITY: &str = "power_entity";
    pub const POWER_INVERTED: &str = "power_entity_inverted";
    pub const ELECTRICITY_PRICE_ENTITY: &str = "grid_electricity_price_entity";
    pub const CO2_INTENSITY_ENTITY: &str = "co2_intensity_entity";
    pub const EXPORTS_POWER: &str = "exports_power";
    pub const EXPORT_COMPENSATION: &str = "export_compensation";
    pub const LCOE: &str = "levelized_cost_of_electricity";
    pub const LCOS: &str = "levelized_cost_of_storage";
    pub const CO2_INTENSITY: &str = "co2_intensity";
    pub const COSTS_OVER_LIFETIME: &str = "costs_over_lifetime";
    pub const ENERGY_OVER_LIFETIME: &str = "energy_over_lifetime";
    pub const CO2_FOOTPRINT: &str = "co2_footprint";
    pub const ROUND_TRIP_EFFICIENCY: &str = "bat_round_trip_efficiency";
    pub const CHARGED_FROM: &str = "charged_from";
}

/// Typed accessors over a [`ConfigMap`].
#[derive(Copy, Clone)]
pub struct ConfigReader<'a>(&'a ConfigMap);

impl<'a> ConfigReader<'a> {
    pub const fn new(config: &'a ConfigMap) -> Self {
        Self(config)
    }

    /// Absent and `null` values are both treated as missing.
    fn value(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn optional_str(&self, key: &'static str) -> Result<Option<&'a str>, ConfigurationError> {
        self.value(key)
            .map(|value| {
                value.as_str().ok_or_else(|| ConfigurationError::InvalidValue {
                    key,
                    reason: format!("expected a string, got `{value}`"),
                })
            })
            .transpose()
    }

    pub fn required_str(&self, key: &'static str) -> Result<&'a str, ConfigurationError> {
        self.optional_str(key)?.ok_or(ConfigurationError::MissingKey { key })
    }

    pub fn optional_number(&self, key: &'static str) -> Result<Option<f64>, ConfigurationError> {
        self.value(key)
            .map(|value| {
                value.as_f64().ok_or_else(|| ConfigurationError::InvalidValue {
                    key,
                    reason: format!("expected a number, got `{value}`"),
                })
            })
            .transpose()
    }

    pub fn required_number(&self, key: &'static str) -> Result<f64, ConfigurationError> {
        self.optional_number(key)?.ok_or(ConfigurationError::MissingKey { key })
    }

    /// Missing flags are `false`.
    pub fn flag(&self, key: &'static str) -> Result<bool, ConfigurationError> {
        self.value(key).map_or(Ok(false), |value| {
            value.as_bool().ok_or_else(|| ConfigurationError::InvalidValue {
                key,
                reason: format!("expected a boolean, got `{value}`"),
            })
        })
    }
}
