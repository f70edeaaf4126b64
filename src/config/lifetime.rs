use crate::{
    config::{ConfigMap, ConfigReader, keys},
    error::ConfigurationError,
    quantity::{
        cost::Cost,
        emission::{GramsPerKilowattHour, Kilograms},
        energy::KilowattHours,
        price::KilowattHourPrice,
    },
};

/// Lifetime totals of a generator, used to derive its levelized figures.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lifetime {
    pub costs: Cost,
    pub energy: KilowattHours,
    pub co2_footprint: Kilograms,
}

impl Lifetime {
    pub const DEFAULT_ROUND_TRIP_EFFICIENCY: f64 = 95.0;

    /// Read the lifetime totals, if both the costs and the energy are configured.
    pub fn from_config(config: &ConfigMap) -> Result<Option<Self>, ConfigurationError> {
        let config = ConfigReader::new(config);
        let (Some(costs), Some(energy)) = (
            config.optional_number(keys::COSTS_OVER_LIFETIME)?,
            config.optional_number(keys::ENERGY_OVER_LIFETIME)?,
        ) else {
            return Ok(None);
        };
        if energy <= 0.0 {
            return Err(ConfigurationError::InvalidValue {
                key: keys::ENERGY_OVER_LIFETIME,
                reason: format!("expected a positive energy, got `{energy}`"),
            });
        }
        Ok(Some(Self {
            costs: Cost(costs),
            energy: KilowattHours(energy),
            co2_footprint: Kilograms(
                config.optional_number(keys::CO2_FOOTPRINT)?.unwrap_or_default(),
            ),
        }))
    }

    /// Levelized cost of electricity of a PV system.
    pub fn lcoe(&self) -> KilowattHourPrice {
        self.costs / self.energy
    }

    pub fn co2_intensity(&self) -> GramsPerKilowattHour {
        self.co2_footprint / self.energy
    }

    /// Levelized cost of storage: own cost plus the cost of the charged energy lost in a cycle.
    ///
    /// The round-trip efficiency is in percent.
    pub fn lcos(
        &self,
        charging_lcoe: KilowattHourPrice,
        round_trip_efficiency: f64,
    ) -> Result<KilowattHourPrice, ConfigurationError> {
        if !(round_trip_efficiency > 0.0 && round_trip_efficiency <= 100.0) {
            return Err(ConfigurationError::InvalidValue {
                key: keys::ROUND_TRIP_EFFICIENCY,
                reason: format!("expected a percentage in (0, 100], got `{round_trip_efficiency}`"),
            });
        }
        Ok(self.lcoe() + charging_lcoe / (round_trip_efficiency / 100.0))
    }
}
