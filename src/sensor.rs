//! Catalogue of the values a host publishes as sensors.

use std::fmt::{Display, Formatter};

use enumset::{EnumSet, EnumSetType, enum_set};
use itertools::Itertools;

use crate::{
    adapter::GeneratorAdapter,
    insight::PowerInsight,
    quantity::{
        cost::HourlyCost,
        emission::GramsPerKilowattHour,
        power::Watts,
        price::KilowattHourPrice,
    },
};

/// Kind of source entities a sensor depends on.
#[derive(Debug, EnumSetType)]
pub enum SourceRole {
    Power,
    Price,
    Co2,
}

impl Display for SourceRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Power => write!(f, "power"),
            Self::Price => write!(f, "price"),
            Self::Co2 => write!(f, "CO2"),
        }
    }
}

const POWER: EnumSet<SourceRole> = enum_set!(SourceRole::Power);
const POWER_PRICE: EnumSet<SourceRole> = enum_set!(SourceRole::Power | SourceRole::Price);
const POWER_CO2: EnumSet<SourceRole> = enum_set!(SourceRole::Power | SourceRole::Co2);

const PERCENT: &str = "%";

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Description {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,

    /// Suggested number of decimal places.
    pub precision: usize,

    pub sources: EnumSet<SourceRole>,
}

impl Description {
    const fn power(key: &'static str, name: &'static str) -> Self {
        Self { key, name, unit: Watts::SUFFIX, precision: 0, sources: POWER }
    }

    const fn share(key: &'static str, name: &'static str) -> Self {
        Self { key, name, unit: PERCENT, precision: 0, sources: POWER }
    }

    const fn cost_rate(key: &'static str, name: &'static str) -> Self {
        Self { key, name, unit: HourlyCost::SUFFIX, precision: 2, sources: POWER_PRICE }
    }

    const fn price(key: &'static str, name: &'static str) -> Self {
        Self { key, name, unit: KilowattHourPrice::SUFFIX, precision: 2, sources: POWER_PRICE }
    }

    const fn co2_intensity(key: &'static str, name: &'static str) -> Self {
        Self { key, name, unit: GramsPerKilowattHour::SUFFIX, precision: 0, sources: POWER_CO2 }
    }
}

/// Installation-wide sensor.
#[derive(Debug, clap::ValueEnum, EnumSetType)]
pub enum Sensor {
    AvailablePower,
    ExportShare,
    ExportCompensationRate,
    SelfConsumptionPower,
    SelfConsumptionShare,
    SelfConsumptionCostSavingRate,
    UtilizationPower,
    UtilizationShare,
    ElectricityPrice,
    ElectricityPriceLevelized,
    CostRate,
    CostRateLevelized,
    OperatingCostRate,
    OperatingCostRateLevelized,
    CostSavingsRate,
    CostSavingsRateLevelized,
    Co2Intensity,
    Co2IntensityLevelized,
}

impl Sensor {
    pub const fn description(self) -> Description {
        match self {
            Self::AvailablePower => Description::power("available_power", "Available power"),
            Self::ExportShare => Description::share("export_share", "Export share"),
            Self::ExportCompensationRate => {
                Description::cost_rate("export_compensation_rate", "Export compensation rate")
            }
            Self::SelfConsumptionPower => {
                Description::power("self_consumption_power", "Self consumption power")
            }
            Self::SelfConsumptionShare => {
                Description::share("self_consumption_share", "Self consumption share")
            }
            Self::SelfConsumptionCostSavingRate => Description::cost_rate(
                "self_consumption_cost_saving_rate",
                "Self consumption cost saving rate",
            ),
            Self::UtilizationPower => Description::power("utilization_power", "Utilization power"),
            Self::UtilizationShare => Description::share("utilization_share", "Utilization share"),
            Self::ElectricityPrice => Description::price("electricity_price", "Electricity price"),
            Self::ElectricityPriceLevelized => Description::price(
                "electricity_price_levelized",
                "Electricity price levelized",
            ),
            Self::CostRate => Description::cost_rate("cost_rate", "Cost rate"),
            Self::CostRateLevelized => {
                Description::cost_rate("cost_rate_levelized", "Cost rate levelized")
            }
            Self::OperatingCostRate => {
                Description::cost_rate("operating_cost_rate", "Operating cost rate")
            }
            Self::OperatingCostRateLevelized => Description::cost_rate(
                "operating_cost_rate_levelized",
                "Operating cost rate levelized",
            ),
            Self::CostSavingsRate => {
                Description::cost_rate("cost_savings_rate", "Cost savings rate")
            }
            Self::CostSavingsRateLevelized => Description::cost_rate(
                "cost_savings_rate_levelized",
                "Cost savings rate levelized",
            ),
            Self::Co2Intensity => Description::co2_intensity("co2_intensity", "CO2 intensity"),
            Self::Co2IntensityLevelized => {
                Description::co2_intensity("co2_intensity_levelized", "CO2 intensity levelized")
            }
        }
    }
}

/// Per-producer sensor.
#[derive(Debug, EnumSetType)]
pub enum AdapterSensor {
    ExportPower,
    ExportRate,
    ExportShare,
    ExportCompensationRate,
    SelfConsumptionPower,
    SelfConsumptionRate,
    SelfConsumptionShare,
    SelfConsumptionCostSavingRate,
    OperatingCostRate,
    OperatingCostRateLevelized,
    CostSavingsRate,
    CostSavingsRateLevelized,
}

impl AdapterSensor {
    pub const fn description(self) -> Description {
        match self {
            Self::ExportPower => Description::power("export_power", "Export power"),
            Self::ExportRate => Description::share("export_rate", "Export rate"),
            Self::ExportShare => Description::share("export_share", "Export share"),
            Self::ExportCompensationRate => {
                Description::cost_rate("export_compensation_rate", "Export compensation rate")
            }
            Self::SelfConsumptionPower => {
                Description::power("self_consumption_power", "Self consumption power")
            }
            Self::SelfConsumptionRate => {
                Description::share("self_consumption_rate", "Self consumption rate")
            }
            Self::SelfConsumptionShare => {
                Description::share("self_consumption_share", "Self consumption share")
            }
            Self::SelfConsumptionCostSavingRate => Description::cost_rate(
                "self_consumption_cost_saving_rate",
                "Self consumption cost saving rate",
            ),
            Self::OperatingCostRate => {
                Description::cost_rate("operating_cost_rate", "Operating cost rate")
            }
            Self::OperatingCostRateLevelized => Description::cost_rate(
                "operating_cost_rate_levelized",
                "Operating cost rate levelized",
            ),
            Self::CostSavingsRate => {
                Description::cost_rate("cost_savings_rate", "Cost savings rate")
            }
            Self::CostSavingsRateLevelized => Description::cost_rate(
                "cost_savings_rate_levelized",
                "Cost savings rate levelized",
            ),
        }
    }

    /// Export sensors exist only for the producers that export power.
    #[must_use]
    pub const fn exists_for(self, adapter: &GeneratorAdapter) -> bool {
        match self {
            Self::ExportPower
            | Self::ExportRate
            | Self::ExportShare
            | Self::ExportCompensationRate => adapter.exports_power(),
            _ => true,
        }
    }
}

/// Ratios are published in percent.
fn percent(ratio: Option<f64>) -> Option<f64> {
    ratio.map(|ratio| ratio * 100.0)
}

impl PowerInsight {
    #[must_use]
    pub fn sensor_value(&self, sensor: Sensor) -> Option<f64> {
        match sensor {
            Sensor::AvailablePower => self.total_power().map(f64::from),
            Sensor::ExportShare => percent(self.export_share()),
            Sensor::ExportCompensationRate => self.total_export_compensation_rate().map(f64::from),
            Sensor::SelfConsumptionPower => self.self_consumption_power().map(f64::from),
            Sensor::SelfConsumptionShare => percent(self.self_consumption_share()),
            Sensor::SelfConsumptionCostSavingRate => {
                self.total_self_consumption_saving_rate().map(f64::from)
            }
            Sensor::UtilizationPower => self.utilization_power().map(f64::from),
            Sensor::UtilizationShare => percent(self.utilization_share()),
            Sensor::ElectricityPrice => self.coe().map(f64::from),
            Sensor::ElectricityPriceLevelized => self.lcoe().map(f64::from),
            Sensor::CostRate => self.coe_rate().map(f64::from),
            Sensor::CostRateLevelized => self.lcoe_rate().map(f64::from),
            Sensor::OperatingCostRate => self.total_coo_rate().map(f64::from),
            Sensor::OperatingCostRateLevelized => self.total_lcoo_rate().map(f64::from),
            Sensor::CostSavingsRate => self.total_saving_rate().map(f64::from),
            Sensor::CostSavingsRateLevelized => self.total_levelized_saving_rate().map(f64::from),
            Sensor::Co2Intensity => self.co2_intensity().map(f64::from),
            Sensor::Co2IntensityLevelized => self.levelized_co2_intensity().map(f64::from),
        }
    }

    /// Value of the per-producer sensor.
    ///
    /// `None` if the value is unknown, the producer is not registered, or the sensor does not
    /// exist for the producer.
    #[must_use]
    pub fn adapter_sensor_value(&self, sensor: AdapterSensor, key: &str) -> Option<f64> {
        if !sensor.exists_for(self.producers().get(key)?) {
            return None;
        }
        match sensor {
            AdapterSensor::ExportPower => self.adapters_export_power().get(key).map(f64::from),
            AdapterSensor::ExportRate => percent(self.adapters_export_rates().get(key)),
            AdapterSensor::ExportShare => percent(self.adapters_export_shares().get(key)),
            AdapterSensor::ExportCompensationRate => {
                self.adapters_export_compensation_rates().get(key).map(f64::from)
            }
            AdapterSensor::SelfConsumptionPower => {
                self.adapters_self_consumption_power().get(key).map(f64::from)
            }
            AdapterSensor::SelfConsumptionRate => {
                percent(self.adapters_self_consumption_rates().get(key))
            }
            AdapterSensor::SelfConsumptionShare => {
                percent(self.adapters_self_consumption_shares().get(key))
            }
            AdapterSensor::SelfConsumptionCostSavingRate => {
                self.adapters_self_consumption_saving_rates().get(key).map(f64::from)
            }
            AdapterSensor::OperatingCostRate => self.adapters_coo_rates().get(key).map(f64::from),
            AdapterSensor::OperatingCostRateLevelized => {
                self.adapters_lcoo_rates().get(key).map(f64::from)
            }
            AdapterSensor::CostSavingsRate => self.adapters_saving_rates().get(key).map(f64::from),
            AdapterSensor::CostSavingsRateLevelized => {
                self.adapters_levelized_saving_rates().get(key).map(f64::from)
            }
        }
    }

    /// Source entities a sensor with the roles subscribes to.
    #[must_use]
    pub fn source_entities_of(&self, sources: EnumSet<SourceRole>) -> Vec<&str> {
        sources
            .iter()
            .flat_map(|role| match role {
                SourceRole::Power => self.source_entities_power(),
                SourceRole::Price => self.source_entities_price(),
                SourceRole::Co2 => self.source_entities_co2(),
            })
            .unique()
            .collect()
    }
}
