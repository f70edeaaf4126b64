use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::{
    adapter::{GeneratorAdapter, GridAdapter, PowerAdapter},
    config::{ConfigMap, ConfigReader, Lifetime, keys},
    error::ConfigurationError,
    insight::PowerInsight,
    prelude::*,
    quantity::price::KilowattHourPrice,
};

/// Whole installation: the grid connection, PV systems and batteries.
///
/// Each section is a configuration map, the same shape the adapters accept.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Setup {
    #[serde(default)]
    pub name: Option<String>,

    pub grid: ConfigMap,

    #[serde(default)]
    pub pv_systems: Vec<ConfigMap>,

    #[serde(default)]
    pub batteries: Vec<ConfigMap>,
}

impl FromStr for Setup {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Setup {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        contents.parse().with_context(|| format!("failed to parse `{}`", path.display()))
    }

    #[instrument(skip_all, fields(name = self.name.as_deref()))]
    pub fn build(&self) -> Result<PowerInsight, ConfigurationError> {
        let (key, name) = identity(&self.grid, "grid", "Grid", None)?;
        let mut builder = PowerInsight::builder()
            .register_grid(GridAdapter::from_config(key, name, &self.grid)?)?;

        let mut pv_systems = Vec::with_capacity(self.pv_systems.len());
        for (index, config) in self.pv_systems.iter().enumerate() {
            let (key, name) =
                identity(config, "pv_system", "PV-System", ordinal(index, &self.pv_systems))?;
            let config = complete_pv(config)?;
            pv_systems.push(GeneratorAdapter::pv_from_config(key, name, &config)?);
        }

        let mut batteries = Vec::with_capacity(self.batteries.len());
        for (index, config) in self.batteries.iter().enumerate() {
            let (key, name) =
                identity(config, "battery", "Battery", ordinal(index, &self.batteries))?;
            let config = complete_battery(&key, config, &pv_systems)?;
            batteries.push(GeneratorAdapter::battery_from_config(key, name, &config)?);
        }

        for producer in pv_systems.into_iter().chain(batteries) {
            builder = builder.register_producer(producer)?;
        }
        builder.build()
    }
}

/// One-based position of the section, if there are multiple sections of the kind.
const fn ordinal<T>(index: usize, sections: &[T]) -> Option<usize> {
    if sections.len() > 1 { Some(index + 1) } else { None }
}

fn identity(
    config: &ConfigMap,
    default_key: &str,
    default_name: &str,
    ordinal: Option<usize>,
) -> Result<(String, String), ConfigurationError> {
    let config = ConfigReader::new(config);
    let key = match (config.optional_str(keys::KEY)?, ordinal) {
        (Some(key), _) => key.to_owned(),
        (None, Some(ordinal)) => format!("{default_key}_{ordinal}"),
        (None, None) => default_key.to_owned(),
    };
    let name = match (config.optional_str(keys::NAME)?, ordinal) {
        (Some(name), _) => name.to_owned(),
        (None, Some(ordinal)) => format!("{default_name} {ordinal}"),
        (None, None) => default_name.to_owned(),
    };
    Ok((key, name))
}

/// Fill in the levelized cost and CO2 intensity of a PV system from its lifetime totals.
fn complete_pv(config: &ConfigMap) -> Result<ConfigMap, ConfigurationError> {
    let mut config = config.clone();
    if let Some(lifetime) = Lifetime::from_config(&config)? {
        fill_missing(&mut config, keys::LCOE, || Ok(lifetime.lcoe().0))?;
        fill_missing(&mut config, keys::CO2_INTENSITY, || Ok(lifetime.co2_intensity().0))?;
    }
    Ok(config)
}

/// Fill in the levelized cost of storage and CO2 intensity of a battery.
///
/// The charged energy is priced at the LCOE of the PV system the battery is charged from.
fn complete_battery(
    key: &str,
    config: &ConfigMap,
    pv_systems: &[GeneratorAdapter],
) -> Result<ConfigMap, ConfigurationError> {
    let mut config = config.clone();
    if let Some(lifetime) = Lifetime::from_config(&config)? {
        let reader = ConfigReader::new(&config);
        let charged_from = reader.optional_str(keys::CHARGED_FROM)?.map(ToOwned::to_owned);
        let round_trip_efficiency = reader
            .optional_number(keys::ROUND_TRIP_EFFICIENCY)?
            .unwrap_or(Lifetime::DEFAULT_ROUND_TRIP_EFFICIENCY);
        fill_missing(&mut config, keys::LCOS, || {
            let charging_lcoe = charging_lcoe(key, charged_from.as_deref(), pv_systems)?;
            Ok(lifetime.lcos(charging_lcoe, round_trip_efficiency)?.0)
        })?;
        fill_missing(&mut config, keys::CO2_INTENSITY, || Ok(lifetime.co2_intensity().0))?;
    }
    Ok(config)
}

fn charging_lcoe(
    battery: &str,
    charged_from: Option<&str>,
    pv_systems: &[GeneratorAdapter],
) -> Result<KilowattHourPrice, ConfigurationError> {
    let source = match charged_from {
        Some(charged_from) => pv_systems
            .iter()
            .find(|pv_system| pv_system.key() == charged_from)
            .ok_or_else(|| ConfigurationError::InvalidValue {
                key: keys::CHARGED_FROM,
                reason: format!("there is no PV system `{charged_from}`"),
            })?,
        None => pv_systems.first().ok_or_else(|| ConfigurationError::MissingChargingSource {
            battery: battery.to_owned(),
        })?,
    };
    debug!(battery, pv_system = source.key(), lcoe = ?source.lcoe(), "charging source");
    Ok(source.lcoe())
}

/// Precomputed values win over derived ones.
fn fill_missing(
    config: &mut ConfigMap,
    key: &'static str,
    derive: impl FnOnce() -> Result<f64, ConfigurationError>,
) -> Result<(), ConfigurationError> {
    if ConfigReader::new(config).optional_number(key)?.is_none() {
        let value = derive()?;
        debug!(key, value, "derived from the lifetime totals");
        config.insert(key.to_owned(), value.into());
    }
    Ok(())
}
