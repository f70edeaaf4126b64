mod container;
mod generator;
mod grid;
mod readings;

use itertools::Itertools;

pub use self::{
    container::AdapterContainer,
    generator::{GeneratorAdapter, GeneratorKind},
    grid::GridAdapter,
    readings::Readings,
};
use crate::{
    prelude::*,
    quantity::{cost::HourlyCost, emission::GramsPerHour, power::Watts},
};

/// Common contract of every adapter.
pub trait PowerAdapter {
    /// Unique slug of the adapter within an installation.
    fn key(&self) -> &str;

    fn verbose_name(&self) -> &str;

    fn readings(&self) -> &Readings;

    fn readings_mut(&mut self) -> &mut Readings;

    /// Entities whose updates affect the power outputs.
    fn source_entities_power(&self) -> Vec<&str>;

    /// Entities whose updates affect the price outputs.
    fn source_entities_price(&self) -> Vec<&str>;

    /// Entities whose updates affect the CO2 outputs.
    fn source_entities_co2(&self) -> Vec<&str>;

    fn source_entities(&self) -> Vec<&str> {
        self.source_entities_power()
            .into_iter()
            .chain(self.source_entities_price())
            .chain(self.source_entities_co2())
            .unique()
            .collect()
    }

    /// Store the latest raw value, `None` meaning currently unknown.
    ///
    /// Values for entities the adapter does not own are ignored.
    fn set_value(&mut self, entity_id: &str, value: Option<f64>) {
        if !self.readings_mut().set(entity_id, value) {
            warn!(adapter = self.key(), entity_id, "the adapter does not own the entity");
        }
    }

    /// Unlevelized cost rate of the power this adapter supplies.
    fn coe_rate(&self) -> Option<HourlyCost>;

    /// Levelized cost rate of the power this adapter supplies.
    fn lcoe_rate(&self) -> Option<HourlyCost>;

    fn co2_rate(&self) -> Option<GramsPerHour>;

    fn lco2_rate(&self) -> Option<GramsPerHour>;
}

/// Signed power sensor with an optional sign inversion.
#[must_use]
#[derive(Clone, Debug)]
pub struct PowerSource {
    pub entity_id: String,
    pub inverted: bool,
}

impl PowerSource {
    pub fn new(entity_id: impl Into<String>, inverted: bool) -> Self {
        Self { entity_id: entity_id.into(), inverted }
    }

    pub fn read(&self, readings: &Readings) -> Option<Watts> {
        let power = Watts(readings.get(&self.entity_id)?);
        Some(if self.inverted { -power } else { power })
    }
}

/// Adapter together with its role in the installation.
///
/// The set of roles is closed, so registration can match exhaustively.
#[must_use]
pub enum Adapter {
    Grid(GridAdapter),
    Producer(GeneratorAdapter),
    Consumer(GeneratorAdapter),
}

impl Adapter {
    pub fn as_power_adapter(&self) -> &dyn PowerAdapter {
        match self {
            Self::Grid(adapter) => adapter as &dyn PowerAdapter,
            Self::Producer(adapter) | Self::Consumer(adapter) => adapter as &dyn PowerAdapter,
        }
    }
}
