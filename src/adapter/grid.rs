use crate::{
    adapter::{PowerAdapter, PowerSource, Readings},
    config::{ConfigMap, ConfigReader, keys},
    error::ConfigurationError,
    ops::rate,
    quantity::{
        cost::HourlyCost,
        emission::{GramsPerHour, GramsPerKilowattHour},
        power::Watts,
        price::KilowattHourPrice,
    },
};

/// Grid connection point: a single signed power reading, positive while importing.
#[must_use]
#[derive(Clone, Debug)]
pub struct GridAdapter {
    key: String,
    verbose_name: String,
    power: PowerSource,
    price_entity: Option<String>,
    co2_entity: Option<String>,
    readings: Readings,
}

impl GridAdapter {
    pub fn new(
        key: impl Into<String>,
        verbose_name: impl Into<String>,
        power: PowerSource,
        price_entity: Option<String>,
        co2_entity: Option<String>,
    ) -> Self {
        let readings = Readings::with_entities(
            std::iter::once(power.entity_id.as_str())
                .chain(price_entity.as_deref())
                .chain(co2_entity.as_deref()),
        );
        Self {
            key: key.into(),
            verbose_name: verbose_name.into(),
            power,
            price_entity,
            co2_entity,
            readings,
        }
    }

    pub fn from_config(
        key: impl Into<String>,
        verbose_name: impl Into<String>,
        config: &ConfigMap,
    ) -> Result<Self, ConfigurationError> {
        let config = ConfigReader::new(config);
        Ok(Self::new(
            key,
            verbose_name,
            PowerSource::new(
                config.required_str(keys::POWER_ENTITY)?,
                config.flag(keys::POWER_INVERTED)?,
            ),
            config.optional_str(keys::ELECTRICITY_PRICE_ENTITY)?.map(ToOwned::to_owned),
            config.optional_str(keys::CO2_INTENSITY_ENTITY)?.map(ToOwned::to_owned),
        ))
    }

    /// Signed power after the optional inversion.
    pub fn power(&self) -> Option<Watts> {
        self.power.read(&self.readings)
    }

    pub fn import_power(&self) -> Option<Watts> {
        self.power().map(Watts::positive_part)
    }

    pub fn export_power(&self) -> Option<Watts> {
        self.power().map(Watts::negative_part)
    }

    /// Cost of electricity, the spot price reading.
    pub fn coe(&self) -> Option<KilowattHourPrice> {
        self.readings.get(self.price_entity.as_deref()?).map(KilowattHourPrice)
    }

    /// The grid has no levelization: the levelized cost is the spot price.
    pub fn lcoe(&self) -> Option<KilowattHourPrice> {
        self.coe()
    }

    pub fn co2_intensity(&self) -> Option<GramsPerKilowattHour> {
        self.readings.get(self.co2_entity.as_deref()?).map(GramsPerKilowattHour)
    }
}

impl PowerAdapter for GridAdapter {
    fn key(&self) -> &str {
        &self.key
    }

    fn verbose_name(&self) -> &str {
        &self.verbose_name
    }

    fn readings(&self) -> &Readings {
        &self.readings
    }

    fn readings_mut(&mut self) -> &mut Readings {
        &mut self.readings
    }

    fn source_entities_power(&self) -> Vec<&str> {
        vec![self.power.entity_id.as_str()]
    }

    fn source_entities_price(&self) -> Vec<&str> {
        self.price_entity.as_deref().into_iter().collect()
    }

    fn source_entities_co2(&self) -> Vec<&str> {
        self.co2_entity.as_deref().into_iter().collect()
    }

    fn coe_rate(&self) -> Option<HourlyCost> {
        rate(self.import_power().map(Watts::to_kilo), self.coe())
    }

    fn lcoe_rate(&self) -> Option<HourlyCost> {
        rate(self.import_power().map(Watts::to_kilo), self.lcoe())
    }

    fn co2_rate(&self) -> Option<GramsPerHour> {
        Some(self.import_power()?.to_kilo() * self.co2_intensity()?)
    }

    fn lco2_rate(&self) -> Option<GramsPerHour> {
        self.co2_rate()
    }
}
