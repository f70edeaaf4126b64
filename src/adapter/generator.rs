use std::fmt::{Display, Formatter};

use bon::bon;

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

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Photovoltaic system, levelized by its LCOE.
    Pv,

    /// Home battery, levelized by its LCOS.
    Battery,
}

impl GeneratorKind {
    /// Configuration key of the precomputed levelized cost.
    pub const fn levelized_cost_key(self) -> &'static str {
        match self {
            Self::Pv => keys::LCOE,
            Self::Battery => keys::LCOS,
        }
    }
}

impl Display for GeneratorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pv => write!(f, "PV system"),
            Self::Battery => write!(f, "Battery"),
        }
    }
}

/// Power-producing device: positive power while producing, negative while consuming.
///
/// The levelized cost and CO2 intensity are derived once from the lifetime totals and stay
/// constant for the lifetime of the adapter.
#[must_use]
#[derive(Clone, Debug)]
pub struct GeneratorAdapter {
    key: String,
    verbose_name: String,
    kind: GeneratorKind,
    power: PowerSource,
    exports_power: bool,
    export_compensation: KilowattHourPrice,
    levelized_cost: KilowattHourPrice,
    co2_intensity: GramsPerKilowattHour,
    readings: Readings,
}

#[bon]
impl GeneratorAdapter {
    #[builder]
    pub fn new(
        #[builder(into)] key: String,
        #[builder(into)] verbose_name: String,
        kind: GeneratorKind,
        #[builder(into)] power_entity: String,
        #[builder(default)] power_inverted: bool,
        #[builder(default)] exports_power: bool,
        #[builder(default)] export_compensation: KilowattHourPrice,
        levelized_cost: KilowattHourPrice,
        #[builder(default)] co2_intensity: GramsPerKilowattHour,
    ) -> Self {
        let readings = Readings::with_entities([power_entity.as_str()]);
        Self {
            key,
            verbose_name,
            kind,
            power: PowerSource::new(power_entity, power_inverted),
            exports_power,
            export_compensation,
            levelized_cost,
            co2_intensity,
            readings,
        }
    }
}

impl GeneratorAdapter {
    pub fn pv_from_config(
        key: impl Into<String>,
        verbose_name: impl Into<String>,
        config: &ConfigMap,
    ) -> Result<Self, ConfigurationError> {
        Self::from_config(GeneratorKind::Pv, key, verbose_name, config)
    }

    pub fn battery_from_config(
        key: impl Into<String>,
        verbose_name: impl Into<String>,
        config: &ConfigMap,
    ) -> Result<Self, ConfigurationError> {
        Self::from_config(GeneratorKind::Battery, key, verbose_name, config)
    }

    fn from_config(
        kind: GeneratorKind,
        key: impl Into<String>,
        verbose_name: impl Into<String>,
        config: &ConfigMap,
    ) -> Result<Self, ConfigurationError> {
        let config = ConfigReader::new(config);
        Ok(Self::builder()
            .key(key)
            .verbose_name(verbose_name)
            .kind(kind)
            .power_entity(config.required_str(keys::POWER_ENTITY)?)
            .power_inverted(config.flag(keys::POWER_INVERTED)?)
            .exports_power(config.flag(keys::EXPORTS_POWER)?)
            .export_compensation(KilowattHourPrice(
                config.optional_number(keys::EXPORT_COMPENSATION)?.unwrap_or_default(),
            ))
            .levelized_cost(KilowattHourPrice(
                config.required_number(kind.levelized_cost_key())?,
            ))
            .co2_intensity(GramsPerKilowattHour(config.required_number(keys::CO2_INTENSITY)?))
            .build())
    }

    pub const fn kind(&self) -> GeneratorKind {
        self.kind
    }

    #[must_use]
    pub const fn exports_power(&self) -> bool {
        self.exports_power
    }

    /// Compensation paid for the exported energy.
    pub const fn export_compensation(&self) -> KilowattHourPrice {
        self.export_compensation
    }

    pub const fn co2_intensity(&self) -> GramsPerKilowattHour {
        self.co2_intensity
    }

    /// Signed power after the optional inversion.
    pub fn power(&self) -> Option<Watts> {
        self.power.read(&self.readings)
    }

    pub fn production(&self) -> Option<Watts> {
        self.power().map(Watts::positive_part)
    }

    pub fn consumption(&self) -> Option<Watts> {
        self.power().map(Watts::negative_part)
    }

    /// Only the levelized cost is meaningful for a generator, the spot cost is zero.
    pub const fn coe(&self) -> KilowattHourPrice {
        KilowattHourPrice::ZERO
    }

    /// LCOE for a PV system, LCOS for a battery.
    pub const fn lcoe(&self) -> KilowattHourPrice {
        self.levelized_cost
    }

    /// Part of the production corresponding to the share.
    pub fn power_from_share(&self, share: Option<f64>) -> Option<Watts> {
        Some(self.production()? * share?)
    }

    /// Cost of operation: what the own consumption costs at the grid price.
    ///
    /// Unknown whenever the grid price is, even with no consumption.
    pub fn coo_rate(&self, grid_coe: Option<KilowattHourPrice>) -> Option<HourlyCost> {
        Some(self.consumption()?.to_kilo() * grid_coe?)
    }

    /// Levelized cost of operation: what the own consumption costs at the levelized grid price.
    pub fn lcoo_rate(&self, grid_lcoe: Option<KilowattHourPrice>) -> Option<HourlyCost> {
        Some(self.consumption()?.to_kilo() * grid_lcoe?)
    }
}

impl PowerAdapter for GeneratorAdapter {
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
        Vec::new()
    }

    fn source_entities_co2(&self) -> Vec<&str> {
        Vec::new()
    }

    fn coe_rate(&self) -> Option<HourlyCost> {
        rate(self.production().map(Watts::to_kilo), Some(self.coe()))
    }

    fn lcoe_rate(&self) -> Option<HourlyCost> {
        rate(self.production().map(Watts::to_kilo), Some(self.lcoe()))
    }

    fn co2_rate(&self) -> Option<GramsPerHour> {
        self.production().map(|_| GramsPerHour::ZERO)
    }

    fn lco2_rate(&self) -> Option<GramsPerHour> {
        Some(self.production()?.to_kilo() * self.co2_intensity)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::*;
    use crate::prelude::*;

    fn pv() -> GeneratorAdapter {
        GeneratorAdapter::builder()
            .key("pv")
            .verbose_name("PV")
            .kind(GeneratorKind::Pv)
            .power_entity("sensor.pv_power")
            .exports_power(true)
            .export_compensation(KilowattHourPrice(0.08))
            .levelized_cost(KilowattHourPrice(0.12))
            .co2_intensity(GramsPerKilowattHour(50.0))
            .build()
    }

    #[test]
    fn test_production_consumption_split() {
        let mut pv = pv();
        pv.set_value("sensor.pv_power", Some(1500.0));
        assert_eq!(pv.production(), Some(Watts(1500.0)));
        assert_eq!(pv.consumption(), Some(Watts::ZERO));

        pv.set_value("sensor.pv_power", Some(-20.0));
        assert_eq!(pv.production(), Some(Watts::ZERO));
        assert_eq!(pv.consumption(), Some(Watts(20.0)));
    }

    #[test]
    fn test_rates() {
        let mut pv = pv();
        pv.set_value("sensor.pv_power", Some(2000.0));
        assert_eq!(pv.coe_rate(), Some(HourlyCost::ZERO));
        assert_abs_diff_eq!(pv.lcoe_rate().unwrap().0, 0.24);
        assert_eq!(pv.co2_rate(), Some(GramsPerHour::ZERO));
        assert_eq!(pv.lco2_rate(), Some(GramsPerHour(100.0)));
        assert_eq!(pv.power_from_share(Some(0.25)), Some(Watts(500.0)));
    }

    #[test]
    fn test_unknown_power() {
        let pv = pv();
        assert_eq!(pv.production(), None);
        assert_eq!(pv.coe_rate(), None);
        assert_eq!(pv.lcoe_rate(), None);
        assert_eq!(pv.power_from_share(Some(0.5)), None);
        assert_eq!(pv.coo_rate(Some(KilowattHourPrice(0.3))), None);
    }

    #[test]
    fn test_coo_rate() {
        let mut battery = pv();
        battery.set_value("sensor.pv_power", Some(-500.0));
        assert_abs_diff_eq!(battery.coo_rate(Some(KilowattHourPrice(0.3))).unwrap().0, 0.15);
        assert_eq!(battery.lcoo_rate(None), None);

        battery.set_value("sensor.pv_power", Some(500.0));
        assert_eq!(battery.coo_rate(Some(KilowattHourPrice(0.3))), Some(HourlyCost::ZERO));
    }

    #[test]
    fn test_coo_rate_unknown_price_without_consumption() {
        let mut pv = pv();
        pv.set_value("sensor.pv_power", Some(500.0));
        assert_eq!(pv.consumption(), Some(Watts::ZERO));
        assert_eq!(pv.coo_rate(None), None);
        assert_eq!(pv.lcoo_rate(None), None);
    }

    #[test]
    fn test_battery_from_config() -> Result {
        let config = json!({
            "power_entity": "sensor.battery_power",
            "power_entity_inverted": true,
            "levelized_cost_of_storage": 0.25,
            "co2_intensity": 80.0,
        });
        let config = config.as_object().unwrap();
        let mut battery = GeneratorAdapter::battery_from_config("battery", "Battery", config)?;
        assert_eq!(battery.kind(), GeneratorKind::Battery);
        assert!(!battery.exports_power());
        assert_eq!(battery.export_compensation(), KilowattHourPrice::ZERO);
        assert_eq!(battery.lcoe(), KilowattHourPrice(0.25));

        battery.set_value("sensor.battery_power", Some(-300.0));
        assert_eq!(battery.production(), Some(Watts(300.0)));
        Ok(())
    }

    #[test]
    fn test_pv_from_config_requires_lcoe() {
        let config = json!({ "power_entity": "sensor.pv_power", "co2_intensity": 40 });
        assert_eq!(
            GeneratorAdapter::pv_from_config("pv", "PV", config.as_object().unwrap()).unwrap_err(),
            ConfigurationError::MissingKey { key: keys::LCOE },
        );
    }
}
