mod per_adapter;

use std::{
    collections::{HashMap, HashSet},
    iter::once,
};

use itertools::Itertools;

pub use self::per_adapter::PerAdapter;
use crate::{
    adapter::{Adapter, AdapterContainer, GeneratorAdapter, GridAdapter, PowerAdapter},
    error::ConfigurationError,
    ops::{division_zero, strict_sum},
    prelude::*,
    quantity::{
        cost::HourlyCost,
        emission::{GramsPerHour, GramsPerKilowattHour},
        power::Watts,
        price::KilowattHourPrice,
    },
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Route {
    Grid,
    Producer(usize),
    Consumer(usize),
}

#[must_use]
pub struct PowerInsight {
    grid: GridAdapter,
    producers: AdapterContainer,
    consumers: AdapterContainer,

    /// Entity ID to the owning adapter, fixed once built.
    routes: HashMap<String, Route>,
}

impl PowerInsight {
    pub fn builder() -> PowerInsightBuilder {
        PowerInsightBuilder::default()
    }

    pub const fn grid(&self) -> &GridAdapter {
        &self.grid
    }

    pub const fn producers(&self) -> &AdapterContainer {
        &self.producers
    }

    pub const fn consumers(&self) -> &AdapterContainer {
        &self.consumers
    }

    /// Route the raw value to the adapter owning the entity.
    ///
    /// Returns `false` when no adapter owns the entity, the value is then dropped.
    pub fn set_value(&mut self, entity_id: &str, value: Option<f64>) -> bool {
        let Some(route) = self.routes.get(entity_id).copied() else {
            debug!(entity_id, "no adapter owns the entity, ignoring");
            return false;
        };
        trace!(entity_id, ?value, ?route, "routing");
        let adapter: Option<&mut dyn PowerAdapter> = match route {
            Route::Grid => Some(&mut self.grid as &mut dyn PowerAdapter),
            Route::Producer(index) => {
                self.producers.get_index_mut(index).map(|adapter| adapter as &mut dyn PowerAdapter)
            }
            Route::Consumer(index) => {
                self.consumers.get_index_mut(index).map(|adapter| adapter as &mut dyn PowerAdapter)
            }
        };
        adapter.is_some_and(|adapter| {
            adapter.set_value(entity_id, value);
            true
        })
    }

    /// Route a host state string, anything but a finite number being unknown.
    pub fn set_state(&mut self, entity_id: &str, state: &str) -> bool {
        self.set_value(entity_id, parse_state(state))
    }

    /// Adapter owning the entity.
    #[must_use]
    pub fn get_adapter(&self, entity_id: &str) -> Option<&dyn PowerAdapter> {
        match self.routes.get(entity_id)? {
            Route::Grid => Some(&self.grid as &dyn PowerAdapter),
            Route::Producer(index) => {
                self.producers.get_index(*index).map(|adapter| adapter as &dyn PowerAdapter)
            }
            Route::Consumer(index) => {
                self.consumers.get_index(*index).map(|adapter| adapter as &dyn PowerAdapter)
            }
        }
    }

    #[must_use]
    pub fn source_entities_power(&self) -> Vec<&str> {
        self.collect_entities(
            self.grid.source_entities_power(),
            AdapterContainer::source_entities_power,
        )
    }

    #[must_use]
    pub fn source_entities_price(&self) -> Vec<&str> {
        self.collect_entities(
            self.grid.source_entities_price(),
            AdapterContainer::source_entities_price,
        )
    }

    #[must_use]
    pub fn source_entities_co2(&self) -> Vec<&str> {
        self.collect_entities(
            self.grid.source_entities_co2(),
            AdapterContainer::source_entities_co2,
        )
    }

    fn collect_entities<'a>(
        &'a self,
        grid: Vec<&'a str>,
        container: impl Fn(&'a AdapterContainer) -> Vec<&'a str>,
    ) -> Vec<&'a str> {
        grid.into_iter()
            .chain(container(&self.producers))
            .chain(container(&self.consumers))
            .unique()
            .collect()
    }
}

/// Power totals.
impl PowerInsight {
    /// Power available to the installation: grid import plus local production.
    pub fn total_power(&self) -> Option<Watts> {
        strict_sum(
            once(self.grid.import_power())
                .chain(self.producers.iter().map(GeneratorAdapter::production)),
        )
    }

    /// Power the producers consume themselves, for example a charging battery.
    pub fn utilization_power(&self) -> Option<Watts> {
        strict_sum(self.producers.iter().map(GeneratorAdapter::consumption))
    }

    pub fn self_consumption_power(&self) -> Option<Watts> {
        Some(self.total_power()? - self.grid.export_power()? - self.utilization_power()?)
    }

    #[must_use]
    pub fn export_share(&self) -> Option<f64> {
        self.share_of_total(self.grid.export_power())
    }

    #[must_use]
    pub fn utilization_share(&self) -> Option<f64> {
        self.share_of_total(self.utilization_power())
    }

    #[must_use]
    pub fn self_consumption_share(&self) -> Option<f64> {
        self.share_of_total(self.self_consumption_power())
    }

    /// Self-consumption share relative to the power that is not exported.
    #[must_use]
    pub fn applicable_self_consumption_share(&self) -> Option<f64> {
        division_zero(self.self_consumption_share(), self.export_share().map(|share| 1.0 - share))
    }

    fn share_of_total(&self, power: Option<Watts>) -> Option<f64> {
        division_zero(power.map(f64::from), self.total_power().map(f64::from))
    }
}

/// Cost and CO2 aggregates.
impl PowerInsight {
    pub fn coe_rate(&self) -> Option<HourlyCost> {
        strict_sum(self.adapters().map(|adapter| adapter.coe_rate()))
    }

    pub fn lcoe_rate(&self) -> Option<HourlyCost> {
        strict_sum(self.adapters().map(|adapter| adapter.lcoe_rate()))
    }

    /// Average cost of the available power.
    pub fn coe(&self) -> Option<KilowattHourPrice> {
        self.per_kilowatt_hour(self.coe_rate().map(f64::from)).map(KilowattHourPrice)
    }

    pub fn lcoe(&self) -> Option<KilowattHourPrice> {
        self.per_kilowatt_hour(self.lcoe_rate().map(f64::from)).map(KilowattHourPrice)
    }

    pub fn co2_rate(&self) -> Option<GramsPerHour> {
        strict_sum(self.adapters().map(|adapter| adapter.co2_rate()))
    }

    pub fn lco2_rate(&self) -> Option<GramsPerHour> {
        strict_sum(self.adapters().map(|adapter| adapter.lco2_rate()))
    }

    pub fn co2_intensity(&self) -> Option<GramsPerKilowattHour> {
        self.per_kilowatt_hour(self.co2_rate().map(f64::from)).map(GramsPerKilowattHour)
    }

    pub fn levelized_co2_intensity(&self) -> Option<GramsPerKilowattHour> {
        self.per_kilowatt_hour(self.lco2_rate().map(f64::from)).map(GramsPerKilowattHour)
    }

    /// Grid first, then the producers.
    fn adapters(&self) -> impl Iterator<Item = &dyn PowerAdapter> {
        once(&self.grid as &dyn PowerAdapter)
            .chain(self.producers.iter().map(|adapter| adapter as &dyn PowerAdapter))
    }

    fn per_kilowatt_hour(&self, hourly: Option<f64>) -> Option<f64> {
        division_zero(hourly, self.total_power().map(|power| power.to_kilo().0))
    }
}

/// Everything derived for a single producer.
struct Allocation<'a> {
    adapter: &'a GeneratorAdapter,
    total_power_share: Option<f64>,
    export_share: Option<f64>,
    export_rate: Option<f64>,
    export_power: Option<Watts>,
    export_compensation_rate: Option<HourlyCost>,
    self_consumption_rate: Option<f64>,
    self_consumption_share: Option<f64>,
    self_consumption_power: Option<Watts>,
    self_consumption_saving_rate: Option<HourlyCost>,
    coo_rate: Option<HourlyCost>,
    lcoo_rate: Option<HourlyCost>,
}

impl Allocation<'_> {
    fn saving_rate(&self) -> Option<HourlyCost> {
        Some(
            self.export_compensation_rate? + self.self_consumption_saving_rate?
                - self.coo_rate?
                - self.adapter.coe_rate()?,
        )
    }

    fn levelized_saving_rate(&self) -> Option<HourlyCost> {
        Some(
            self.export_compensation_rate? + self.self_consumption_saving_rate?
                - self.lcoo_rate?
                - self.adapter.lcoe_rate()?,
        )
    }
}

fn product(lhs: Option<f64>, rhs: Option<f64>) -> Option<f64> {
    Some(lhs? * rhs?)
}

/// Per-producer allocation.
impl PowerInsight {
    fn allocations(&self) -> Vec<Allocation<'_>> {
        let total_power = self.total_power().map(f64::from);
        let export_share = self.export_share();
        let self_consumption_share = self.self_consumption_share();
        let applicable_self_consumption_share = self.applicable_self_consumption_share();
        let grid_export_power = self.grid.export_power();
        let grid_coe = self.grid.coe();
        let grid_lcoe = self.grid.lcoe();

        let total_power_shares = self
            .producers
            .iter()
            .map(|adapter| division_zero(adapter.production().map(f64::from), total_power))
            .collect_vec();

        // Only the exporting producers split the exported power between themselves.
        let exporting_share = strict_sum(
            self.producers
                .iter()
                .zip(&total_power_shares)
                .filter(|(adapter, _)| adapter.exports_power())
                .map(|(_, share)| *share),
        );

        self.producers
            .iter()
            .zip(total_power_shares)
            .map(|(adapter, total_power_share)| {
                let (export_share_k, export_rate, export_power) = if adapter.exports_power() {
                    let export_share_k = division_zero(total_power_share, exporting_share);
                    (
                        export_share_k,
                        division_zero(product(export_share_k, export_share), total_power_share),
                        grid_export_power.zip(export_share_k).map(|(power, share)| power * share),
                    )
                } else {
                    (Some(0.0), Some(0.0), grid_export_power.map(|_| Watts::ZERO))
                };
                let self_consumption_rate =
                    product(export_rate.map(|rate| 1.0 - rate), applicable_self_consumption_share);
                let self_consumption_power = adapter.power_from_share(self_consumption_rate);
                Allocation {
                    adapter,
                    total_power_share,
                    export_share: export_share_k,
                    export_rate,
                    export_power,
                    export_compensation_rate: export_power
                        .map(|power| power.to_kilo() * adapter.export_compensation()),
                    self_consumption_rate,
                    self_consumption_share: division_zero(
                        product(self_consumption_rate, total_power_share),
                        self_consumption_share,
                    ),
                    self_consumption_power,
                    self_consumption_saving_rate: self_consumption_power
                        .zip(grid_coe)
                        .map(|(power, coe)| power.to_kilo() * coe),
                    coo_rate: adapter.coo_rate(grid_coe),
                    lcoo_rate: adapter.lcoo_rate(grid_lcoe),
                }
            })
            .collect()
    }

    fn per_adapter<'a, T>(&'a self, value: impl Fn(&Allocation<'a>) -> Option<T>) -> PerAdapter<T> {
        self.allocations()
            .iter()
            .map(|allocation| (allocation.adapter.key().to_owned(), value(allocation)))
            .collect()
    }

    /// Share of each producer in the total power.
    pub fn adapters_total_power_shares(&self) -> PerAdapter<f64> {
        self.per_adapter(|allocation| allocation.total_power_share)
    }

    /// Share of each producer in the exported power, zero for the non-exporting ones.
    pub fn adapters_export_shares(&self) -> PerAdapter<f64> {
        self.per_adapter(|allocation| allocation.export_share)
    }

    /// Exported part of each producer's own production.
    pub fn adapters_export_rates(&self) -> PerAdapter<f64> {
        self.per_adapter(|allocation| allocation.export_rate)
    }

    pub fn adapters_export_power(&self) -> PerAdapter<Watts> {
        self.per_adapter(|allocation| allocation.export_power)
    }

    pub fn adapters_export_compensation_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.export_compensation_rate)
    }

    /// Self-consumed part of each producer's own production.
    pub fn adapters_self_consumption_rates(&self) -> PerAdapter<f64> {
        self.per_adapter(|allocation| allocation.self_consumption_rate)
    }

    /// Share of each producer in the self-consumed power.
    pub fn adapters_self_consumption_shares(&self) -> PerAdapter<f64> {
        self.per_adapter(|allocation| allocation.self_consumption_share)
    }

    pub fn adapters_self_consumption_power(&self) -> PerAdapter<Watts> {
        self.per_adapter(|allocation| allocation.self_consumption_power)
    }

    /// What the self-consumed power would have cost from the grid.
    pub fn adapters_self_consumption_saving_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.self_consumption_saving_rate)
    }

    pub fn adapters_coo_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.coo_rate)
    }

    pub fn adapters_lcoo_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.lcoo_rate)
    }

    pub fn adapters_saving_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.saving_rate())
    }

    pub fn adapters_levelized_saving_rates(&self) -> PerAdapter<HourlyCost> {
        self.per_adapter(|allocation| allocation.levelized_saving_rate())
    }

    pub fn total_saving_rate(&self) -> Option<HourlyCost> {
        self.adapters_saving_rates().total()
    }

    pub fn total_levelized_saving_rate(&self) -> Option<HourlyCost> {
        self.adapters_levelized_saving_rates().total()
    }

    pub fn total_coo_rate(&self) -> Option<HourlyCost> {
        self.adapters_coo_rates().total()
    }

    pub fn total_lcoo_rate(&self) -> Option<HourlyCost> {
        self.adapters_lcoo_rates().total()
    }

    pub fn total_export_compensation_rate(&self) -> Option<HourlyCost> {
        self.adapters_export_compensation_rates().total()
    }

    pub fn total_self_consumption_saving_rate(&self) -> Option<HourlyCost> {
        self.adapters_self_consumption_saving_rates().total()
    }
}

/// Parse a host state, `unavailable`, `unknown` and garbage being unknown.
#[must_use]
pub fn parse_state(state: &str) -> Option<f64> {
    state.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Collects the adapters of an installation, rejecting conflicting registrations.
#[must_use]
#[derive(Default)]
pub struct PowerInsightBuilder {
    grid: Option<GridAdapter>,
    producers: AdapterContainer,
    consumers: AdapterContainer,
    keys: HashSet<String>,

    /// Entity ID to the key of the adapter owning it.
    owners: HashMap<String, String>,
}

impl PowerInsightBuilder {
    pub fn register_grid(mut self, grid: GridAdapter) -> Result<Self, ConfigurationError> {
        if self.grid.is_some() {
            return Err(ConfigurationError::DuplicateGrid);
        }
        self.claim(&grid)?;
        info!(key = grid.key(), "registered the grid");
        self.grid = Some(grid);
        Ok(self)
    }

    pub fn register_producer(
        mut self,
        producer: GeneratorAdapter,
    ) -> Result<Self, ConfigurationError> {
        self.claim(&producer)?;
        info!(key = producer.key(), kind = %producer.kind(), "registered a producer");
        self.producers.push(producer);
        Ok(self)
    }

    pub fn register_consumer(
        mut self,
        consumer: GeneratorAdapter,
    ) -> Result<Self, ConfigurationError> {
        self.claim(&consumer)?;
        info!(key = consumer.key(), kind = %consumer.kind(), "registered a consumer");
        self.consumers.push(consumer);
        Ok(self)
    }

    pub fn register_adapter(self, adapter: Adapter) -> Result<Self, ConfigurationError> {
        debug!(key = adapter.as_power_adapter().key(), "registering");
        match adapter {
            Adapter::Grid(grid) => self.register_grid(grid),
            Adapter::Producer(producer) => self.register_producer(producer),
            Adapter::Consumer(consumer) => self.register_consumer(consumer),
        }
    }

    /// Reserve the adapter key and its source entities.
    fn claim(&mut self, adapter: &dyn PowerAdapter) -> Result<(), ConfigurationError> {
        if self.keys.contains(adapter.key()) {
            return Err(ConfigurationError::DuplicateKey { key: adapter.key().to_owned() });
        }
        let entity_ids = adapter.source_entities();
        if let Some((entity_id, owner)) = entity_ids
            .iter()
            .find_map(|entity_id| Some((*entity_id, self.owners.get(*entity_id)?)))
        {
            return Err(ConfigurationError::DuplicateEntity {
                entity_id: entity_id.to_owned(),
                owner: owner.clone(),
            });
        }
        self.keys.insert(adapter.key().to_owned());
        for entity_id in entity_ids {
            self.owners.insert(entity_id.to_owned(), adapter.key().to_owned());
        }
        Ok(())
    }

    pub fn build(self) -> Result<PowerInsight, ConfigurationError> {
        let grid = self.grid.ok_or(ConfigurationError::MissingGrid)?;
        let routes: HashMap<String, Route> = grid
            .source_entities()
            .into_iter()
            .map(|entity_id| (entity_id.to_owned(), Route::Grid))
            .chain(routes_of(&self.producers, Route::Producer))
            .chain(routes_of(&self.consumers, Route::Consumer))
            .collect();
        debug!(n_routes = routes.len(), "built the routing table");
        Ok(PowerInsight { grid, producers: self.producers, consumers: self.consumers, routes })
    }
}

fn routes_of(
    container: &AdapterContainer,
    route: fn(usize) -> Route,
) -> impl Iterator<Item = (String, Route)> + '_ {
    container.iter().enumerate().flat_map(move |(index, adapter)| {
        adapter
            .source_entities()
            .into_iter()
            .map(move |entity_id| (entity_id.to_owned(), route(index)))
            .collect_vec()
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::adapter::{GeneratorKind, PowerSource};

    const GRID_POWER: &str = "sensor.grid_power";
    const GRID_PRICE: &str = "sensor.grid_price";
    const GRID_CO2: &str = "sensor.grid_co2";

    fn grid() -> GridAdapter {
        GridAdapter::new(
            "grid",
            "Grid",
            PowerSource::new(GRID_POWER, false),
            Some(GRID_PRICE.to_owned()),
            Some(GRID_CO2.to_owned()),
        )
    }

    fn pv(key: &str, exports_power: bool) -> GeneratorAdapter {
        GeneratorAdapter::builder()
            .key(key)
            .verbose_name(key)
            .kind(GeneratorKind::Pv)
            .power_entity(format!("sensor.{key}_power"))
            .exports_power(exports_power)
            .export_compensation(KilowattHourPrice(0.08))
            .levelized_cost(KilowattHourPrice(0.12))
            .co2_intensity(GramsPerKilowattHour(40.0))
            .build()
    }

    fn battery() -> GeneratorAdapter {
        GeneratorAdapter::builder()
            .key("battery")
            .verbose_name("Battery")
            .kind(GeneratorKind::Battery)
            .power_entity("sensor.battery_power")
            .levelized_cost(KilowattHourPrice(0.25))
            .build()
    }

    fn grid_only() -> PowerInsight {
        PowerInsight::builder().register_grid(grid()).unwrap().build().unwrap()
    }

    fn with_pv() -> PowerInsight {
        PowerInsight::builder()
            .register_grid(grid())
            .unwrap()
            .register_producer(pv("pv", true))
            .unwrap()
            .build()
            .unwrap()
    }

    /// Two exporting PV systems and a non-exporting battery, all producing while exporting.
    fn mixed() -> PowerInsight {
        let mut insight = PowerInsight::builder()
            .register_adapter(Adapter::Grid(grid()))
            .unwrap()
            .register_adapter(Adapter::Producer(pv("roof", true)))
            .unwrap()
            .register_adapter(Adapter::Producer(pv("garage", true)))
            .unwrap()
            .register_adapter(Adapter::Producer(battery()))
            .unwrap()
            .build()
            .unwrap();
        insight.set_value(GRID_POWER, Some(-1000.0));
        insight.set_value("sensor.roof_power", Some(2000.0));
        insight.set_value("sensor.garage_power", Some(1000.0));
        insight.set_value("sensor.battery_power", Some(1000.0));
        insight
    }

    #[test]
    fn test_grid_import_only() {
        let mut insight = grid_only();
        insight.set_value(GRID_POWER, Some(1000.0));
        insight.set_value(GRID_PRICE, Some(0.3));
        assert_eq!(insight.total_power(), Some(Watts(1000.0)));
        assert_abs_diff_eq!(insight.coe().unwrap().0, 0.3);
        assert_abs_diff_eq!(insight.coe_rate().unwrap().0, 0.3);
        assert_abs_diff_eq!(insight.lcoe().unwrap().0, 0.3);
        assert_eq!(insight.export_share(), Some(0.0));
        assert_eq!(insight.self_consumption_share(), Some(1.0));
        assert!(insight.adapters_export_shares().is_empty());
        assert_eq!(insight.total_saving_rate(), Some(HourlyCost::ZERO));
    }

    #[test]
    fn test_exporting_pv() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(-500.0));
        insight.set_value("sensor.pv_power", Some(1500.0));

        assert_eq!(insight.total_power(), Some(Watts(1500.0)));
        assert_abs_diff_eq!(insight.export_share().unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_eq!(insight.self_consumption_power(), Some(Watts(1000.0)));
        assert_eq!(insight.adapters_export_shares().get("pv"), Some(1.0));
        assert_eq!(insight.adapters_export_power().get("pv"), Some(Watts(500.0)));
        assert_abs_diff_eq!(
            insight.adapters_export_rates().get("pv").unwrap(),
            1.0 / 3.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.applicable_self_consumption_share().unwrap(),
            1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.adapters_self_consumption_power().get("pv").unwrap().0,
            1000.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.adapters_self_consumption_shares().get("pv").unwrap(),
            1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.adapters_export_compensation_rates().get("pv").unwrap().0,
            0.04,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_exporting_pv_savings() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(-500.0));
        insight.set_value(GRID_PRICE, Some(0.3));
        insight.set_value("sensor.pv_power", Some(1500.0));

        // The grid imports nothing, so only the PV system contributes to the costs.
        assert_eq!(insight.coe_rate(), Some(HourlyCost::ZERO));
        assert_eq!(insight.coe(), Some(KilowattHourPrice::ZERO));
        assert_abs_diff_eq!(insight.lcoe_rate().unwrap().0, 0.18, epsilon = 1e-9);
        assert_abs_diff_eq!(insight.lcoe().unwrap().0, 0.12, epsilon = 1e-9);

        assert_abs_diff_eq!(
            insight.adapters_self_consumption_saving_rates().get("pv").unwrap().0,
            0.3,
            epsilon = 1e-9
        );
        assert_eq!(insight.adapters_coo_rates().get("pv"), Some(HourlyCost::ZERO));
        assert_abs_diff_eq!(insight.total_saving_rate().unwrap().0, 0.34, epsilon = 1e-9);
        assert_abs_diff_eq!(insight.total_levelized_saving_rate().unwrap().0, 0.16, epsilon = 1e-9);
    }

    #[test]
    fn test_co2_aggregates() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(1000.0));
        insight.set_value(GRID_CO2, Some(300.0));
        insight.set_value("sensor.pv_power", Some(1000.0));
        assert_eq!(insight.co2_rate(), Some(GramsPerHour(300.0)));
        assert_eq!(insight.lco2_rate(), Some(GramsPerHour(340.0)));
        assert_eq!(insight.co2_intensity(), Some(GramsPerKilowattHour(150.0)));
        assert_eq!(insight.levelized_co2_intensity(), Some(GramsPerKilowattHour(170.0)));
    }

    #[test]
    fn test_unknown_grid_power() {
        let mut insight = grid_only();
        insight.set_value(GRID_PRICE, Some(0.3));
        assert_eq!(insight.total_power(), None);
        assert_eq!(insight.coe_rate(), None);
        assert_eq!(insight.coe(), None);
        assert_eq!(insight.export_share(), None);
    }

    #[test]
    fn test_zero_import_with_unknown_price() {
        let mut insight = grid_only();
        insight.set_value(GRID_POWER, Some(0.0));
        assert_eq!(insight.coe_rate(), Some(HourlyCost::ZERO));
        assert_eq!(insight.coe(), Some(KilowattHourPrice::ZERO));
    }

    #[test]
    fn test_unknown_grid_price_makes_operating_costs_unknown() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(-500.0));
        insight.set_value("sensor.pv_power", Some(500.0));
        assert_eq!(insight.grid().coe(), None);
        assert_eq!(insight.coe_rate(), Some(HourlyCost::ZERO));

        assert_eq!(insight.adapters_coo_rates().get("pv"), None);
        assert_eq!(insight.adapters_lcoo_rates().get("pv"), None);
        assert_eq!(insight.total_coo_rate(), None);
        assert_eq!(insight.total_lcoo_rate(), None);
        assert_eq!(insight.adapters_self_consumption_saving_rates().get("pv"), None);
        assert_eq!(insight.total_saving_rate(), None);
    }

    #[test]
    fn test_unknown_grid_power_with_non_exporting_battery() {
        let mut insight = PowerInsight::builder()
            .register_grid(grid())
            .unwrap()
            .register_producer(battery())
            .unwrap()
            .build()
            .unwrap();
        insight.set_value("sensor.battery_power", Some(800.0));
        assert_eq!(insight.total_power(), None);
        assert_eq!(insight.adapters_export_shares().get("battery"), Some(0.0));
        assert_eq!(insight.adapters_export_rates().get("battery"), Some(0.0));
        assert_eq!(insight.adapters_export_power().get("battery"), None);
        assert_eq!(insight.adapters_export_compensation_rates().get("battery"), None);
        assert_eq!(insight.total_export_compensation_rate(), None);

        insight.set_value(GRID_POWER, Some(200.0));
        assert_eq!(insight.adapters_export_power().get("battery"), Some(Watts::ZERO));
        assert_eq!(insight.total_export_compensation_rate(), Some(HourlyCost::ZERO));
    }

    #[test]
    fn test_unknown_producer_makes_totals_unknown() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(100.0));
        assert_eq!(insight.total_power(), None);
        assert_eq!(insight.adapters_total_power_shares().get("pv"), None);
        assert_eq!(insight.total_coo_rate(), None);
    }

    #[test]
    fn test_export_without_available_power_is_unknown() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(-200.0));
        insight.set_value("sensor.pv_power", Some(0.0));
        assert_eq!(insight.total_power(), Some(Watts::ZERO));
        assert_eq!(insight.export_share(), None);
        assert_eq!(insight.utilization_share(), Some(0.0));
    }

    #[test]
    fn test_unrouted_entity_is_ignored() {
        let mut insight = with_pv();
        insight.set_value(GRID_POWER, Some(-500.0));
        insight.set_value("sensor.pv_power", Some(1500.0));
        assert!(!insight.set_value("sensor.kitchen", Some(42.0)));
        assert!(!insight.set_state("sensor.kitchen", "42"));
        assert!(insight.get_adapter("sensor.kitchen").is_none());
        assert_eq!(insight.total_power(), Some(Watts(1500.0)));
    }

    #[test]
    fn test_set_state() {
        let mut insight = grid_only();
        assert!(insight.set_state(GRID_POWER, "1000"));
        assert_eq!(insight.total_power(), Some(Watts(1000.0)));
        assert!(insight.set_state(GRID_POWER, "unavailable"));
        assert_eq!(insight.total_power(), None);
        assert_eq!(parse_state(" 12.5 "), Some(12.5));
        assert_eq!(parse_state("unknown"), None);
        assert_eq!(parse_state("NaN"), None);
    }

    #[test]
    fn test_export_shares_are_split_between_exporters() {
        let insight = mixed();
        assert_eq!(insight.total_power(), Some(Watts(4000.0)));

        let export_shares = insight.adapters_export_shares();
        assert_abs_diff_eq!(export_shares.get("roof").unwrap(), 2.0 / 3.0);
        assert_abs_diff_eq!(export_shares.get("garage").unwrap(), 1.0 / 3.0);
        assert_eq!(export_shares.get("battery"), Some(0.0));
        assert_abs_diff_eq!(export_shares.total().unwrap(), 1.0, epsilon = 1e-9);

        assert_eq!(insight.adapters_export_rates().get("battery"), Some(0.0));
        assert_eq!(insight.adapters_export_power().get("battery"), Some(Watts::ZERO));
        assert_eq!(
            insight.adapters_export_compensation_rates().get("battery"),
            Some(HourlyCost::ZERO)
        );
        assert_abs_diff_eq!(
            insight.adapters_export_power().total().unwrap().0,
            1000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_power_identities() {
        let insight = mixed();
        let total = insight.total_power().unwrap();
        let export = insight.grid().export_power().unwrap();
        let utilization = insight.utilization_power().unwrap();
        let self_consumption = insight.self_consumption_power().unwrap();
        assert_abs_diff_eq!(total.0, (export + utilization + self_consumption).0);

        assert_abs_diff_eq!(
            insight.adapters_self_consumption_power().total().unwrap().0,
            self_consumption.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.adapters_self_consumption_shares().total().unwrap(),
            1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            insight.adapters_self_consumption_shares().get("battery").unwrap(),
            1.0 / 3.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(insight.adapters_total_power_shares().total().unwrap(), 1.0);
    }

    #[test]
    fn test_charging_battery_is_utilization() {
        let mut insight = mixed();
        insight.set_value(GRID_PRICE, Some(0.3));
        insight.set_value("sensor.battery_power", Some(-500.0));
        assert_eq!(insight.utilization_power(), Some(Watts(500.0)));
        assert_eq!(insight.total_power(), Some(Watts(3000.0)));
        assert_abs_diff_eq!(insight.utilization_share().unwrap(), 1.0 / 6.0);
        assert_abs_diff_eq!(insight.adapters_coo_rates().get("battery").unwrap().0, 0.15);
        assert_eq!(insight.adapters_self_consumption_power().get("battery"), Some(Watts::ZERO));
    }

    #[test]
    fn test_source_entities() {
        let insight = mixed();
        assert_eq!(
            insight.source_entities_power(),
            [GRID_POWER, "sensor.roof_power", "sensor.garage_power", "sensor.battery_power"]
        );
        assert_eq!(insight.source_entities_price(), [GRID_PRICE]);
        assert_eq!(insight.source_entities_co2(), [GRID_CO2]);
        assert_eq!(
            insight.get_adapter("sensor.garage_power").map(|adapter| adapter.key()),
            Some("garage")
        );
        assert_eq!(insight.get_adapter(GRID_PRICE).map(|adapter| adapter.key()), Some("grid"));
    }

    #[test]
    fn test_consumer_routing() {
        let mut insight = PowerInsight::builder()
            .register_grid(grid())
            .unwrap()
            .register_consumer(battery())
            .unwrap()
            .build()
            .unwrap();
        assert!(insight.set_value("sensor.battery_power", Some(300.0)));
        assert_eq!(insight.consumers().len(), 1);
        assert!(insight.producers().is_empty());
        assert_eq!(
            insight.get_adapter("sensor.battery_power").map(|adapter| adapter.key()),
            Some("battery")
        );
        assert!(insight.source_entities_power().contains(&"sensor.battery_power"));
    }

    #[test]
    fn test_duplicate_grid() {
        let result = PowerInsight::builder().register_grid(grid()).unwrap().register_grid(grid());
        assert!(matches!(result, Err(ConfigurationError::DuplicateGrid)));
    }

    #[test]
    fn test_duplicate_key() {
        let result = PowerInsight::builder()
            .register_grid(grid())
            .unwrap()
            .register_producer(pv("roof", true))
            .unwrap()
            .register_consumer(
                GeneratorAdapter::builder()
                    .key("roof")
                    .verbose_name("Roof")
                    .kind(GeneratorKind::Battery)
                    .power_entity("sensor.other")
                    .levelized_cost(KilowattHourPrice(0.2))
                    .build(),
            );
        assert!(matches!(result, Err(ConfigurationError::DuplicateKey { key }) if key == "roof"));
    }

    #[test]
    fn test_duplicate_entity() {
        let result = PowerInsight::builder().register_grid(grid()).unwrap().register_producer(
            GeneratorAdapter::builder()
                .key("roof")
                .verbose_name("Roof")
                .kind(GeneratorKind::Pv)
                .power_entity(GRID_POWER)
                .levelized_cost(KilowattHourPrice(0.1))
                .build(),
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateEntity { entity_id, owner })
                if entity_id == GRID_POWER && owner == "grid"
        ));
    }

    #[test]
    fn test_missing_grid() {
        let result = PowerInsight::builder().register_producer(pv("roof", true)).unwrap().build();
        assert!(matches!(result, Err(ConfigurationError::MissingGrid)));
    }
}
