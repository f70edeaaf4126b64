use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use enumset::EnumSet;
use itertools::Itertools;
use power_insight::{
    AdapterSensor,
    PowerAdapter,
    PowerInsight,
    Sensor,
    fmt::{FormattedPercentage, FormattedSensorValue},
    sensor::Description,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn value_cell(value: Option<f64>, description: Description) -> Cell {
    let cell = Cell::new(FormattedSensorValue { value, description })
        .set_alignment(CellAlignment::Right);
    match value {
        Some(value) if value < 0.0 => cell.fg(Color::Red),
        Some(_) => cell,
        None => cell.add_attribute(Attribute::Dim),
    }
}

pub fn build_sensors_table(insight: &PowerInsight, sensors: EnumSet<Sensor>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Sensor", "Value", "Sources"]);
    for sensor in sensors {
        let description = sensor.description();
        table.add_row(vec![
            Cell::new(description.name),
            value_cell(insight.sensor_value(sensor), description),
            Cell::new(description.sources.iter().join(", ")).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// One column per producer, one row per producer sensor.
pub fn build_producers_table(insight: &PowerInsight) -> Table {
    let producers = insight.producers();
    let mut table = new_table();
    table.set_header(
        std::iter::once(Cell::new("Sensor"))
            .chain(producers.iter().map(|producer| {
                Cell::new(format!("{} ({})", producer.verbose_name(), producer.kind()))
            }))
            .collect_vec(),
    );

    let shares = insight.adapters_total_power_shares();
    table.add_row(
        std::iter::once(Cell::new("Share of available power"))
            .chain(producers.iter().map(|producer| {
                shares.get(producer.key()).map_or_else(
                    || Cell::new("unavailable").add_attribute(Attribute::Dim),
                    |share| Cell::new(FormattedPercentage(share)),
                )
                .set_alignment(CellAlignment::Right)
            }))
            .collect_vec(),
    );

    for sensor in EnumSet::<AdapterSensor>::all() {
        let description = sensor.description();
        table.add_row(
            std::iter::once(Cell::new(description.name))
                .chain(producers.iter().map(|producer| {
                    if sensor.exists_for(producer) {
                        value_cell(
                            insight.adapter_sensor_value(sensor, producer.key()),
                            description,
                        )
                    } else {
                        Cell::new("").add_attribute(Attribute::Dim)
                    }
                }))
                .collect_vec(),
        );
    }
    table
}

pub fn build_entities_table(insight: &PowerInsight) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Entity", "Adapter", "Power", "Price", "CO2"]);
    let power = insight.source_entities_power();
    let price = insight.source_entities_price();
    let co2 = insight.source_entities_co2();
    let check = |entity_ids: &[&str], entity_id: &str| {
        if entity_ids.iter().any(|id| *id == entity_id) {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("")
        }
    };
    for entity_id in power.iter().chain(&price).chain(&co2).copied().unique() {
        table.add_row(vec![
            Cell::new(entity_id),
            Cell::new(insight.get_adapter(entity_id).map_or("", |adapter| adapter.key())),
            check(power.as_slice(), entity_id),
            check(price.as_slice(), entity_id),
            check(co2.as_slice(), entity_id),
        ]);
    }
    table
}
