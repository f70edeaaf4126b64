#![allow(clippy::doc_markdown)]

//! Power-flow, cost and CO2 insights for a home energy system.
//!
//! The host feeds raw sensor readings into [`PowerInsight`] via [`PowerInsight::set_value`],
//! and reads derived metrics back, either through the named methods or through the
//! [`sensor`] catalogue. Unknown readings are `None` and propagate as `None`.

#[macro_use]
pub mod quantity;

pub mod adapter;
pub mod config;
pub mod error;
pub mod fmt;
pub mod insight;
pub mod ops;
pub mod prelude;
pub mod sensor;

pub use self::{
    adapter::{
        Adapter,
        AdapterContainer,
        GeneratorAdapter,
        GeneratorKind,
        GridAdapter,
        PowerAdapter,
    },
    config::{ConfigMap, Setup},
    error::ConfigurationError,
    insight::{PerAdapter, PowerInsight, PowerInsightBuilder},
    sensor::{AdapterSensor, Sensor, SourceRole},
};
