use std::collections::BTreeMap;

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

/// Snapshot of entity states.
#[serde_as]
#[derive(Deserialize)]
pub struct Snapshot(
    #[serde_as(as = "BTreeMap<_, DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>>")]
    pub BTreeMap<String, Option<f64>>,
);

/// Single state change of an entity.
#[serde_as]
#[derive(Deserialize)]
pub struct StateEvent {
    pub entity_id: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    pub state: Option<f64>,
}
