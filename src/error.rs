use derive_more::{Display, Error};

/// Setup-time failure: the installation cannot be assembled from its configuration.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[display("required configuration key `{key}` is missing")]
    MissingKey { key: &'static str },

    #[display("configuration key `{key}` has an invalid value: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[display("the grid adapter is already registered")]
    DuplicateGrid,

    #[display("the grid adapter is not registered")]
    MissingGrid,

    #[display("adapter key `{key}` is already registered")]
    DuplicateKey { key: String },

    #[display("entity `{entity_id}` is already owned by adapter `{owner}`")]
    DuplicateEntity { entity_id: String, owner: String },

    #[display("battery `{battery}` has no PV system to derive its charging cost from")]
    MissingChargingSource { battery: String },
}
