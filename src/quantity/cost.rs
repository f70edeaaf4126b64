quantity!(Cost, via: f64, suffix: "€", precision: 2);

quantity!(
    /// Money flow per hour, the product of power and a per-kilowatt-hour price.
    HourlyCost, via: f64, suffix: "€/h", precision: 2
);
