quantity!(
    /// Instantaneous power as reported by the power sensors.
    Watts, via: f64, suffix: "W", precision: 0
);

quantity!(Kilowatts, via: f64, suffix: "kW", precision: 3);

impl Watts {
    pub fn to_kilo(self) -> Kilowatts {
        Kilowatts::from(self)
    }

    /// Positive part of a signed reading: import for the grid, production for a generator.
    pub const fn positive_part(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Magnitude of the negative part of a signed reading: export or consumption.
    pub const fn negative_part(self) -> Self {
        Self(-self.0).max(Self::ZERO)
    }
}

impl From<Kilowatts> for Watts {
    fn from(kilowatts: Kilowatts) -> Self {
        Self(kilowatts.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(watts: Watts) -> Self {
        Self(watts.0 / 1000.0)
    }
}
