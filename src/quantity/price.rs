use crate::quantity::{
    cost::{Cost, HourlyCost},
    energy::KilowattHours,
    power::Kilowatts,
};

quantity!(
    /// Euro per kilowatt-hour: grid tariffs, export compensation, and levelized costs.
    KilowattHourPrice, via: f64, suffix: "€/kWh", precision: 3
);

implement_mul!(Kilowatts, KilowattHourPrice, HourlyCost);
implement_div!(HourlyCost, Kilowatts, KilowattHourPrice);
implement_div!(Cost, KilowattHours, KilowattHourPrice);
