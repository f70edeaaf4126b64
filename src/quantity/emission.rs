use std::ops::Div;

use crate::quantity::{energy::KilowattHours, power::Kilowatts};

quantity!(
    /// Lifetime CO2 footprint of an installation.
    Kilograms, via: f64, suffix: "kg", precision: 0
);

quantity!(GramsPerKilowattHour, via: f64, suffix: "g/kWh", precision: 0);
quantity!(GramsPerHour, via: f64, suffix: "g/h", precision: 0);

implement_mul!(Kilowatts, GramsPerKilowattHour, GramsPerHour);
implement_div!(GramsPerHour, Kilowatts, GramsPerKilowattHour);

impl Div<KilowattHours> for Kilograms {
    type Output = GramsPerKilowattHour;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        GramsPerKilowattHour(self.0 * 1000.0 / rhs.0)
    }
}
