use std::fmt::{Debug, Display, Formatter};

use crate::sensor::Description;

/// Ratio displayed in percent.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Sensor value with its unit, the way a host shows it.
pub struct FormattedSensorValue {
    pub value: Option<f64>,
    pub description: Description,
}

impl Display for FormattedSensorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => {
                write!(f, "{:.*} {}", self.description.precision, value, self.description.unit)
            }
            None => write!(f, "unavailable"),
        }
    }
}
