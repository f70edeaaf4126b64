use std::ops::{Add, Mul};

use crate::quantity::{Zero, power::Kilowatts};

/// Divide, returning exactly zero for a zero numerator regardless of the denominator.
///
/// A zero denominator with a non-zero numerator yields unknown rather than an infinity.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn division_zero(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let numerator = numerator?;
    if numerator == 0.0 {
        return Some(0.0);
    }
    let denominator = denominator?;
    if denominator == 0.0 { None } else { Some(numerator / denominator) }
}

/// Cost rate of the power at the price.
///
/// Zero power gives exactly zero even when the price is unknown. Only the spot and levelized
/// cost rates of an adapter use this, everything else multiplies strictly.
#[must_use]
pub fn rate<P, R>(power: Option<Kilowatts>, per_kilowatt_hour: Option<P>) -> Option<R>
where
    Kilowatts: Mul<P, Output = R>,
    R: Zero,
{
    let power = power?;
    if power.is_zero() {
        return Some(R::ZERO);
    }
    Some(power * per_kilowatt_hour?)
}

/// All-or-nothing sum: any unknown term makes the entire sum unknown.
#[must_use]
pub fn strict_sum<T>(values: impl IntoIterator<Item = Option<T>>) -> Option<T>
where
    T: Zero + Add<Output = T>,
{
    values.into_iter().try_fold(T::ZERO, |sum, value| Some(sum + value?))
}
