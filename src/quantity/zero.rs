/// Additive identity, used to seed sums and zero-power short-circuits.
pub trait Zero {
    const ZERO: Self;
}

impl Zero for f64 {
    const ZERO: Self = 0.0;
}
