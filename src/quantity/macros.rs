macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, via: f64, suffix: $suffix:literal, precision: $precision:literal) => {
        $(#[$meta])*
        #[must_use]
        #[repr(transparent)]
        #[derive(
            ::derive_more::Add,
            ::derive_more::AddAssign,
            ::derive_more::From,
            ::derive_more::FromStr,
            ::derive_more::Neg,
            ::derive_more::Sub,
            ::derive_more::SubAssign,
            ::derive_more::Sum,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::default::Default,
            ::std::cmp::PartialEq,
            ::std::cmp::PartialOrd,
        )]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            /// Suggested number of decimal places when displayed.
            pub const PRECISION: usize = $precision;

            /// Unit of measurement.
            pub const SUFFIX: &'static str = $suffix;

            #[must_use]
            #[allow(clippy::float_cmp)]
            pub fn is_zero(self) -> bool {
                self.0 == 0.0
            }

            pub const fn min(self, rhs: Self) -> Self {
                Self(self.0.min(rhs.0))
            }

            pub const fn max(self, rhs: Self) -> Self {
                Self(self.0.max(rhs.0))
            }
        }

        impl $crate::quantity::Zero for $name {
            const ZERO: Self = Self(0.0);
        }

        impl ::std::convert::From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl ::std::ops::Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl ::std::ops::Div<f64> for $name {
            type Output = Self;

            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl ::std::ops::Div<Self> for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(formatter, "{:.*} {}", $precision, self.0, $suffix)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(formatter, "{:.*}{}", $precision, self.0, $suffix)
            }
        }
    };
}

/// Implement `lhs × rhs = output` in both directions.
macro_rules! implement_mul {
    ($lhs:ty, $rhs:ty, $output:ty) => {
        impl ::std::ops::Mul<$rhs> for $lhs {
            type Output = $output;

            fn mul(self, rhs: $rhs) -> Self::Output {
                <$output>::from(self.0 * rhs.0)
            }
        }

        impl ::std::ops::Mul<$lhs> for $rhs {
            type Output = $output;

            fn mul(self, rhs: $lhs) -> Self::Output {
                <$output>::from(self.0 * rhs.0)
            }
        }
    };
}

/// Implement `numerator / denominator = output`.
macro_rules! implement_div {
    ($numerator:ty, $denominator:ty, $output:ty) => {
        impl ::std::ops::Div<$denominator> for $numerator {
            type Output = $output;

            fn div(self, rhs: $denominator) -> Self::Output {
                <$output>::from(self.0 / rhs.0)
            }
        }
    };
}
