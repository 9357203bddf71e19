#![deny(clippy::pedantic)]
#![no_std]

//! Checked `f64` newtypes for model parameters and node heights.

use core::{cmp::Ordering, convert::TryFrom, fmt, ops::Add};

use serde::{Deserialize, Serialize};

macro_rules! bounded_f64 {
    ($(#[$meta:meta])* $name:ident, $error:ident, |$x:ident| $check:expr, $range:literal) => {
        #[derive(Debug)]
        pub struct $error(f64);

        impl fmt::Display for $error {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, concat!("{} is not in ", $range, "."), self.0)
            }
        }

        $(#[$meta])*
        #[derive(Copy, Clone, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            #[doc = concat!("# Errors\n\nReturns `", stringify!($error), "` unless `value` is in ", $range, ".")]
            pub fn new(value: f64) -> Result<Self, $error> {
                let $x = value;

                if $check {
                    Ok(Self(value))
                } else {
                    Err($error(value))
                }
            }

            #[doc = concat!("# Safety\n\n`value` must be in ", $range, ".")]
            #[must_use]
            pub const unsafe fn new_unchecked(value: f64) -> Self {
                Self(value)
            }

            #[must_use]
            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl TryFrom<f64> for $name {
            type Error = $error;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, concat!(stringify!($name), "({:?} in ", $range, ")"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, fmt)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.eq(&other.0)
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0.eq(other)
            }
        }
    };
}

bounded_f64! {
    /// Probability in `[0.0, 1.0]`.
    ClosedUnitF64, ClosedUnitF64Error, |x| (0.0..=1.0).contains(&x), "[0.0, 1.0]"
}

bounded_f64! {
    /// Rate, scale or population size.
    PositiveF64, PositiveF64Error, |x| x > 0.0, "(0.0, inf]"
}

bounded_f64! {
    /// Node height, measured backwards from the present.
    NonNegativeF64, NonNegativeF64Error, |x| x >= 0.0, "[0.0, inf]"
}

impl ClosedUnitF64 {
    #[must_use]
    pub fn one_minus(self) -> Self {
        Self(1.0_f64 - self.0)
    }
}

impl PositiveF64 {
    #[must_use]
    pub fn one() -> Self {
        Self(1.0_f64)
    }
}

impl NonNegativeF64 {
    #[must_use]
    pub fn zero() -> Self {
        Self(0.0_f64)
    }
}

impl From<PositiveF64> for NonNegativeF64 {
    fn from(value: PositiveF64) -> Self {
        Self(value.0)
    }
}

impl Add for NonNegativeF64 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

#[cfg(test)]
mod tests;
