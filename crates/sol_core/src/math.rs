//! Fixed-point math utilities for deterministic simulation.
//!
//! Garrisons, production rates, ratios and fleet progress are all
//! fixed-point. Floating-point accumulation of fractional production
//! rates would make two runs with the same seed drift apart on
//! different CPUs.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for human-authored fixed-point values.
///
/// Level files are written by hand, so they carry plain decimals
/// (`productionRate: 1.5`) rather than raw bits. Values are converted
/// once at load time and never touch floats again.
pub mod decimal_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_num::<f64>().serialize(serializer)
    }

    /// Deserialize a fixed-point number from a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(value)
            .ok_or_else(|| serde::de::Error::custom(format!("value {value} out of range")))
    }
}

/// Build a fixed-point fraction from a whole percentage.
///
/// `percent(50)` is exactly one half.
#[must_use]
pub fn percent(value: i32) -> Fixed {
    Fixed::from_num(value) / Fixed::from_num(100)
}

/// Floor a non-negative fixed-point amount to a whole fleet count.
///
/// Negative inputs yield 0, values above `u32::MAX` saturate.
#[must_use]
pub fn floor_count(value: Fixed) -> u32 {
    if value <= Fixed::ZERO {
        return 0;
    }
    value.floor().saturating_to_num::<u32>()
}

/// Widen a whole fleet count into fixed-point.
#[must_use]
pub fn from_count(count: u32) -> Fixed {
    Fixed::saturating_from_num(count)
}
