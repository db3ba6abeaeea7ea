//! Normalized scalar and color values
//!
//! These are the only leaf encodings a [`StyleRecord`](crate::StyleRecord)
//! contains, so equal inputs always produce equal bytes.

use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Largest magnitude that is still written as an integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// A finite number rounded to two decimal places
///
/// `-0` is folded into `0`. Integral values serialize without a fractional
/// part (`12`, not `12.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Scalar(f64);

impl Scalar {
    /// Zero
    pub const ZERO: Self = Self(0.0);

    /// Normalize a raw number
    ///
    /// Returns `None` for NaN and infinities.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // at and above 2^53 every f64 is integral; scaling could overflow
        if value.abs() >= MAX_EXACT_INTEGER {
            return Some(Self(value));
        }
        let rounded = (value * 100.0).round() / 100.0;
        Some(Self(if rounded == 0.0 { 0.0 } else { rounded }))
    }

    /// Normalize an optional raw number, dropping it when it equals `default`
    /// after rounding
    #[must_use]
    pub fn unless_default(value: Option<f64>, default: f64) -> Option<Self> {
        let scalar = Self::new(value?)?;
        let default = Self::new(default)?;
        (scalar != default).then_some(scalar)
    }

    /// Normalize an optional raw number, dropping zero
    #[inline]
    #[must_use]
    pub fn non_zero(value: Option<f64>) -> Option<Self> {
        Self::unless_default(value, 0.0)
    }

    /// Underlying value
    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whether the value is exactly zero
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Scalar {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT_INTEGER {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// An 8-bit-per-channel RGBA color
///
/// Encoded as upper-case `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Build from unit-interval channels (`0.0..=1.0`)
    ///
    /// Each channel is clamped, scaled to 255 and rounded half away from
    /// zero. Non-finite channels become 0.
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
            a: quantize(a),
        }
    }

    /// Whether the alpha channel is at its maximum
    #[inline]
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }

    /// Canonical hex encoding
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(channel: f64) -> u8 {
    if !channel.is_finite() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
