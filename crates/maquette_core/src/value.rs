//! Unit-tagged dimensional values
//!
//! A `Dim` is a magnitude plus the unit it is expressed in. The document
//! core only deals in the three units the editor can resolve without a
//! viewport (`px`, `rem`, `%`); viewport-relative units are rejected at the
//! grammar level.

use serde::{Deserialize, Serialize};

/// Length unit for dimensional property values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Rem,
    #[serde(rename = "%")]
    Percent,
}

impl Unit {
    /// Canonical lowercase suffix as it appears in value strings
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Percent => "%",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A single-axis dimensional value: magnitude + unit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dim {
    pub value: f32,
    pub unit: Unit,
}

impl Dim {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn rem(value: f32) -> Self {
        Self::new(value, Unit::Rem)
    }

    pub const fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// Scale the magnitude, keeping the unit
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.value * factor, self.unit)
    }
}

impl std::fmt::Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Trim trailing zeros so "10px" round-trips as "10px", not "10.0px"
        if self.value.fract() == 0.0 {
            write!(f, "{}{}", self.value as i64, self.unit)
        } else {
            write!(f, "{}{}", self.value, self.unit)
        }
    }
}

/// Two independently unit-tagged axes (background position/size)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    pub x: Dim,
    pub y: Dim,
}

impl AxisPair {
    pub const fn new(x: Dim, y: Dim) -> Self {
        Self { x, y }
    }

    /// Uniform pair with the same value on both axes
    pub const fn splat(dim: Dim) -> Self {
        Self { x: dim, y: dim }
    }
}

impl std::fmt::Display for AxisPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}
