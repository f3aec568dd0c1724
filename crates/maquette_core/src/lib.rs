//! Maquette Core Primitives
//!
//! This crate provides the foundational value types shared by the rest of
//! the Maquette document core:
//!
//! - **Colors**: linear RGBA colors with hex parsing and formatting
//! - **Dimensional values**: unit-tagged magnitudes (`px`, `rem`, `%`) and
//!   two-axis pairs for properties like background position/size
//! - **Structural tiers**: the `Level` ordering that constrains nesting
//!   (primitive < element < module < screen)
//!
//! Everything here is a plain immutable value. Document structure, themes
//! and resolution live in the crates layered on top.

pub mod color;
pub mod level;
pub mod value;

pub use color::{Color, ColorParseError};
pub use level::Level;
pub use value::{AxisPair, Dim, Unit};
