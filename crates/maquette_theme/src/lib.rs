//! Maquette Theme Model
//!
//! A theme is a named bundle of design tokens grouped into sections
//! (swatches, font presets, sizes, gaps, corners) plus the core parameters
//! of the ordinal scale. Property values reference tokens indirectly as
//! `@section.key`; the value resolver looks the payload up in whichever
//! theme is in effect for the node.
//!
//! # Themes
//!
//! - **Stock themes** (`paper` light, `ink` dark) are immutable, defined in
//!   code, and share one token-key vocabulary so swapping between them
//!   never drops a reference.
//! - The single **custom theme** lives on the document and is the only
//!   theme the mutation engine edits. Custom swatches use the reserved
//!   `custom<N>` key space with monotonically increasing suffixes.
//!
//! # Ordinal scale
//!
//! Ordinal tokens whose payload is a step descriptor are turned into
//! magnitudes by the [`scale`] module: a geometric progression over the
//! theme's `size`/`ratio` core parameters, expressed in the theme's
//! configured unit.
//!
//! Unlike a runtime theming layer there is no global state here: every
//! function takes the theme it operates on as an explicit parameter.

pub mod scale;
pub mod stock;
pub mod theme;
pub mod token;

pub use stock::{default_theme_id, stock_theme, stock_themes};
pub use theme::{FontSpec, ScaleBase, SectionName, Theme, ThemeId, TokenPayload};
pub use token::{TokenRef, TokenRefParseError};

/// Reserved key prefix for user-created swatches
pub const CUSTOM_SWATCH_PREFIX: &str = "custom";
