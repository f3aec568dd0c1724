//! Ordinal scale generator
//!
//! Spacing and size tokens are stored as small signed steps rather than
//! absolute values. A step is turned into a magnitude by a geometric
//! progression over the theme's core parameters: step 0 is the base size,
//! each step up multiplies by the ratio, each step down divides.

use maquette_core::Dim;

use crate::theme::ScaleBase;

/// Magnitude of a step on the geometric progression
pub fn magnitude(step: i32, base: &ScaleBase) -> f32 {
    base.size * base.ratio.powi(step)
}

/// Magnitude of a step, expressed in the scale's configured unit
pub fn dim(step: i32, base: &ScaleBase) -> Dim {
    Dim::new(magnitude(step, base), base.unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maquette_core::Unit;

    fn base() -> ScaleBase {
        ScaleBase {
            size: 16.0,
            ratio: 1.25,
            unit: Unit::Px,
        }
    }

    #[test]
    fn test_step_zero_is_base_size() {
        assert_eq!(magnitude(0, &base()), 16.0);
    }

    #[test]
    fn test_positive_steps_multiply() {
        assert!((magnitude(1, &base()) - 20.0).abs() < 1e-4);
        assert!((magnitude(2, &base()) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_steps_divide() {
        assert!((magnitude(-1, &base()) - 12.8).abs() < 1e-4);
    }

    #[test]
    fn test_dim_carries_scale_unit() {
        let d = dim(0, &base());
        assert_eq!(d.unit, Unit::Px);
        assert_eq!(d.value, 16.0);
    }
}
