use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every stat value in the catalog and in [`ComputedModifiers`] uses this
/// type so that composing the same active set always yields the same bits.
///
/// [`ComputedModifiers`]: crate::compose::ComputedModifiers
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only when loading authored data, never
/// inside the compose loop.
///
/// # Panics
///
/// Panics if `v` is NaN, infinite or outside the Q32.32 range. See
/// [`checked_f64_to_fixed64`] for untrusted input.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert an f64 to Fixed64, or `None` if it has no Q32.32 representation.
#[inline]
pub fn checked_f64_to_fixed64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Convert Fixed64 to f64. Use only at the boundary to combat/presentation code.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_round_trips_exact_binary_fractions() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(0.25);
        assert_eq!(fixed64_to_f64(a + b), 1.75);
    }

    #[test]
    fn fixed64_saturates_instead_of_wrapping() {
        let big = Fixed64::MAX;
        let two = f64_to_fixed64(2.0);
        assert_eq!(big.saturating_mul(two), Fixed64::MAX);
        assert_eq!(big.saturating_add(two), Fixed64::MAX);
    }

    #[test]
    fn fixed64_conversion_is_deterministic() {
        let a = f64_to_fixed64(0.85);
        let b = f64_to_fixed64(0.85);
        assert_eq!(a, b);
        assert!((fixed64_to_f64(a) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn checked_conversion_rejects_unrepresentable_values() {
        assert_eq!(checked_f64_to_fixed64(1.25), Some(f64_to_fixed64(1.25)));
        assert_eq!(checked_f64_to_fixed64(f64::NAN), None);
        assert_eq!(checked_f64_to_fixed64(f64::INFINITY), None);
        assert_eq!(checked_f64_to_fixed64(1e30), None);
    }
}
