//! Stacking penalty math. Within one multiplicative operator class, the
//! penalized factors are ordered most-favourable-first and the i-th one is
//! attenuated by `exp(-(i / 2.67)^2)`; non-penalized factors apply in
//! full and are handled by the resolver directly.

/// Denominator of the attenuation exponent.
pub const PENALTY_SCALE: f64 = 2.67;

/// Attenuation applied to the i-th penalized factor of a chain.
pub fn penalty_factor(position: usize) -> f64 {
    let x = position as f64 / PENALTY_SCALE;
    (-x * x).exp()
}

/// Fold a chain of penalized multiplicative factors into `value`.
///
/// `high_is_good` decides which end of the chain is "most favourable":
/// the largest factor when higher values win, the smallest otherwise.
pub fn apply_penalized_chain(value: f64, mut factors: Vec<f64>, high_is_good: bool) -> f64 {
    if high_is_good {
        factors.sort_by(|a, b| b.total_cmp(a));
    } else {
        factors.sort_by(|a, b| a.total_cmp(b));
    }
    factors
        .into_iter()
        .enumerate()
        .fold(value, |acc, (i, factor)| {
            acc * (1.0 + (factor - 1.0) * penalty_factor(i))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "expected {b}, got {a}");
    }

    #[test]
    fn first_factor_applies_in_full() {
        approx_eq(penalty_factor(0), 1.0, 0.0);
        approx_eq(apply_penalized_chain(100.0, vec![1.25], true), 125.0, 1e-12);
    }

    #[test]
    fn second_factor_is_attenuated() {
        let second = penalty_factor(1);
        approx_eq(second, 0.8691199808003975, 1e-15);
        let v = apply_penalized_chain(1.0, vec![1.235, 1.10], true);
        approx_eq(v, 1.235 * (1.0 + 0.10 * second), 1e-15);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = apply_penalized_chain(10.0, vec![1.10, 1.235, 1.05], true);
        let b = apply_penalized_chain(10.0, vec![1.235, 1.05, 1.10], true);
        approx_eq(a, b, 1e-12);
    }

    #[test]
    fn low_is_good_favours_the_reducing_factor() {
        // For a "lower wins" attribute the 0.8 reduction must lead the
        // chain and the 0.9 reduction be attenuated.
        let v = apply_penalized_chain(1.0, vec![0.9, 0.8], false);
        approx_eq(v, 0.8 * (1.0 - 0.1 * penalty_factor(1)), 1e-15);
    }
}
