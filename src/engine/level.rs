//! Inversion of the game's cubic experience curve.
//!
//! Experience required to reach level L is
//! `E(L) = (50(L-1)^3 - 150(L-1)^2 + 400(L-1)) / 3`, strictly increasing for
//! L >= 1, so the inverse is unique. A closed-form cubic inverse loses
//! precision for the experience magnitudes at the top of the table, so the
//! estimate is refined iteratively instead.

/// Absolute tolerance in experience units.
const EXP_TOLERANCE: f64 = 0.1;
const NEWTON_MAX_ITERATIONS: usize = 50;
const BISECTION_MAX_ITERATIONS: usize = 100;
/// A single Newton step never moves the level by more than this.
const MAX_NEWTON_STEP: f64 = 10.0;

/// Experience required to reach `level` (forward curve). `E(1) = 0`.
pub fn experience_for_level(level: f64) -> f64 {
    let l = level - 1.0;
    (50.0 * l * l * l - 150.0 * l * l + 400.0 * l) / 3.0
}

/// Derivative of the forward curve, positive for all level >= 1.
fn experience_slope(level: f64) -> f64 {
    let l = level - 1.0;
    (150.0 * l * l - 300.0 * l + 400.0) / 3.0
}

/// Continuous level whose required experience matches `experience`.
///
/// Newton-Raphson from a dominant-term seed, falling back to bisection when
/// the refinement fails to converge. Both stages are iteration-capped, so a
/// call always terminates; the result is best-effort within
/// [`EXP_TOLERANCE`] whenever the tolerance is reachable at f64 precision.
pub fn estimate_level(experience: u64) -> f64 {
    if experience == 0 {
        return 1.0;
    }
    let target = experience as f64;

    // Seed from the cubic's dominant term: E(L) ~ 50(L-1)^3 / 3.
    let seed = (3.0 * target / 50.0).cbrt() + 1.0;
    let mut level = seed.max(1.0);

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let error = experience_for_level(level) - target;
        if error.abs() < EXP_TOLERANCE {
            return level;
        }
        let slope = experience_slope(level);
        if slope == 0.0 {
            break;
        }
        let step = (error / slope).clamp(-MAX_NEWTON_STEP, MAX_NEWTON_STEP);
        level = (level - step).max(1.0);
    }

    bisect(target, level)
}

fn bisect(target: f64, newton_level: f64) -> f64 {
    let mut low = 1.0_f64;
    let mut high = (2.0 * newton_level).max(1000.0);

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let error = experience_for_level(mid) - target;
        if error.abs() < EXP_TOLERANCE {
            return mid;
        }
        if error < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    (low + high) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_experience_is_level_one() {
        assert_eq!(estimate_level(0), 1.0);
    }

    #[test]
    fn forward_curve_anchors() {
        assert_eq!(experience_for_level(1.0), 0.0);
        // E(2) = (50 - 150 + 400) / 3 = 100
        assert!((experience_for_level(2.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn inverts_forward_curve_for_integer_levels() {
        for level in [2u32, 3, 8, 20, 77, 150, 400, 1000] {
            let exp = experience_for_level(level as f64).round() as u64;
            let estimated = estimate_level(exp);
            let back = experience_for_level(estimated);
            // Rounding the forward value costs at most 0.5 on top of the
            // solver tolerance.
            assert!(
                (back - exp as f64).abs() < 0.6,
                "level {level}: estimated {estimated}, experience error {}",
                back - exp as f64
            );
        }
    }

    #[test]
    fn monotone_over_increasing_experience() {
        let mut previous = 0.0;
        for exp in [0u64, 1, 50, 100, 5_000, 1_000_000, 400_000_000, 2_000_000_000_000] {
            let level = estimate_level(exp);
            assert!(
                level >= previous,
                "estimate_level({exp}) = {level} dropped below {previous}"
            );
            previous = level;
        }
    }

    #[test]
    fn extreme_experience_stays_bounded_and_close() {
        let exp = 500_000_000_000_000u64;
        let level = estimate_level(exp);
        assert!(level.is_finite() && level >= 1.0);
        let relative_error = (experience_for_level(level) - exp as f64).abs() / exp as f64;
        assert!(relative_error < 1e-9);
    }
}
