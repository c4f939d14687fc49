//! Water-filling cap solver
//!
//! Finds the cap `x` with `Σ min(pᵢ, x) = min(T, Σ pᵢ)`. Large contributors
//! are capped first, so nobody is charged more than a smaller contributor
//! once the target is covered.

use tracing::debug;

use crate::models::money::{is_positive_amount, round_solver_precision};

/// Solve for the dynamic cap
///
/// Non-positive or non-finite contributions are ignored. A non-positive or
/// non-finite target, or no usable contributions, yields 0.
pub fn solve_cap(target: f64, contributions: &[f64]) -> f64 {
    if !is_positive_amount(target) {
        return 0.0;
    }

    let mut sorted: Vec<f64> = contributions
        .iter()
        .copied()
        .filter(|c| is_positive_amount(*c))
        .collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let total: f64 = sorted.iter().sum();
    let effective = target.min(total);
    if effective <= 0.0 {
        return 0.0;
    }

    let n = sorted.len();
    let mut cumsum = 0.0;
    for (k, contribution) in sorted.iter().enumerate() {
        let remain = (n - k) as f64;
        let candidate = (effective - cumsum) / remain;
        debug!(step = k, cumsum, candidate, contribution, "water-filling step");
        if candidate <= *contribution {
            return round_solver_precision(candidate);
        }
        cumsum += contribution;
    }

    // Every contribution was absorbed in full
    round_solver_precision(sorted[n - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_payers_split_target() {
        assert_eq!(solve_cap(500.0, &[2000.0, 1333.0]), 250.0);
        assert_eq!(solve_cap(500.0, &[1333.0, 2000.0]), 250.0);
    }

    #[test]
    fn test_target_above_total_returns_largest() {
        let contributions = [2000.0, 2000.0, 700.0, 700.0, 700.0, 700.0, 700.0];
        assert_eq!(solve_cap(9000.0, &contributions), 2000.0);
    }

    #[test]
    fn test_small_contributor_sets_cap() {
        assert_eq!(solve_cap(3000.0, &[1000.0, 2000.0, 3000.0]), 1000.0);
    }

    #[test]
    fn test_partial_capping() {
        // 100 is absorbed, the remaining 500 is split between the other two
        assert_eq!(solve_cap(600.0, &[100.0, 400.0, 1000.0]), 250.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(solve_cap(0.0, &[100.0]), 0.0);
        assert_eq!(solve_cap(-5.0, &[100.0]), 0.0);
        assert_eq!(solve_cap(f64::NAN, &[100.0]), 0.0);
        assert_eq!(solve_cap(f64::INFINITY, &[100.0]), 0.0);
        assert_eq!(solve_cap(100.0, &[]), 0.0);
        assert_eq!(solve_cap(100.0, &[0.0, -10.0, f64::NAN]), 0.0);
    }

    #[test]
    fn test_invalid_contributions_ignored() {
        assert_eq!(solve_cap(500.0, &[2000.0, f64::NAN, 1333.0, -1.0]), 250.0);
    }

    #[test]
    fn test_six_decimal_precision() {
        assert_eq!(solve_cap(100.0, &[50.0, 50.0, 50.0]), 33.333333);
    }
}
