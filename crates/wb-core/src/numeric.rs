use crate::CoreError;

/// Scores, gaps and raw observations.
pub type Real = f64;

/// Absolute and relative slack for comparing stored scores.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True when `a` and `b` differ by at most `tol.abs`, or by at most
/// `tol.rel` of the larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Round to one decimal place, ties to even (matches the published table).
pub fn round1(v: Real) -> Real {
    (v * 10.0).round_ties_even() / 10.0
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<Real>() / values.len() as Real)
}

/// Minimum and maximum of a slice; `None` for an empty slice.
pub fn min_max(values: &[Real]) -> Option<(Real, Real)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Pearson correlation between two equally long series.
///
/// Returns `None` when fewer than two pairs exist or either series has
/// zero variance (the coefficient is undefined there).
pub fn pearson(xs: &[Real], ys: &[Real]) -> Option<Real> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx <= 0.0 || vy <= 0.0 {
        return None;
    }
    let r = cov / (vx.sqrt() * vy.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Fractional ranks (1-based) with ties sharing the average of their positions.
pub fn average_ranks(values: &[Real]) -> Vec<Real> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end (0-based) share rank mean(start+1 ..= end)
        let shared = (start + 1 + end) as Real / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_decimal_scores_compare_with_absolute_slack() {
        let tol = Tolerances { abs: 1e-9, rel: 0.0 };
        assert!(nearly_equal(0.1 + 0.2, 0.3, tol));
        assert!(nearly_equal(72.4, 72.4 + 1e-12, tol));
        assert!(!nearly_equal(72.4, 72.5, tol));
    }

    #[test]
    fn ensure_finite_names_the_column() {
        assert_eq!(ensure_finite(-3.2, "gap").unwrap(), -3.2);
        let err = ensure_finite(Real::INFINITY, "gap").unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { what: "gap", .. }));
    }

    #[test]
    fn round1_ties_to_even() {
        assert_eq!(round1(12.25), 12.2);
        assert_eq!(round1(12.75), 12.8);
        assert_eq!(round1(-3.04), -3.0);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn pearson_perfect_and_undefined() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!(nearly_equal(r, 1.0, Tolerances::default()));

        let inv = [8.0, 6.0, 4.0, 2.0];
        let r = pearson(&xs, &inv).unwrap();
        assert!(nearly_equal(r, -1.0, Tolerances::default()));

        assert!(pearson(&xs, &[5.0, 5.0, 5.0, 5.0]).is_none());
        assert!(pearson(&[1.0], &[1.0]).is_none());
    }

    #[test]
    fn average_ranks_share_ties() {
        let ranks = average_ranks(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
    }

    #[test]
    fn mean_and_min_max_empty() {
        assert!(mean(&[]).is_none());
        assert!(min_max(&[]).is_none());
        assert_eq!(min_max(&[2.0, -1.0, 5.0]), Some((-1.0, 5.0)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ranks_sum_to_triangular_number(values in prop::collection::vec(-1.0e3_f64..1.0e3_f64, 1..40)) {
            let ranks = average_ranks(&values);
            let n = values.len() as Real;
            let sum: Real = ranks.iter().sum();
            let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
            prop_assert!(nearly_equal(sum, n * (n + 1.0) / 2.0, tol));
            for &r in &ranks {
                prop_assert!(r >= 1.0 && r <= n);
            }
        }

        #[test]
        fn pearson_stays_in_unit_interval(
            pairs in prop::collection::vec((-1.0e3_f64..1.0e3_f64, -1.0e3_f64..1.0e3_f64), 2..30)
        ) {
            let xs: Vec<Real> = pairs.iter().map(|p| p.0).collect();
            let ys: Vec<Real> = pairs.iter().map(|p| p.1).collect();
            if let Some(r) = pearson(&xs, &ys) {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}
