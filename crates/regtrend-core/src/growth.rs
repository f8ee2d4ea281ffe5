/// Period-over-period percent change, `(curr - prev) / prev * 100`.
///
/// The first element has no predecessor and is `None`. A zero predecessor
/// also yields `None` rather than an infinity.
///
/// # Examples
///
/// ```
/// use regtrend_core::growth::pct_change;
///
/// assert_eq!(
///     pct_change(&[100.0, 150.0, 120.0]),
///     vec![None, Some(50.0), Some(-20.0)]
/// );
/// ```
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &curr in values {
        out.push(match prev {
            Some(p) if p != 0.0 => Some((curr - p) / p * 100.0),
            _ => None,
        });
        prev = Some(curr);
    }
    out
}

/// Growth column of the year pivots: last year against the year before.
///
/// A zero `prev` is replaced by `1`, so the result degrades to the raw
/// difference times 100 instead of failing. Kept for parity with the
/// published dashboards; it is not a true percent change in that case.
///
/// # Examples
///
/// ```
/// use regtrend_core::growth::pivot_growth;
///
/// assert_eq!(pivot_growth(200.0, 250.0), 25.0);
/// assert_eq!(pivot_growth(0.0, 10.0), 1000.0);
/// ```
pub fn pivot_growth(prev: f64, curr: f64) -> f64 {
    let denom = if prev == 0.0 { 1.0 } else { prev };
    (curr - prev) / denom * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_change_yearly_example() {
        let g = pct_change(&[100.0, 150.0, 120.0]);
        assert_eq!(g.len(), 3);
        assert!(g[0].is_none());
        assert!((g[1].unwrap() - 50.0).abs() < 1e-9);
        assert!((g[2].unwrap() + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change_empty_and_single() {
        assert!(pct_change(&[]).is_empty());
        assert_eq!(pct_change(&[42.0]), vec![None]);
    }

    #[test]
    fn test_pct_change_zero_predecessor_is_undefined() {
        assert_eq!(pct_change(&[0.0, 10.0, 20.0]), vec![None, None, Some(100.0)]);
    }

    #[test]
    fn test_pivot_growth_zero_guard() {
        assert!((pivot_growth(0.0, 10.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_growth_regular() {
        assert!((pivot_growth(80.0, 60.0) + 25.0).abs() < 1e-9);
        assert_eq!(pivot_growth(0.0, 0.0), 0.0);
    }
}
