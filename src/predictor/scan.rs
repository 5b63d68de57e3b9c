//! Row-wise differencing and the shifted cumulative scan

/// Difference of each value against the one in the row below it.
///
/// `out[i] = values[i + 1] - values[i]`, and the last row is always 0.
pub fn forward_deltas(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    if !values.is_empty() {
        out.push(0.0);
    }
    out
}

/// Cumulative fold shifted down by one row.
///
/// Row 0 receives `seed`; row i receives the fold of rows `0..i`. The last
/// row's own contribution is never folded.
pub fn shifted_scan<T, A, F>(items: &[T], seed: A, mut step: F) -> Vec<A>
where
    A: Copy,
    F: FnMut(A, &T) -> A,
{
    let mut out = Vec::with_capacity(items.len());
    let mut acc = seed;
    for (i, item) in items.iter().enumerate() {
        out.push(acc);
        if i + 1 < items.len() {
            acc = step(acc, item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_deltas() {
        assert_eq!(forward_deltas(&[1000.0, 1200.0, 1250.0]), vec![200.0, 50.0, 0.0]);
        assert_eq!(forward_deltas(&[7.0]), vec![0.0]);
        assert!(forward_deltas(&[]).is_empty());
    }

    #[test]
    fn test_shifted_scan_excludes_own_row() {
        let sums = shifted_scan(&[1.0, 2.0, 3.0, 4.0], 10.0, |acc, x| acc + x);
        assert_eq!(sums, vec![10.0, 11.0, 13.0, 16.0]);
    }

    #[test]
    fn test_shifted_scan_single_row_is_seed() {
        let mut calls = 0;
        let sums = shifted_scan(&[99.0], 5.0, |acc, x| {
            calls += 1;
            acc + x
        });
        assert_eq!(sums, vec![5.0]);
        assert_eq!(calls, 0);
    }
}
