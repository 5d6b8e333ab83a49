use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::JenksError;

/// How a large dataset is reduced before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    /// Random distinct elements, always keeping the minimum and maximum.
    Random,
    /// Means of contiguous chunks of the sorted data, between the minimum
    /// and maximum.
    #[default]
    Average,
}

/// Returns `classes + 1` ascending breaks from `min(data)` to `max(data)`.
///
/// Class `i` holds the values in `(breaks[i], breaks[i + 1]]`; the first
/// class also holds `breaks[0]`.
///
/// # Errors
///
/// [`JenksError::InsufficientData`] unless `data` holds at least
/// `classes + 1` distinct values.
pub fn natural_breaks(data: &[f64], classes: usize) -> Result<Vec<f64>, JenksError> {
    if classes == 0 {
        return Err(JenksError::InvalidClasses);
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    breaks_sorted(&sorted, classes)
}

/// Like [`natural_breaks`], but classifies a representative subset of
/// about `size` values when `data` is larger than that.
pub fn natural_breaks_subset<R: Rng + ?Sized>(
    data: &[f64],
    classes: usize,
    size: usize,
    strategy: Subset,
    rng: &mut R,
) -> Result<Vec<f64>, JenksError> {
    if classes == 0 {
        return Err(JenksError::InvalidClasses);
    }
    let min_size = match strategy {
        Subset::Random => 2,
        Subset::Average => 3,
    };
    if size < min_size {
        return Err(JenksError::InvalidSubset { size, strategy });
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    if size < sorted.len() {
        sorted = match strategy {
            Subset::Random => random_subset(&sorted, size, rng),
            Subset::Average => average_subset(&sorted, size),
        };
    }
    breaks_sorted(&sorted, classes)
}

fn random_subset<R: Rng + ?Sized>(sorted: &[f64], size: usize, rng: &mut R) -> Vec<f64> {
    let n = sorted.len();
    let mut out = Vec::with_capacity(size);
    out.push(sorted[0]);
    out.push(sorted[n - 1]);
    for i in index::sample(rng, n - 2, size - 2) {
        out.push(sorted[i + 1]);
    }
    out.sort_by(f64::total_cmp);
    out
}

fn average_subset(sorted: &[f64], size: usize) -> Vec<f64> {
    let n = sorted.len();
    let chunk = ((n - 2) / (size - 2)).max(1);
    let mut out = vec![sorted[0]];
    let mut i = 1;
    while i < n {
        let len = (n - i - 1).min(chunk);
        if len == 0 {
            break;
        }
        let sum: f64 = sorted[i..i + len].iter().sum();
        out.push(sum / len as f64);
        i += chunk;
    }
    out.push(sorted[n - 1]);
    out
}

/// Fisher-Jenks dynamic program over sorted data.
fn breaks_sorted(data: &[f64], classes: usize) -> Result<Vec<f64>, JenksError> {
    let distinct = count_distinct(data);
    if distinct < classes + 1 {
        return Err(JenksError::InsufficientData {
            distinct,
            required: classes + 1,
        });
    }

    let n = data.len();
    // Rows and columns are 1-based; row 0 and column 0 are padding.
    let mut lower = vec![vec![1usize; classes + 1]; n + 1];
    let mut var = vec![vec![0.0f64; classes + 1]; n + 1];
    for row in var.iter_mut().skip(2) {
        for v in row.iter_mut().skip(1) {
            *v = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut variance = 0.0;
        for m in 1..=l {
            let lower_limit = l - m + 1;
            let val = data[lower_limit - 1];
            let w = m as f64;
            sum += val;
            sum_sq += val * val;
            variance = sum_sq - sum * sum / w;
            let prev = lower_limit - 1;
            if prev != 0 {
                for j in 2..=classes {
                    let candidate = variance + var[prev][j - 1];
                    if var[l][j] >= candidate {
                        lower[l][j] = lower_limit;
                        var[l][j] = candidate;
                    }
                }
            }
        }
        lower[l][1] = 1;
        var[l][1] = variance;
    }

    let mut breaks = vec![0.0; classes + 1];
    breaks[0] = data[0];
    breaks[classes] = data[n - 1];
    let mut k = n;
    for c in (2..=classes).rev() {
        let limit = lower[k][c];
        breaks[c - 1] = data[limit.saturating_sub(2)];
        k = limit.saturating_sub(1).max(1);
    }
    Ok(breaks)
}

fn count_distinct(sorted: &[f64]) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;
    for &v in sorted {
        if last != Some(v) {
            count += 1;
            last = Some(v);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_three_groups() {
        let data = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0];
        assert_eq!(natural_breaks(&data, 3).unwrap(), vec![1.0, 3.0, 12.0, 22.0]);
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let data = [22.0, 1.0, 12.0, 3.0, 21.0, 2.0, 10.0, 11.0, 20.0];
        assert_eq!(natural_breaks(&data, 3).unwrap(), vec![1.0, 3.0, 12.0, 22.0]);
    }

    #[test]
    fn test_skewed_counts() {
        let data = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 5.0, 8.0, 13.0, 40.0];
        assert_eq!(natural_breaks(&data, 4).unwrap(), vec![1.0, 3.0, 8.0, 13.0, 40.0]);
        let data = [1.0, 1.0, 1.0, 2.0, 3.0, 6.0, 10.0, 20.0, 40.0];
        assert_eq!(natural_breaks(&data, 5).unwrap(), vec![1.0, 3.0, 6.0, 10.0, 20.0, 40.0]);
    }

    #[test]
    fn test_ties_resolve_like_reference() {
        let data = [1.0, 2.0, 4.0, 5.0, 7.0];
        assert_eq!(natural_breaks(&data, 2).unwrap(), vec![1.0, 2.0, 7.0]);
        let data = [1.0, 1.0, 2.0, 2.0, 3.0, 8.0, 9.0, 15.0, 16.0, 30.0];
        assert_eq!(natural_breaks(&data, 5).unwrap(), vec![1.0, 1.0, 3.0, 9.0, 16.0, 30.0]);
    }

    #[test]
    fn test_single_class_spans_range() {
        assert_eq!(natural_breaks(&[4.0, 4.0, 4.0, 4.0, 9.0], 1).unwrap(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_too_few_distinct_values() {
        let err = natural_breaks(&[1.0, 1.0, 2.0, 2.0], 2).unwrap_err();
        assert_eq!(err, JenksError::InsufficientData { distinct: 2, required: 3 });
        assert_eq!(natural_breaks(&[], 1).unwrap_err(), JenksError::InsufficientData { distinct: 0, required: 2 });
        assert_eq!(natural_breaks(&[1.0, 2.0], 0).unwrap_err(), JenksError::InvalidClasses);
    }

    #[test]
    fn test_average_subset_chunks() {
        let data: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(
            average_subset(&data, 8),
            vec![1.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 20.0]
        );
        let fib = [1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0];
        assert_eq!(average_subset(&fib, 5), vec![1.0, 1.5, 4.0, 10.5, 27.5, 55.0]);
    }

    #[test]
    fn test_average_subset_breaks() {
        let data: Vec<f64> = (1..=20).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let breaks = natural_breaks_subset(&data, 3, 8, Subset::Average, &mut rng).unwrap();
        assert_eq!(breaks, vec![1.0, 6.0, 12.0, 20.0]);
    }

    #[test]
    fn test_random_subset_keeps_extremes() {
        let data: Vec<f64> = (0..500).map(|i| f64::from(i % 97) + f64::from(i) / 1000.0).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let subset = random_subset(&{
            let mut s = data.clone();
            s.sort_by(f64::total_cmp);
            s
        }, 50, &mut rng);
        assert_eq!(subset.len(), 50);
        assert!(subset.windows(2).all(|w| w[0] <= w[1]));

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(subset[0], min);
        assert_eq!(subset[49], max);

        let breaks = natural_breaks_subset(&data, 4, 50, Subset::Random, &mut rng).unwrap();
        assert_eq!(breaks.len(), 5);
        assert_eq!(breaks[0], min);
        assert_eq!(breaks[4], max);
        assert!(breaks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_subset_larger_than_data_is_ignored() {
        let data = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0];
        let mut rng = StdRng::seed_from_u64(0);
        let breaks = natural_breaks_subset(&data, 3, 5000, Subset::Average, &mut rng).unwrap();
        assert_eq!(breaks, vec![1.0, 3.0, 12.0, 22.0]);
    }

    #[test]
    fn test_invalid_subset_size() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = natural_breaks_subset(&[1.0, 2.0, 3.0], 1, 2, Subset::Average, &mut rng).unwrap_err();
        assert_eq!(err, JenksError::InvalidSubset { size: 2, strategy: Subset::Average });
    }

    #[test]
    fn test_breaks_are_ordered_and_span_data() {
        let mut rng = StdRng::seed_from_u64(5);
        for classes in 1..6 {
            let data: Vec<f64> = (0..60).map(|_| rng.gen_range(1..200) as f64).collect();
            let breaks = natural_breaks(&data, classes).unwrap();
            assert_eq!(breaks.len(), classes + 1);
            assert!(breaks.windows(2).all(|w| w[0] <= w[1]), "{breaks:?}");
            assert_eq!(breaks[0], data.iter().copied().fold(f64::INFINITY, f64::min));
            assert_eq!(breaks[classes], data.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        }
    }
}
