/// A sparse vector of `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Builds a vector from pairs in any order. Duplicate indices are summed
    /// and zero weights dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut entries: Vec<(u32, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|&(i, _)| i);
        let mut merged: Vec<(u32, f64)> = Vec::with_capacity(entries.len());
        for (i, w) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == i => *acc += w,
                _ => merged.push((i, w)),
            }
        }
        merged.retain(|&(_, w)| w != 0.0);
        Self { entries: merged }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of term `index`, zero if absent.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (self.entries.iter(), other.entries.iter());
        let (mut x, mut y) = (a.next(), b.next());
        let mut dot = 0.0;
        while let (Some(&(i, wi)), Some(&(j, wj))) = (x, y) {
            if i == j {
                dot += wi * wj;
                x = a.next();
                y = b.next();
            } else if i < j {
                x = a.next();
            } else {
                y = b.next();
            }
        }
        dot
    }

    /// Dot product with a dense vector. Indices past its end count as zero.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, w)| dense.get(i as usize).map(|d| w * d))
            .sum()
    }

    pub fn norm_sq(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum()
    }

    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Adds `scale × self` into `dense`, growing it as needed.
    pub fn add_to(&self, dense: &mut Vec<f64>, scale: f64) {
        if let Some(&(max, _)) = self.entries.last() {
            if dense.len() <= max as usize {
                dense.resize(max as usize + 1, 0.0);
            }
        }
        for &(i, w) in &self.entries {
            dense[i as usize] += w * scale;
        }
    }

    /// Scales the vector to unit length. Zero vectors stay zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_merges_and_sorts() {
        let v = SparseVector::from_pairs([(3, 1.0), (1, 2.0), (3, 1.5), (2, 0.0)]);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 2.5)]);
        assert_eq!(v.get(3), 2.5);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.nnz(), 2);
    }

    #[test]
    fn test_dot_products() {
        let a = SparseVector::from_pairs([(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_pairs([(2, 4.0), (5, 1.0), (7, 9.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot_dense(&[1.0, 0.0, 0.5]), 2.0);
    }

    #[test]
    fn test_normalize_and_accumulate() {
        let mut v = SparseVector::from_pairs([(0, 3.0), (1, 4.0)]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-12);

        let mut dense = Vec::new();
        v.add_to(&mut dense, 2.0);
        assert_eq!(dense.len(), 2);
        assert!((dense[0] - 1.2).abs() < 1e-12);
        assert!((dense[1] - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let mut v = SparseVector::default();
        v.normalize();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }
}
