use floodlens_vecspace::SparseVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Controls k-means behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters. Default: 2.
    pub k: usize,

    /// Independent seeded runs; the lowest inertia wins. Default: 10.
    pub n_init: usize,

    /// Lloyd iterations per run. Default: 300.
    pub max_iter: usize,

    /// Convergence tolerance relative to the mean feature variance.
    /// Default: 1e-4.
    pub tol: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

impl KMeansConfig {
    pub fn with_defaults(mut self) -> Self {
        let d = Self::default();
        if self.k == 0 {
            self.k = d.k;
        }
        if self.n_init == 0 {
            self.n_init = d.n_init;
        }
        if self.max_iter == 0 {
            self.max_iter = d.max_iter;
        }
        if self.tol <= 0.0 {
            self.tol = d.tol;
        }
        self
    }
}

/// Outcome of the best k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster index per input row.
    pub labels: Vec<usize>,

    /// Dense centroids, one per cluster.
    pub centroids: Vec<Vec<f64>>,

    /// Sum of squared distances of rows to their centroid.
    pub inertia: f64,

    /// Lloyd iterations of the winning run.
    pub iterations: usize,
}

/// K-means over sparse rows with greedy k-means++ seeding.
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    cfg: KMeansConfig,
}

impl KMeans {
    pub fn new(cfg: KMeansConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
        }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.cfg
    }

    /// Clusters `rows` of dimension `dim`.
    ///
    /// With no more rows than clusters every row gets its own label.
    pub fn fit<R: Rng + ?Sized>(&self, rows: &[SparseVector], dim: usize, rng: &mut R) -> KMeansResult {
        let n = rows.len();
        let k = self.cfg.k;
        if n <= k {
            return KMeansResult {
                labels: (0..n).collect(),
                centroids: rows.iter().map(|r| dense(r, dim)).collect(),
                inertia: 0.0,
                iterations: 0,
            };
        }

        let norms: Vec<f64> = rows.iter().map(SparseVector::norm_sq).collect();
        let tol = self.cfg.tol * mean_variance(rows, dim);

        let mut best: Option<KMeansResult> = None;
        for _ in 0..self.cfg.n_init {
            let seeds = self.seed_centroids(rows, &norms, dim, rng);
            let run = self.lloyd(rows, &norms, seeds, tol);
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        // n_init is at least one after with_defaults.
        best.unwrap_or_else(|| KMeansResult {
            labels: vec![0; n],
            centroids: Vec::new(),
            inertia: 0.0,
            iterations: 0,
        })
    }

    /// Greedy k-means++: each new centroid is the best of several
    /// D²-weighted candidates, judged by the resulting potential.
    fn seed_centroids<R: Rng + ?Sized>(
        &self,
        rows: &[SparseVector],
        norms: &[f64],
        dim: usize,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let n = rows.len();
        let k = self.cfg.k;
        let trials = 2 + (k as f64).ln().floor() as usize;

        let first = rng.gen_range(0..n);
        let mut centroids = vec![dense(&rows[first], dim)];
        let mut closest: Vec<f64> = (0..n).map(|i| row_dist(rows, norms, i, first)).collect();
        let mut potential: f64 = closest.iter().sum();

        while centroids.len() < k {
            let mut cumsum = Vec::with_capacity(n);
            let mut acc = 0.0;
            for &d in &closest {
                acc += d;
                cumsum.push(acc);
            }

            let mut chosen: Option<(usize, Vec<f64>, f64)> = None;
            for _ in 0..trials {
                let target = rng.r#gen::<f64>() * potential;
                let cand = cumsum.partition_point(|&c| c < target).min(n - 1);
                let dists: Vec<f64> = (0..n)
                    .map(|i| closest[i].min(row_dist(rows, norms, i, cand)))
                    .collect();
                let pot: f64 = dists.iter().sum();
                if chosen.as_ref().is_none_or(|(_, _, p)| pot < *p) {
                    chosen = Some((cand, dists, pot));
                }
            }

            if let Some((cand, dists, pot)) = chosen {
                centroids.push(dense(&rows[cand], dim));
                closest = dists;
                potential = pot;
            }
        }
        centroids
    }

    fn lloyd(
        &self,
        rows: &[SparseVector],
        norms: &[f64],
        mut centroids: Vec<Vec<f64>>,
        tol: f64,
    ) -> KMeansResult {
        let n = rows.len();
        let k = centroids.len();
        let mut labels = vec![usize::MAX; n];
        let mut dists = vec![0.0; n];
        let mut iterations = 0;

        for iter in 0..self.cfg.max_iter {
            iterations = iter + 1;
            let center_norms: Vec<f64> = centroids.iter().map(|c| c.iter().map(|x| x * x).sum()).collect();

            let mut changed = false;
            for i in 0..n {
                let (label, d) = nearest(&rows[i], norms[i], &centroids, &center_norms);
                if labels[i] != label {
                    labels[i] = label;
                    changed = true;
                }
                dists[i] = d;
            }
            if !changed {
                break;
            }

            let dim = centroids.first().map_or(0, Vec::len);
            let mut sums = vec![vec![0.0; dim]; k];
            let mut counts = vec![0usize; k];
            for (i, row) in rows.iter().enumerate() {
                row.add_to(&mut sums[labels[i]], 1.0);
                counts[labels[i]] += 1;
            }

            // An empty cluster takes over the row farthest from its centroid.
            for c in 0..k {
                if counts[c] > 0 {
                    continue;
                }
                let far = (0..n)
                    .filter(|&i| counts[labels[i]] > 1)
                    .max_by(|&a, &b| dists[a].total_cmp(&dists[b]));
                if let Some(i) = far {
                    let old = labels[i];
                    rows[i].add_to(&mut sums[old], -1.0);
                    counts[old] -= 1;
                    sums[c] = vec![0.0; dim];
                    rows[i].add_to(&mut sums[c], 1.0);
                    counts[c] = 1;
                    labels[i] = c;
                    dists[i] = 0.0;
                }
            }

            let mut shift = 0.0;
            for c in 0..k {
                if counts[c] == 0 {
                    continue;
                }
                let inv = 1.0 / counts[c] as f64;
                for (new, old) in sums[c].iter_mut().zip(centroids[c].iter()) {
                    *new *= inv;
                    shift += (*new - old) * (*new - old);
                }
                centroids[c] = std::mem::take(&mut sums[c]);
            }
            if shift <= tol {
                // Final assignment against the settled centroids.
                let center_norms: Vec<f64> = centroids.iter().map(|c| c.iter().map(|x| x * x).sum()).collect();
                for i in 0..n {
                    let (label, d) = nearest(&rows[i], norms[i], &centroids, &center_norms);
                    labels[i] = label;
                    dists[i] = d;
                }
                break;
            }
        }

        KMeansResult {
            labels,
            centroids,
            inertia: dists.iter().sum(),
            iterations,
        }
    }
}

fn dense(row: &SparseVector, dim: usize) -> Vec<f64> {
    let mut out = vec![0.0; dim];
    row.add_to(&mut out, 1.0);
    out
}

/// Squared euclidean distance between rows `a` and `b`.
fn row_dist(rows: &[SparseVector], norms: &[f64], a: usize, b: usize) -> f64 {
    (norms[a] + norms[b] - 2.0 * rows[a].dot(&rows[b])).max(0.0)
}

/// Nearest centroid and its squared distance; ties go to the lower index.
fn nearest(row: &SparseVector, norm: f64, centroids: &[Vec<f64>], center_norms: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let d = (norm - 2.0 * row.dot_dense(centroid) + center_norms[c]).max(0.0);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

/// Mean of per-feature variances.
fn mean_variance(rows: &[SparseVector], dim: usize) -> f64 {
    if rows.is_empty() || dim == 0 {
        return 0.0;
    }
    let n = rows.len() as f64;
    let mut sum = vec![0.0; dim];
    let mut sum_sq = vec![0.0; dim];
    for row in rows {
        for (i, w) in row.iter() {
            sum[i as usize] += w;
            sum_sq[i as usize] += w * w;
        }
    }
    let total: f64 = sum
        .iter()
        .zip(&sum_sq)
        .map(|(s, sq)| sq / n - (s / n) * (s / n))
        .sum();
    total / dim as f64
}
