use std::sync::Arc;

use floodlens_message::Message;
use floodlens_text::Cleaner;
use floodlens_vecspace::{Vectorizer, message_cohesion};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::error::ClusterError;
use crate::kmeans::{KMeans, KMeansConfig};

/// Intra-cluster similarity in `[0, 1]`.
///
/// Implemented for closures so tests and callers can plug in any metric.
pub trait Cohesion: Send + Sync {
    fn cohesion(&self, messages: &[Arc<Message>]) -> Result<f64, ClusterError>;
}

impl<F> Cohesion for F
where
    F: Fn(&[Arc<Message>]) -> Result<f64, ClusterError> + Send + Sync,
{
    fn cohesion(&self, messages: &[Arc<Message>]) -> Result<f64, ClusterError> {
        self(messages)
    }
}

/// Cosine cohesion over n-gram counts of the cleaned texts.
#[derive(Debug, Clone)]
pub struct CosineCohesion {
    cleaner: Arc<Cleaner>,
}

impl CosineCohesion {
    pub fn new(cleaner: Arc<Cleaner>) -> Self {
        Self { cleaner }
    }
}

impl Cohesion for CosineCohesion {
    fn cohesion(&self, messages: &[Arc<Message>]) -> Result<f64, ClusterError> {
        Ok(message_cohesion(messages, &self.cleaner)?)
    }
}

/// Controls the bisector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectConfig {
    /// Clusters of at most this many messages are leaves. Default: 50.
    pub min_leaf_size: usize,

    /// Leaf size as a fraction of the whole input; the larger of the two
    /// bounds applies. Default: 0.005.
    pub min_leaf_ratio: f64,

    /// Clusters with cohesion at or above this are leaves. Default: 0.5.
    pub guard: f64,

    /// Worker pool size. Default: available parallelism.
    pub workers: usize,

    /// Round cap; reaching it is a `NonConvergence` error. `None` caps at
    /// one more round than there are messages, which a terminating run
    /// never reaches.
    pub max_rounds: Option<usize>,

    /// Seed for the 2-means runs. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Partitioning parameters. `k` is always 2.
    pub kmeans: KMeansConfig,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            min_leaf_size: 50,
            min_leaf_ratio: 0.005,
            guard: 0.5,
            workers: default_workers(),
            max_rounds: None,
            seed: None,
            kmeans: KMeansConfig::default(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl BisectConfig {
    pub fn with_defaults(mut self) -> Self {
        let d = Self::default();
        if self.min_leaf_size == 0 {
            self.min_leaf_size = d.min_leaf_size;
        }
        if self.min_leaf_ratio < 0.0 {
            self.min_leaf_ratio = d.min_leaf_ratio;
        }
        if self.guard.is_nan() || self.guard < 0.0 {
            self.guard = d.guard;
        }
        if self.workers == 0 {
            self.workers = d.workers;
        }
        if self.max_rounds == Some(0) {
            self.max_rounds = d.max_rounds;
        }
        self.kmeans = KMeansConfig { k: 2, ..self.kmeans }.with_defaults();
        self
    }

    /// Round cap for an input of `n` messages.
    ///
    /// Every round short of the fixpoint adds at least one non-empty
    /// cluster, so `n` rounds always suffice.
    pub fn round_cap(&self, n: usize) -> usize {
        self.max_rounds.unwrap_or(n + 1)
    }

    /// Leaf size bound for an input of `n` messages.
    pub fn min_size(&self, n: usize) -> f64 {
        (self.min_leaf_size as f64).max(self.min_leaf_ratio * n as f64)
    }
}

/// Splits a message set into leaf clusters in bulk-synchronous rounds.
pub struct Bisector<C> {
    cfg: BisectConfig,
    cohesion: C,
    cleaner: Arc<Cleaner>,
    vectorizer: Vectorizer,
}

impl Bisector<CosineCohesion> {
    /// Bisector guarded by [`CosineCohesion`] over the same cleaner.
    pub fn with_cosine(cfg: BisectConfig, cleaner: Arc<Cleaner>) -> Self {
        let cohesion = CosineCohesion::new(Arc::clone(&cleaner));
        Self::new(cfg, cohesion, cleaner)
    }
}

impl<C: Cohesion> Bisector<C> {
    pub fn new(cfg: BisectConfig, cohesion: C, cleaner: Arc<Cleaner>) -> Self {
        Self {
            cfg: cfg.with_defaults(),
            cohesion,
            cleaner,
            vectorizer: Vectorizer::counts(),
        }
    }

    pub fn config(&self) -> &BisectConfig {
        &self.cfg
    }

    /// Runs rounds until the cluster count stops changing.
    ///
    /// Every cluster of a round is handled by one task on the worker pool;
    /// the next round starts after all tasks of the current one joined.
    pub fn run(&self, messages: Vec<Arc<Message>>) -> Result<Vec<Cluster>, ClusterError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.workers)
            .thread_name(|i| format!("bisect-{i}"))
            .build()
            .map_err(|e| ClusterError::Pool(e.to_string()))?;

        if messages.is_empty() {
            return Ok(Vec::new());
        }
        let min_size = self.cfg.min_size(messages.len());
        let max_rounds = self.cfg.round_cap(messages.len());
        let mut clusters = vec![Cluster::new(messages)];

        for round in 0..max_rounds {
            let before = clusters.len();
            let current = std::mem::take(&mut clusters);
            let results: Vec<Vec<Cluster>> = pool.install(|| {
                current
                    .into_par_iter()
                    .enumerate()
                    .map(|(index, cluster)| self.step(cluster, min_size, round, index))
                    .collect::<Result<Vec<_>, ClusterError>>()
            })?;

            let splits = results.iter().filter(|r| r.len() > 1).count();
            clusters = results.into_iter().flatten().collect();
            tracing::debug!(
                round,
                before,
                after = clusters.len(),
                splits,
                "bisect round finished"
            );

            if clusters.len() == before {
                tracing::info!(rounds = round + 1, clusters = clusters.len(), "bisect reached fixpoint");
                return Ok(clusters);
            }
        }

        Err(ClusterError::NonConvergence { rounds: max_rounds })
    }

    /// Processes one cluster: leaves pass through, others split in two.
    fn step(&self, mut cluster: Cluster, min_size: f64, round: usize, index: usize) -> Result<Vec<Cluster>, ClusterError> {
        if cluster.is_empty() {
            return Ok(Vec::new());
        }
        if cluster.len() as f64 <= min_size {
            return Ok(vec![cluster]);
        }

        let cohesion = self.cohesion.cohesion(cluster.messages())?;
        if cohesion >= self.cfg.guard {
            cluster.set_cohesion(cohesion);
            return Ok(vec![cluster]);
        }

        let matrix = self.vectorizer.vectorize_messages(cluster.messages(), &self.cleaner)?;
        let mut rng = match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(task_seed(seed, round, index)),
            None => StdRng::from_entropy(),
        };
        let kmeans = KMeans::new(self.cfg.kmeans.clone());
        let result = kmeans.fit(&matrix.rows, matrix.dim(), &mut rng);

        Ok(Cluster::partition(cluster.messages(), &result.labels, 2)
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect())
    }
}

/// Per-task seed so results do not depend on scheduling.
fn task_seed(seed: u64, round: usize, index: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((round as u64) << 32) ^ index as u64
}
