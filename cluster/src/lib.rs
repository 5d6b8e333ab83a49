//! Recursive bisecting clustering of messages.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use floodlens_cluster::{BisectConfig, Bisector};
//!
//! let bisector = Bisector::with_cosine(BisectConfig::default(), cleaner);
//! let clusters = bisector.run(messages)?;
//! ```
//!
//! # Design
//!
//! Clustering proceeds in bulk-synchronous rounds. Every cluster of a round
//! is processed once on a fixed worker pool: clusters that are small or
//! cohesive enough pass through, the others are split in two by 2-means.
//! The next round starts only after every worker has finished. Rounds
//! repeat until the cluster count stops changing, bounded by
//! [`BisectConfig::max_rounds`].

mod bisect;
mod cluster;
mod error;
mod kmeans;

pub use bisect::{BisectConfig, Bisector, Cohesion, CosineCohesion};
pub use cluster::{Cluster, DEFAULT_LABEL};
pub use error::ClusterError;
pub use kmeans::{KMeans, KMeansConfig, KMeansResult};
