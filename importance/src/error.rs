use floodlens_cluster::ClusterError;
use thiserror::Error;

/// Errors returned while scoring clusters.
#[derive(Debug, Error)]
pub enum ImportanceError {
    #[error("importance: {0}")]
    Cluster(#[from] ClusterError),
}
