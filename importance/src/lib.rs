//! Importance scoring of message clusters.
//!
//! Each message contributes a small multiplier ([`MessageAnalysis`]); each
//! cluster gets a cohesion-based base score, a label and a bonus for long
//! shared substrings ([`ClusterScorer`]). Scores are normalized by cluster
//! size and ranked with [`rank`].

mod error;
mod message;
mod rank;
mod scorer;

pub use error::ImportanceError;
pub use message::MessageAnalysis;
pub use rank::rank;
pub use scorer::{ClusterScorer, LabelMode, SMALL_CLUSTER_SCORE, ScorerConfig, normalize};
