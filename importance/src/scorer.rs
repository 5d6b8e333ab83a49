use std::collections::HashMap;
use std::sync::Arc;

use floodlens_cluster::{Cluster, Cohesion};
use floodlens_message::{AnalysisContext, Message};
use floodlens_text::Pattern;
use floodlens_trie::{longest_common_substring, longest_most_common_substring};
use serde::{Deserialize, Serialize};

use crate::error::ImportanceError;
use crate::message::MessageAnalysis;

/// Score of clusters too small to rank.
pub const SMALL_CLUSTER_SCORE: f64 = -100.0;

const SMALL_CLUSTER_MAX: usize = 3;

/// Which shared substring labels a cohesive cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Substring shared by every message.
    #[default]
    Common,
    /// Best length × support substring shared by a majority.
    MostCommon,
}

/// Controls cluster scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Words in the fallback label. Default: 5.
    pub label_words: usize,

    /// Substrings longer than this label the cluster and earn a bonus.
    /// Default: 8.
    pub label_min_len: usize,

    /// Shared usernames longer than this earn a (logged) bonus. Default: 5.
    pub username_min_len: usize,

    /// Cohesion at which substring labels are tried. Negative or NaN means
    /// unset; 0 tries them for every cluster. Default: 0.5.
    pub cohesion_gate: f64,

    pub label_mode: LabelMode,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            label_words: 5,
            label_min_len: 8,
            username_min_len: 5,
            cohesion_gate: 0.5,
            label_mode: LabelMode::Common,
        }
    }
}

impl ScorerConfig {
    pub fn with_defaults(mut self) -> Self {
        let d = Self::default();
        if self.label_words == 0 {
            self.label_words = d.label_words;
        }
        if self.label_min_len == 0 {
            self.label_min_len = d.label_min_len;
        }
        if self.username_min_len == 0 {
            self.username_min_len = d.username_min_len;
        }
        if self.cohesion_gate.is_nan() || self.cohesion_gate < 0.0 {
            self.cohesion_gate = d.cohesion_gate;
        }
        self
    }
}

/// Scores and labels clusters.
pub struct ClusterScorer<C> {
    cfg: ScorerConfig,
    messages: MessageAnalysis,
    cohesion: C,
}

impl<C: Cohesion> ClusterScorer<C> {
    pub fn new(cfg: ScorerConfig, ctx: Arc<AnalysisContext>, cohesion: C) -> Self {
        Self {
            cfg: cfg.with_defaults(),
            messages: MessageAnalysis::new(ctx),
            cohesion,
        }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.cfg
    }

    /// Scores every cluster and returns the ranked `(index, score)` order.
    ///
    /// Each cluster's label and importance are updated.
    pub fn rank_clusters(&self, clusters: &mut [Cluster]) -> Result<Vec<(usize, f64)>, ImportanceError> {
        let scores = clusters
            .iter_mut()
            .map(|c| self.score(c))
            .collect::<Result<Vec<_>, _>>()?;
        let order = crate::rank(&scores);
        tracing::info!(clusters = clusters.len(), ranked = order.len(), "ranked clusters");
        Ok(order)
    }

    /// Computes, records and returns the normalized importance of `cluster`.
    ///
    /// Clusters of at most three messages get [`SMALL_CLUSTER_SCORE`].
    pub fn score(&self, cluster: &mut Cluster) -> Result<f64, ImportanceError> {
        let n = cluster.len();
        if n <= SMALL_CLUSTER_MAX {
            cluster.set_importance(SMALL_CLUSTER_SCORE);
            return Ok(SMALL_CLUSTER_SCORE);
        }

        let cs = match cluster.cohesion() {
            Some(cs) => cs,
            None => {
                let cs = self.cohesion.cohesion(cluster.messages())?;
                cluster.set_cohesion(cs);
                cs
            }
        };

        let mut res = 1.01 - cs / 2.0;
        let mut label = None;
        if cs >= self.cfg.cohesion_gate {
            let texts: Vec<String> = cluster
                .messages()
                .iter()
                .map(|m| Pattern::Website.replace(&m.text, "").into_owned())
                .collect();
            let shared = self.shared(&texts);
            let len = shared.chars().count();
            if len > self.cfg.label_min_len {
                res *= ((len - self.cfg.label_min_len) * 2 + 1) as f64;
                label = Some(shared);
            }

            let usernames: Vec<&str> = cluster.messages().iter().map(|m| m.username.as_str()).collect();
            let user = self.shared(&usernames);
            let user_len = user.chars().count();
            if user_len > self.cfg.username_min_len {
                // Recorded only; the score is left unchanged.
                let bonus = 1.0 + user_len as f64 / 10.0;
                tracing::debug!(username = %user, bonus, "shared username");
            }
        }
        let label = label.unwrap_or_else(|| top_words(cluster.messages(), self.cfg.label_words));
        cluster.set_label(label);

        for msg in cluster.messages() {
            res *= self.messages.multiplier(msg);
        }

        let score = normalize(res, n);
        cluster.set_importance(score);
        Ok(score)
    }

    fn shared<S: AsRef<str>>(&self, strings: &[S]) -> String {
        match self.cfg.label_mode {
            LabelMode::Common => longest_common_substring(strings),
            LabelMode::MostCommon => longest_most_common_substring(strings),
        }
    }
}

/// Maps a raw score onto the range spanned by the smallest and largest
/// plausible scores of a cluster of `n` messages. Returns 0 when that range
/// is empty.
pub fn normalize(value: f64, n: usize) -> f64 {
    let size = n as f64;
    let max = 0.60 * 9605.0 * 2.2 * 1.08171_f64.powi(n as i32) / size;
    let min = 1.01 / size;
    if max == min || !max.is_finite() {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// The most frequent lowercased words longer than three characters, joined
/// with ", ". Ties keep first-seen order.
fn top_words(messages: &[Arc<Message>], count: usize) -> String {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for msg in messages {
        for word in msg.text.split_whitespace().filter(|w| w.chars().count() > 3) {
            let word = word.to_lowercase();
            match seen.get(&word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    seen.insert(word.clone(), counts.len());
                    counts.push((word, 1));
                }
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(count)
        .map(|(w, _)| w)
        .collect::<Vec<_>>()
        .join(", ")
}
