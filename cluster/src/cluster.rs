use std::fmt;
use std::sync::Arc;

use floodlens_message::Message;
use rand::Rng;
use rand::seq::SliceRandom;

/// Label of a cluster that has not been summarized.
pub const DEFAULT_LABEL: &str = "mixed";

/// A group of messages produced by the bisector.
///
/// Cohesion is recorded when the bisector computes it; label and importance
/// are set by the scorer.
#[derive(Clone)]
pub struct Cluster {
    messages: Vec<Arc<Message>>,
    cohesion: Option<f64>,
    label: String,
    importance: Option<f64>,
}

impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("len", &self.messages.len())
            .field("cohesion", &self.cohesion)
            .field("label", &self.label)
            .field("importance", &self.importance)
            .finish()
    }
}

impl Cluster {
    pub fn new(messages: Vec<Arc<Message>>) -> Self {
        Self {
            messages,
            cohesion: None,
            label: DEFAULT_LABEL.to_string(),
            importance: None,
        }
    }

    /// Groups `messages` by `labels` into `k` clusters, keeping input order
    /// within each cluster. Empty groups are included.
    pub fn partition(messages: &[Arc<Message>], labels: &[usize], k: usize) -> Vec<Cluster> {
        let mut groups: Vec<Vec<Arc<Message>>> = vec![Vec::new(); k];
        for (msg, &label) in messages.iter().zip(labels) {
            if label < k {
                groups[label].push(Arc::clone(msg));
            }
        }
        groups.into_iter().map(Cluster::new).collect()
    }

    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Arc<Message>> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, msg: Arc<Message>) {
        self.messages.push(msg);
        self.cohesion = None;
    }

    pub fn cohesion(&self) -> Option<f64> {
        self.cohesion
    }

    pub fn set_cohesion(&mut self, cohesion: f64) {
        self.cohesion = Some(cohesion);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn importance(&self) -> Option<f64> {
        self.importance
    }

    pub fn set_importance(&mut self, importance: f64) {
        self.importance = Some(importance);
    }

    /// The `n` most recent messages, newest first.
    pub fn latest(&self, n: usize) -> Vec<Arc<Message>> {
        let mut sorted: Vec<&Arc<Message>> = self.messages.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.into_iter().take(n).cloned().collect()
    }

    /// Up to `n` distinct messages chosen at random.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Arc<Message>> {
        self.messages.choose_multiple(rng, n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn msg(id: &str, minute: u32) -> Arc<Message> {
        let date = Utc.with_ymd_and_hms(2016, 1, 2, 10, minute, 0).unwrap();
        Arc::new(Message::new(id, "text", date, "user"))
    }

    #[test]
    fn test_partition_keeps_order() {
        let msgs = vec![msg("a", 0), msg("b", 1), msg("c", 2), msg("d", 3)];
        let parts = Cluster::partition(&msgs, &[1, 0, 1, 1], 3);
        assert_eq!(parts.len(), 3);
        let ids = |c: &Cluster| c.messages().iter().map(|m| m.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&parts[0]), vec!["b"]);
        assert_eq!(ids(&parts[1]), vec!["a", "c", "d"]);
        assert!(parts[2].is_empty());
    }

    #[test]
    fn test_latest_sorts_by_date() {
        let c = Cluster::new(vec![msg("old", 1), msg("new", 9), msg("mid", 5)]);
        let latest: Vec<_> = c.latest(2).iter().map(|m| m.id.clone()).collect();
        assert_eq!(latest, vec!["new", "mid"]);
        assert_eq!(c.latest(10).len(), 3);
    }

    #[test]
    fn test_sample_is_distinct() {
        let c = Cluster::new((0..10).map(|i| msg(&i.to_string(), i)).collect());
        let mut rng = StdRng::seed_from_u64(7);
        let mut ids: Vec<_> = c.sample(5, &mut rng).iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(c.sample(20, &mut rng).len(), 10);
    }

    #[test]
    fn test_defaults() {
        let mut c = Cluster::new(vec![msg("a", 0)]);
        assert_eq!(c.label(), DEFAULT_LABEL);
        assert_eq!(c.importance(), None);
        c.set_cohesion(0.4);
        c.push(msg("b", 1));
        assert_eq!(c.cohesion(), None);
    }
}
