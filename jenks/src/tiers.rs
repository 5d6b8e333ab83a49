use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use floodlens_message::Message;
use floodlens_text::Pattern;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::JenksError;
use crate::natural::{Subset, natural_breaks, natural_breaks_subset};

/// Whitelist predicate supplied by the caller.
pub trait Matcher {
    fn matches(&self, text: &str) -> bool;
}

/// Matches text containing any of its words, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn parse(source: &str) -> Self {
        Self::new(
            source
                .lines()
                .map(str::trim)
                .filter(|l| !l.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Matcher for WordList {
    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.words.iter().any(|w| text.contains(w.as_str()))
    }
}

/// Controls account tiering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Number of posting-frequency tiers. Default: 5.
    pub classes: usize,

    /// Classify a subset of this size when there are more accounts.
    /// Default: 5000.
    pub subset: Option<usize>,

    pub strategy: Subset,

    /// Word a frequent poster must use to count as a warning account.
    /// Default: "flood".
    pub alert_word: String,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            classes: 5,
            subset: Some(5000),
            strategy: Subset::Average,
            alert_word: "flood".to_string(),
        }
    }
}

/// Accounts grouped by posting frequency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountTiers {
    /// Tier boundaries, `classes + 1` values.
    pub breaks: Vec<f64>,

    /// Usernames per tier, least active first.
    pub tiers: Vec<Vec<String>>,

    /// Frequent posters on the news list.
    pub news: Vec<String>,

    /// Frequent posters that post alerts.
    pub warning: Vec<String>,

    /// Remaining frequent posters.
    pub spam: Vec<String>,
}

/// Tiers the authors of `messages` by how many messages each posted and
/// splits the frequent posters (tier 2 and up) into news, warning and spam
/// accounts.
///
/// Tiers and the news and spam lists keep the order of each account's
/// first message. Warning accounts are listed in the order of the message
/// that qualified them.
pub fn classify_accounts<R: Rng + ?Sized>(
    messages: &[Arc<Message>],
    news: &dyn Matcher,
    warnings: &dyn Matcher,
    cfg: &TierConfig,
    rng: &mut R,
) -> Result<AccountTiers, JenksError> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for msg in messages {
        let count = counts.entry(msg.username.as_str()).or_insert_with(|| {
            order.push(msg.username.as_str());
            0
        });
        *count += 1;
    }

    let values: Vec<f64> = order.iter().map(|u| counts[u] as f64).collect();
    let breaks = match cfg.subset {
        Some(size) => natural_breaks_subset(&values, cfg.classes, size, cfg.strategy, rng)?,
        None => natural_breaks(&values, cfg.classes)?,
    };

    let mut tiers = vec![Vec::new(); cfg.classes];
    for (user, &value) in order.iter().zip(&values) {
        if let Some(tier) = tier_of(value, &breaks) {
            tiers[tier].push(user.to_string());
        }
    }

    let frequent: Vec<&String> = tiers.iter().skip(2).flatten().collect();

    let alert = cfg.alert_word.to_lowercase();
    let mut result = AccountTiers {
        breaks,
        ..AccountTiers::default()
    };
    let mut others: Vec<&String> = Vec::new();
    for user in frequent {
        if news.matches(&user.to_lowercase()) {
            result.news.push(user.clone());
        } else {
            others.push(user);
        }
    }

    let mut pending: HashSet<&str> = others.iter().map(|u| u.as_str()).collect();
    for msg in messages {
        if pending.is_empty() {
            break;
        }
        if !pending.contains(msg.username.as_str()) {
            continue;
        }
        let text = &msg.text;
        if text.to_lowercase().contains(&alert) && (warnings.matches(text) || Pattern::Time.exists(text)) {
            pending.remove(msg.username.as_str());
            result.warning.push(msg.username.clone());
        }
    }
    result.spam = others
        .into_iter()
        .filter(|u| pending.contains(u.as_str()))
        .cloned()
        .collect();
    result.tiers = tiers;

    tracing::debug!(
        accounts = order.len(),
        news = result.news.len(),
        warning = result.warning.len(),
        spam = result.spam.len(),
        "classified accounts"
    );
    Ok(result)
}

/// Tier 0 is `[b0, b1]`, tier i is `(b_i, b_{i+1}]`.
fn tier_of(value: f64, breaks: &[f64]) -> Option<usize> {
    let first = *breaks.first()?;
    if value < first {
        return None;
    }
    breaks.windows(2).position(|w| value <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn posts(user: &str, n: usize, text: &str) -> Vec<Arc<Message>> {
        (0..n)
            .map(|i| Arc::new(Message::new(format!("{user}-{i}"), text, Utc::now(), user)))
            .collect()
    }

    fn dataset() -> Vec<Arc<Message>> {
        let mut messages = Vec::new();
        messages.extend(posts("once_a", 1, "hello"));
        messages.extend(posts("once_b", 1, "hello"));
        messages.extend(posts("twice_a", 2, "rain"));
        messages.extend(posts("twice_b", 2, "rain"));
        messages.extend(posts("thrice", 3, "rain"));
        messages.extend(posts("other", 8, "nothing to see"));
        messages.extend(posts("spammer", 9, "Flood flood buy now"));
        messages.extend(posts("timer", 15, "Flood expected at 14:00"));
        messages.extend(posts("gauge", 16, "Flood WARNING issued for the river"));
        messages.extend(posts("CityNews", 30, "flood update"));
        messages
    }

    #[test]
    fn test_word_list_matching() {
        let list = WordList::parse("# comment\nnews\n\n  Times \n");
        assert_eq!(list.len(), 2);
        assert!(list.matches("daily times"));
        assert!(list.matches("CITYNEWS"));
        assert!(!list.matches("weather"));
        assert!(WordList::default().is_empty());
    }

    #[test]
    fn test_tier_boundaries() {
        let breaks = [1.0, 1.0, 3.0, 9.0];
        assert_eq!(tier_of(1.0, &breaks), Some(0));
        assert_eq!(tier_of(2.0, &breaks), Some(1));
        assert_eq!(tier_of(3.0, &breaks), Some(1));
        assert_eq!(tier_of(9.0, &breaks), Some(2));
        assert_eq!(tier_of(10.0, &breaks), None);
        assert_eq!(tier_of(0.5, &breaks), None);
    }

    #[test]
    fn test_classifies_frequent_posters() {
        let messages = dataset();
        let news = WordList::new(["news", "once"]);
        let warnings = WordList::new(["warning"]);
        let mut rng = StdRng::seed_from_u64(0);
        let tiers = classify_accounts(&messages, &news, &warnings, &TierConfig::default(), &mut rng).unwrap();

        assert_eq!(tiers.breaks, vec![1.0, 1.0, 3.0, 9.0, 16.0, 30.0]);
        assert_eq!(tiers.tiers[0], vec!["once_a", "once_b"]);
        assert_eq!(tiers.tiers[1], vec!["twice_a", "twice_b", "thrice"]);
        assert_eq!(tiers.tiers[2], vec!["other", "spammer"]);
        assert_eq!(tiers.tiers[3], vec!["timer", "gauge"]);
        assert_eq!(tiers.tiers[4], vec!["CityNews"]);

        assert_eq!(tiers.news, vec!["CityNews"]);
        assert_eq!(tiers.warning, vec!["timer", "gauge"]);
        assert_eq!(tiers.spam, vec!["other", "spammer"]);
    }

    #[test]
    fn test_warnings_follow_the_qualifying_message() {
        let mut messages = Vec::new();
        messages.extend(posts("once_a", 1, "hello"));
        messages.extend(posts("once_b", 1, "hello"));
        messages.extend(posts("twice_a", 2, "rain"));
        messages.extend(posts("twice_b", 2, "rain"));
        messages.extend(posts("thrice", 3, "rain"));
        messages.extend(posts("other", 8, "nothing to see"));
        messages.extend(posts("spammer", 9, "Flood flood buy now"));
        messages.extend(posts("gauge", 1, "the river is calm"));
        messages.extend(posts("timer", 15, "Flood expected at 14:00"));
        messages.extend(posts("gauge", 15, "Flood WARNING issued for the river"));
        messages.extend(posts("CityNews", 30, "flood update"));

        let news = WordList::new(["news", "once"]);
        let warnings = WordList::new(["warning"]);
        let mut rng = StdRng::seed_from_u64(0);
        let tiers = classify_accounts(&messages, &news, &warnings, &TierConfig::default(), &mut rng).unwrap();

        assert_eq!(tiers.tiers[3], vec!["gauge", "timer"]);
        assert_eq!(tiers.warning, vec!["timer", "gauge"]);
        assert_eq!(tiers.spam, vec!["other", "spammer"]);
    }

    #[test]
    fn test_alert_word_is_required_for_warnings() {
        let messages = dataset();
        let cfg = TierConfig {
            alert_word: "storm".to_string(),
            ..TierConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let tiers = classify_accounts(&messages, &WordList::default(), &WordList::new(["warning"]), &cfg, &mut rng).unwrap();
        assert!(tiers.warning.is_empty());
        assert_eq!(tiers.spam, vec!["other", "spammer", "timer", "gauge", "CityNews"]);
    }

    #[test]
    fn test_too_few_accounts() {
        let messages = posts("solo", 4, "flood");
        let mut rng = StdRng::seed_from_u64(0);
        let err = classify_accounts(
            &messages,
            &WordList::default(),
            &WordList::default(),
            &TierConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, JenksError::InsufficientData { distinct: 1, required: 6 }));
    }
}
