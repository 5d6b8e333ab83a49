use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::Message;
use crate::context::{default_keyword, default_language};

/// Dominant keyword and language of a message set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetProfile {
    pub keyword: String,
    pub language: String,
}

/// Messages with this many words or fewer do not vote on the language.
const MIN_LANGUAGE_WORDS: usize = 3;

/// Finds the most frequent first keyword and the most frequent detected
/// language. Ties go to the value seen first.
pub fn analyze_dataset(messages: &[Arc<Message>]) -> DatasetProfile {
    let keyword = most_common(messages.iter().filter_map(|m| m.keywords.first()))
        .cloned()
        .unwrap_or_else(default_keyword);

    let language = most_common(
        messages
            .iter()
            .filter(|m| m.text.split_whitespace().count() > MIN_LANGUAGE_WORDS)
            .map(|m| &m.language),
    )
    .cloned()
    .unwrap_or_else(default_language);

    DatasetProfile { keyword, language }
}

fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    // value -> (count, first position)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (pos, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, pos)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn msg(text: &str, keyword: Option<&str>, language: &str) -> Arc<Message> {
        let m = Message::new("id", text, Utc::now(), "user").with_language(language);
        Arc::new(match keyword {
            Some(k) => m.with_keywords([k]),
            None => m,
        })
    }

    #[test]
    fn test_dominant_keyword_and_language() {
        let messages = vec![
            msg("the river is flooding the town now", Some("flood"), "English"),
            msg("de rivier stroomt over de dijk heen", Some("overstroming"), "Dutch"),
            msg("more rain expected on the coast today", Some("flood"), "English"),
            msg("short", Some("rain"), "Dutch"),
        ];
        let profile = analyze_dataset(&messages);
        assert_eq!(profile.keyword, "flood");
        assert_eq!(profile.language, "English");
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let messages = vec![
            msg("one two three four five", Some("storm"), "Dutch"),
            msg("one two three four five", Some("flood"), "English"),
        ];
        let profile = analyze_dataset(&messages);
        assert_eq!(profile.keyword, "storm");
        assert_eq!(profile.language, "Dutch");
    }

    #[test]
    fn test_defaults_when_empty() {
        let profile = analyze_dataset(&[]);
        assert_eq!(profile.keyword, "flood");
        assert_eq!(profile.language, "english");
    }
}
