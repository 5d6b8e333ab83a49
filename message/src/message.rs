use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short social-media message.
///
/// All fields are set by the producer. `processed` is filled lazily by the
/// text cleaner and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Producer-assigned identifier.
    pub id: String,

    /// Raw message text.
    pub text: String,

    /// Time the message was posted.
    pub date: DateTime<Utc>,

    /// Author account name (without the leading `@`).
    pub username: String,

    /// Tracking keywords the message was collected for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Attached media URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,

    /// Detected language name, e.g. "English".
    #[serde(default = "unknown_language")]
    pub language: String,

    #[serde(skip)]
    processed: OnceLock<String>,
}

fn unknown_language() -> String {
    "mixed".to_string()
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        date: DateTime<Utc>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            date,
            username: username.into(),
            keywords: Vec::new(),
            photos: Vec::new(),
            language: unknown_language(),
            processed: OnceLock::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_photos<I, S>(mut self, photos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos = photos.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns true if the message carries at least one media attachment.
    pub fn has_media(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Number of media attachments.
    pub fn media_count(&self) -> usize {
        self.photos.len()
    }

    /// Returns true if `keyword` is one of the message's tracking keywords.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Returns the cached processed text, if it has been computed.
    pub fn processed(&self) -> Option<&str> {
        self.processed.get().map(String::as_str)
    }

    /// Returns the processed text, computing it with `f` on first access.
    ///
    /// Concurrent callers observe the same value; `f` runs at most once
    /// per message.
    pub fn processed_or_init<F>(&self, f: F) -> &str
    where
        F: FnOnce() -> String,
    {
        self.processed.get_or_init(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 1, 2, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_processed_is_computed_once() {
        let msg = Message::new("1", "water rising", date(), "alice");
        assert_eq!(msg.processed(), None);

        let first = msg.processed_or_init(|| "first".to_string()).to_string();
        let second = msg.processed_or_init(|| "second".to_string());
        assert_eq!(first, "first");
        assert_eq!(second, "first");
    }

    #[test]
    fn test_media_and_keywords() {
        let msg = Message::new("1", "text", date(), "bob")
            .with_keywords(["flood", "rain"])
            .with_photos(["https://t.co/abc"]);
        assert!(msg.has_media());
        assert_eq!(msg.media_count(), 1);
        assert!(msg.has_keyword("flood"));
        assert!(!msg.has_keyword("storm"));
    }

    #[test]
    fn test_deserialize_json() {
        let raw = r#"{
            "id": "42",
            "text": "River over its banks",
            "date": "2016-01-02T10:30:00.000Z",
            "username": "carol",
            "keywords": ["flood"],
            "language": "English"
        }"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id, "42");
        assert_eq!(msg.date, date());
        assert_eq!(msg.language, "English");
        assert!(msg.photos.is_empty());
        assert!(msg.processed().is_none());
    }

    #[test]
    fn test_missing_language_defaults_to_mixed() {
        let raw = r#"{"id":"1","text":"t","date":"2016-01-02T10:30:00Z","username":"u"}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.language, "mixed");
    }
}
