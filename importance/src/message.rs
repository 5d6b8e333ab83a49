use std::sync::Arc;

use floodlens_message::{AnalysisContext, Message};
use floodlens_text::Pattern;

const KEYWORD_FACTOR: f64 = 1.01;
const MEDIA_FACTOR: f64 = 1.02;
const WATER_HEIGHT_FACTOR: f64 = 1.05;

/// Per-message importance multiplier.
#[derive(Debug, Clone)]
pub struct MessageAnalysis {
    ctx: Arc<AnalysisContext>,
}

impl MessageAnalysis {
    pub fn new(ctx: Arc<AnalysisContext>) -> Self {
        Self { ctx }
    }

    /// Returns 1.0 for messages outside the dominant language. Otherwise
    /// the dominant keyword, attached media and a water height each raise
    /// the multiplier.
    pub fn multiplier(&self, msg: &Message) -> f64 {
        let mut res = 1.0;
        if msg.language != self.ctx.language {
            return res;
        }
        if msg.has_keyword(&self.ctx.keyword) {
            res *= KEYWORD_FACTOR;
        }
        if msg.has_media() {
            res *= MEDIA_FACTOR;
        }
        if Pattern::WaterHeight.exists(&msg.text) {
            res *= WATER_HEIGHT_FACTOR;
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn analysis() -> MessageAnalysis {
        MessageAnalysis::new(Arc::new(AnalysisContext::new("English", "flood")))
    }

    fn msg(text: &str) -> Message {
        Message::new("1", text, Utc::now(), "someone").with_language("English")
    }

    #[test]
    fn test_plain_message_is_neutral() {
        assert_eq!(analysis().multiplier(&msg("nothing special here")), 1.0);
    }

    #[test]
    fn test_factors_multiply() {
        let m = msg("water is 2m deep on main street")
            .with_keywords(["flood"])
            .with_photos(["https://example.org/a.jpg"]);
        let expected = 1.01 * 1.02 * 1.05;
        assert!((analysis().multiplier(&m) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_keyword_only() {
        let m = msg("nothing special").with_keywords(["rain", "flood"]);
        assert!((analysis().multiplier(&m) - 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_other_language_skips_factors() {
        let m = msg("water is 2m deep")
            .with_keywords(["flood"])
            .with_language("Dutch");
        assert_eq!(analysis().multiplier(&m), 1.0);
    }
}
