use std::fmt;
use std::sync::Arc;

use floodlens_message::{AnalysisContext, Message};
use rust_stemmers::Stemmer;

use crate::Pattern;
use crate::stem::stemmer_for;

const MARK_REPLY: &str = "MarkReply";
const MARK_LOCATION: &str = "MarkLocation";
const MARK_WEBSITE: &str = "MarkWebsite";
const MARK_PHOTO: &str = "MarkPhoto";

/// Rewrites messages into the marker-enriched text used for vectorization.
///
/// Mentions, links, media, heights, times, dates and numbers are replaced by
/// fixed `Mark*` tokens so that messages sharing a structure look alike to
/// a bag-of-n-grams model. The author and detected language become tokens
/// too.
pub struct Cleaner {
    ctx: Arc<AnalysisContext>,
    stemmer: Option<Stemmer>,
}

impl fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("language", &self.ctx.language)
            .field("stemming", &self.stemmer.is_some())
            .finish()
    }
}

impl Cleaner {
    pub fn new(ctx: Arc<AnalysisContext>) -> Self {
        let stemmer = stemmer_for(&ctx.language);
        if stemmer.is_none() {
            tracing::warn!(language = %ctx.language, "no stemmer for language, stemming disabled");
        }
        Self { ctx, stemmer }
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    /// Returns the processed text of `msg`, cleaning it on first access.
    pub fn processed<'m>(&self, msg: &'m Message) -> &'m str {
        msg.processed_or_init(|| self.clean(msg))
    }

    /// Cleans `msg` without touching its cache.
    pub fn clean(&self, msg: &Message) -> String {
        let mut text = if Pattern::Reply.exists(&msg.text) {
            format!("{MARK_REPLY} {}", msg.text)
        } else {
            msg.text.clone()
        };

        for location in &self.ctx.locations {
            if !location.is_empty() && text.contains(location.as_str()) {
                text.push(' ');
                text.push_str(MARK_LOCATION);
            }
        }

        if let Some(stemmer) = &self.stemmer {
            text = text
                .split_whitespace()
                .map(|token| {
                    if msg.keywords.iter().any(|k| k == token)
                        || token.contains(MARK_REPLY)
                        || token.contains(MARK_LOCATION)
                    {
                        token.to_string()
                    } else {
                        stemmer.stem(&token.to_lowercase()).into_owned()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
        }

        text = format!("Mark{} {}", msg.language, text);

        text = Pattern::Website.replace(&text, MARK_WEBSITE).into_owned();
        for _ in 0..msg.media_count() {
            text = replace_last(&text, MARK_WEBSITE, MARK_PHOTO);
        }

        text = Pattern::WaterHeight.replace(&text, "MarkHeight").into_owned();
        text = Pattern::Time.replace(&text, "MarkTime").into_owned();
        text = Pattern::Date.replace(&text, "MarkDate").into_owned();
        text = Pattern::Number.replace(&text, "MarkNumber").into_owned();
        text = text.replace('\n', " ");

        for _ in 0..Pattern::Users.count(&text) {
            text.push_str(" MarkUserName");
        }
        for _ in 0..Pattern::Hashtag.count(&text) {
            text.push_str(" MarkHashTag");
        }

        text = format!("Sender{} {}", msg.username, text);
        text.retain(|c| !matches!(c, '#' | '.' | ',' | ':'));
        text
    }
}

/// Replaces the last occurrence of `old` in `s` with `new`.
pub fn replace_last(s: &str, old: &str, new: &str) -> String {
    match s.rfind(old) {
        Some(pos) => {
            let mut out = String::with_capacity(s.len() + new.len());
            out.push_str(&s[..pos]);
            out.push_str(new);
            out.push_str(&s[pos + old.len()..]);
            out
        }
        None => s.to_string(),
    }
}
