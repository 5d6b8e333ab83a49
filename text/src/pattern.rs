use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Expressions recognised in message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Clock times: `23:59`, `9am`, `8 o'clock`.
    Time,
    /// Numeric dates: `2016-01-02`, `02/01/2016`.
    Date,
    /// Shortened links.
    Website,
    /// `@user` mentions.
    Users,
    /// Bare numbers.
    Number,
    /// `#tag` hashtags.
    Hashtag,
    FootHeight,
    MeterHeight,
    CmHeight,
    /// Any water height expression in feet, meters or centimeters.
    WaterHeight,
    /// Messages opening with a mention.
    Reply,
    /// All-clear bulletins such as "0 Flood Warnings".
    FalseAlarm,
    /// Strings that look like a file name.
    File,
}

// Look-behind/ahead on \W is a word boundary here: every alternative starts
// and ends on a word character.
static TIME: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"\b([0-1]?[0-9]|2[0-3])((:[0-5][0-9])(:[0-5][0-9])?|( )?[AaPp][Mm]|(:[0-5][0-9])(:[0-5][0-9])?( )?[AaPp][Mm]| o'clock)\b",
    )
});
static DATE: Lazy<Regex> =
    Lazy::new(|| compile(r"(([0-9]){2,4})[/-](([0-9]){2})[/-](([0-9]){2,4})"));
static WEBSITE: Lazy<Regex> = Lazy::new(|| compile(r"https://t\.co/(\S){0,12}"));
static USERS: Lazy<Regex> = Lazy::new(|| compile(r"(^|[^@\w])@(\w{1,15})"));
static NUMBER: Lazy<Regex> = Lazy::new(|| compile(r"\b(\d+(.\d+)?)\b"));
static HASHTAG: Lazy<Regex> = Lazy::new(|| compile(r"#(\S*)"));
static FOOT_HEIGHT: Lazy<Regex> =
    Lazy::new(|| compile(r"\s((\d{1,2})(\.(\d{1,2}))?)(\W?)(ft[\.|]\W|feet|foot)"));
static METER_HEIGHT: Lazy<Regex> =
    Lazy::new(|| compile(r"\s((\d{1,2})(\.(\d{1,2}))?)(\W?)(meter[s|]\W|m\W)"));
static CM_HEIGHT: Lazy<Regex> =
    Lazy::new(|| compile(r"\s((\d{1,2})(\.(\d{1,2}))?)(\W?)(centimeter[s|]\W|cm\W)"));
static WATER_HEIGHT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"\s((\d{1,2})(\.(\d{1,2}))?)(\W?)(ft|feet|foot|meter[s|]\W|m\W|centimeter[s|]\W|cm\W)",
    )
});
static REPLY: Lazy<Regex> = Lazy::new(|| compile(r"^@([a-zA-Z0-9]*) (.*)"));
static FALSE_ALARM: Lazy<Regex> = Lazy::new(|| compile(r"^0( Severe)? Flood (Warning|Alert)"));
static FILE: Lazy<Regex> = Lazy::new(|| compile(r".*\.\w{3,4}"));

fn compile(src: &str) -> Regex {
    Regex::new(src).unwrap_or_else(|e| panic!("text: invalid built-in pattern {src:?}: {e}"))
}

impl Pattern {
    /// Returns the compiled expression.
    pub fn regex(self) -> &'static Regex {
        match self {
            Pattern::Time => &TIME,
            Pattern::Date => &DATE,
            Pattern::Website => &WEBSITE,
            Pattern::Users => &USERS,
            Pattern::Number => &NUMBER,
            Pattern::Hashtag => &HASHTAG,
            Pattern::FootHeight => &FOOT_HEIGHT,
            Pattern::MeterHeight => &METER_HEIGHT,
            Pattern::CmHeight => &CM_HEIGHT,
            Pattern::WaterHeight => &WATER_HEIGHT,
            Pattern::Reply => &REPLY,
            Pattern::FalseAlarm => &FALSE_ALARM,
            Pattern::File => &FILE,
        }
    }

    /// Replaces every non-overlapping match with `with`, taken literally.
    pub fn replace<'a>(self, input: &'a str, with: &str) -> Cow<'a, str> {
        self.regex().replace_all(input, NoExpand(with))
    }

    /// Returns true if the expression matches anywhere in `input`.
    pub fn exists(self, input: &str) -> bool {
        self.regex().is_match(input)
    }

    /// Counts non-overlapping matches.
    pub fn count(self, input: &str) -> usize {
        self.regex().find_iter(input).count()
    }

    /// Returns capture group `group` of the first match.
    pub fn capture(self, input: &str, group: usize) -> Option<&str> {
        self.regex()
            .captures(input)
            .and_then(|caps| caps.get(group))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_hashtags() {
        assert_eq!(
            Pattern::Hashtag.count("#how #many #bloody #hashtags #do #you #want?"),
            7
        );
    }

    #[test]
    fn test_date_exists() {
        assert!(Pattern::Date.exists("2016-42-2016"));
        assert!(Pattern::Date.exists("on 02/01/2016 the dike broke"));
        assert!(!Pattern::Date.exists("2016"));
    }

    #[test]
    fn test_time_exists() {
        assert!(Pattern::Time.exists("8 o'clock"));
        assert!(Pattern::Time.exists("23:59 "));
        assert!(Pattern::Time.exists("at 7:15:30 pm"));
        assert!(!Pattern::Time.exists("room 24b"));
    }

    #[test]
    fn test_time_replace() {
        assert_eq!(
            Pattern::Time.replace("how late is it? it is 9am", "now"),
            "how late is it? it is now"
        );
    }

    #[test]
    fn test_number_needs_word_boundaries() {
        assert_eq!(Pattern::Number.replace("level 12 and 3.5", "N"), "level N and N");
        assert_eq!(Pattern::Number.replace("a12b", "N"), "a12b");
    }

    #[test]
    fn test_water_height() {
        assert!(Pattern::WaterHeight.exists("water is 2m deep"));
        assert!(Pattern::WaterHeight.exists("already 3 feet high"));
        assert!(Pattern::WaterHeight.exists("rose 40 cm overnight"));
        assert!(!Pattern::WaterHeight.exists("2 miles away"));
        assert!(Pattern::FootHeight.exists("about 4.5 foot"));
        assert!(!Pattern::MeterHeight.exists("about 4.5 foot"));
    }

    #[test]
    fn test_mentions_and_replies() {
        assert_eq!(Pattern::Users.count("@a hi @b and mail@host"), 2);
        assert!(Pattern::Reply.exists("@bob are you safe?"));
        assert!(!Pattern::Reply.exists("hi @bob"));
        assert_eq!(Pattern::Reply.capture("@bob are you safe?", 1), Some("bob"));
    }

    #[test]
    fn test_false_alarm() {
        assert!(Pattern::FalseAlarm.exists("0 Flood Warnings in force"));
        assert!(Pattern::FalseAlarm.exists("0 Severe Flood Alerts"));
        assert!(!Pattern::FalseAlarm.exists("3 Flood Warnings in force"));
    }

    #[test]
    fn test_website_replace_literal() {
        assert_eq!(
            Pattern::Website.replace("see https://t.co/wl5Ie6yI9r now", "$0"),
            "see $0 now"
        );
    }
}
