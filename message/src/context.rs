use serde::{Deserialize, Serialize};

use crate::analysis::DatasetProfile;

/// Values fixed for one analysis epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    /// Dominant language of the message set, e.g. "English".
    #[serde(default = "default_language")]
    pub language: String,

    /// Dominant tracking keyword.
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Known location names produced by an external entity tagger.
    #[serde(default)]
    pub locations: Vec<String>,
}

pub(crate) fn default_language() -> String {
    "english".to_string()
}

pub(crate) fn default_keyword() -> String {
    "flood".to_string()
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            language: default_language(),
            keyword: default_keyword(),
            locations: Vec::new(),
        }
    }
}

impl AnalysisContext {
    pub fn new(language: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            keyword: keyword.into(),
            locations: Vec::new(),
        }
    }

    /// Builds a context from a dataset profile and a location list.
    pub fn from_profile(profile: DatasetProfile, locations: Vec<String>) -> Self {
        Self {
            language: profile.language,
            keyword: profile.keyword,
            locations,
        }
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }
}
