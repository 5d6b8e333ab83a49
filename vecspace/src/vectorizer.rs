use std::collections::HashMap;
use std::sync::Arc;

use floodlens_message::Message;
use floodlens_text::Cleaner;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::VecError;
use crate::sparse::SparseVector;

/// Words of two or more word characters, matched on lowercased text.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").unwrap_or_else(|e| panic!("vecspace: invalid token pattern: {e}"))
});

/// VectorizerConfig controls term extraction and weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    /// Weight terms by inverse document frequency instead of raw counts.
    /// Default: false.
    pub idf: bool,

    /// Smallest n-gram length. Default: 1.
    pub ngram_min: usize,

    /// Largest n-gram length. Default: 3.
    pub ngram_max: usize,

    /// Terms present in more documents than this are dropped.
    /// Default: 10000.
    pub max_df: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            idf: false,
            ngram_min: 1,
            ngram_max: 3,
            max_df: 10_000,
        }
    }
}

impl VectorizerConfig {
    pub fn with_defaults(mut self) -> Self {
        let d = Self::default();
        if self.ngram_min == 0 {
            self.ngram_min = d.ngram_min;
        }
        if self.ngram_max < self.ngram_min {
            self.ngram_max = self.ngram_min.max(d.ngram_max);
        }
        if self.max_df == 0 {
            self.max_df = d.max_df;
        }
        self
    }

    /// Terms must appear in at least this many of `n` documents.
    pub fn min_df(n: usize) -> usize {
        n / 1000 + 1
    }
}

/// A document-term matrix: one sparse row per document over a sorted vocabulary.
#[derive(Debug, Clone)]
pub struct TermMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<SparseVector>,
}

impl TermMatrix {
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of `term` in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<u32> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
            .map(|i| i as u32)
    }
}

/// Turns texts into weighted n-gram vectors.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    cfg: VectorizerConfig,
}

impl Vectorizer {
    pub fn new(cfg: VectorizerConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
        }
    }

    /// Vectorizer with raw term counts.
    pub fn counts() -> Self {
        Self::default()
    }

    /// Vectorizer with l2-normalized tf-idf weights.
    pub fn tfidf() -> Self {
        Self::new(VectorizerConfig {
            idf: true,
            ..VectorizerConfig::default()
        })
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.cfg
    }

    /// Vectorizes the processed text of `messages`, cleaning any message
    /// that has not been cleaned yet.
    pub fn vectorize_messages(
        &self,
        messages: &[Arc<Message>],
        cleaner: &Cleaner,
    ) -> Result<TermMatrix, VecError> {
        let texts: Vec<&str> = messages.iter().map(|m| cleaner.processed(m)).collect();
        self.vectorize(&texts)
    }

    pub fn vectorize<S: AsRef<str>>(&self, texts: &[S]) -> Result<TermMatrix, VecError> {
        if texts.is_empty() {
            return Err(VecError::EmptyInput);
        }
        let n = texts.len();
        let min_df = VectorizerConfig::min_df(n);
        let max_df = self.cfg.max_df;
        if max_df < min_df {
            return Err(VecError::Vectorization(format!(
                "max_df {max_df} is below min_df {min_df}"
            )));
        }

        let docs: Vec<HashMap<String, usize>> =
            texts.iter().map(|t| self.term_counts(t.as_ref())).collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(VecError::Vectorization(
                "empty vocabulary, documents contain no terms".into(),
            ));
        }

        let mut vocabulary: Vec<String> = df
            .iter()
            .filter(|&(_, &count)| count >= min_df && count <= max_df)
            .map(|(term, _)| term.to_string())
            .collect();
        if vocabulary.is_empty() {
            return Err(VecError::Vectorization(format!(
                "no terms remain after pruning (min_df={min_df}, max_df={max_df})"
            )));
        }
        vocabulary.sort();

        let index: HashMap<&str, u32> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i as u32))
            .collect();

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1.
        let idf: Option<Vec<f64>> = self.cfg.idf.then(|| {
            vocabulary
                .iter()
                .map(|t| ((1 + n) as f64 / (1 + df[t.as_str()]) as f64).ln() + 1.0)
                .collect()
        });

        let rows = docs
            .iter()
            .map(|doc| {
                let mut row = SparseVector::from_pairs(doc.iter().filter_map(|(term, &count)| {
                    let i = *index.get(term.as_str())?;
                    let weight = match &idf {
                        Some(idf) => count as f64 * idf[i as usize],
                        None => count as f64,
                    };
                    Some((i, weight))
                }));
                if idf.is_some() {
                    row.normalize();
                }
                row
            })
            .collect();

        Ok(TermMatrix { vocabulary, rows })
    }

    fn term_counts(&self, text: &str) -> HashMap<String, usize> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN.find_iter(&lower).map(|m| m.as_str()).collect();
        let mut counts = HashMap::new();
        for n in self.cfg.ngram_min..=self.cfg.ngram_max {
            if n > tokens.len() {
                break;
            }
            for gram in tokens.windows(n) {
                *counts.entry(gram.join(" ")).or_insert(0) += 1;
            }
        }
        counts
    }
}
