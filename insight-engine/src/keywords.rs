//! Unsupervised single-word keyword ranking (YAKE).
//!
//! Each term is scored from casing, position, frequency, context dispersion and
//! sentence spread. Lower scores are more relevant.

use crate::stopwords::StopWords;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_KEYWORDS: usize = 15;

/// Co-occurrence window, in tokens.
const WINDOW_SIZE: usize = 1;
const MIN_KEYWORD_CHARS: usize = 3;

static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?\n]+").expect("sentence regex is valid"));
static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[,;:()\[\]{}"“”]+"#).expect("block regex is valid"));
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*").expect("token regex is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedKeyword {
    pub keyword: String,
    pub score: f64,
}

impl RankedKeyword {
    pub fn display_score(&self) -> f64 {
        (self.score * 10_000.0).round() / 10_000.0
    }
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    top: usize,
    stopwords: StopWords,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_KEYWORDS, StopWords::english())
    }
}

impl KeywordExtractor {
    pub fn new(top: usize, stopwords: StopWords) -> Self {
        Self { top, stopwords }
    }

    /// Up to `top` keywords, most relevant first. Empty or stopword-only text yields none.
    pub fn extract(&self, text: &str) -> Vec<RankedKeyword> {
        Document::parse(text, &self.stopwords).rank(self.top)
    }
}

#[derive(Debug)]
struct Term {
    surface: String,
    tf: f64,
    tf_acronym: f64,
    tf_capitalized: f64,
    sentences: BTreeSet<usize>,
    left: HashMap<usize, f64>,
    right: HashMap<usize, f64>,
    stopword: bool,
    numeric: bool,
}

impl Term {
    fn new(surface: &str, key: &str, stopwords: &StopWords) -> Self {
        Self {
            surface: surface.to_string(),
            tf: 0.0,
            tf_acronym: 0.0,
            tf_capitalized: 0.0,
            sentences: BTreeSet::new(),
            left: HashMap::new(),
            right: HashMap::new(),
            stopword: stopwords.contains(key) || key.chars().count() < MIN_KEYWORD_CHARS,
            numeric: key.chars().all(char::is_numeric),
        }
    }

    fn is_candidate(&self) -> bool {
        !self.stopword
            && !self.numeric
            && !self.surface.chars().next().is_some_and(|c| c.is_ascii_digit())
    }

    fn median_sentence(&self) -> f64 {
        let ids: Vec<usize> = self.sentences.iter().copied().collect();
        let mid = ids.len() / 2;
        if ids.len() % 2 == 0 {
            (ids[mid - 1] + ids[mid]) as f64 / 2.0
        } else {
            ids[mid] as f64
        }
    }
}

/// Distinct neighbours over total co-occurrence weight.
fn dispersion(edges: &HashMap<usize, f64>) -> f64 {
    let weight: f64 = edges.values().sum();
    if weight > 0.0 {
        edges.len() as f64 / weight
    } else {
        0.0
    }
}

fn is_acronym(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

#[derive(Debug, Default)]
struct Document {
    terms: Vec<Term>,
    sentence_count: usize,
}

impl Document {
    fn parse(text: &str, stopwords: &StopWords) -> Self {
        let mut doc = Document::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for sentence in SENTENCE_RE.split(text) {
            let mut position = 0usize;

            for block in BLOCK_RE.split(sentence) {
                let mut window: Vec<Option<usize>> = Vec::with_capacity(WINDOW_SIZE + 1);

                for token in TOKEN_RE.find_iter(block).map(|m| m.as_str()) {
                    let key = token.to_lowercase();
                    let id = match index.get(&key) {
                        Some(&id) => id,
                        None => {
                            let id = doc.terms.len();
                            doc.terms.push(Term::new(token, &key, stopwords));
                            index.insert(key, id);
                            id
                        }
                    };

                    let term = &mut doc.terms[id];
                    term.tf += 1.0;
                    term.sentences.insert(doc.sentence_count);
                    if is_acronym(token) {
                        term.tf_acronym += 1.0;
                    } else if position > 0 && token.chars().next().is_some_and(char::is_uppercase) {
                        term.tf_capitalized += 1.0;
                    }
                    position += 1;

                    let numeric = term.numeric;
                    if !numeric {
                        for prev in window.iter().flatten().copied() {
                            *doc.terms[prev].right.entry(id).or_insert(0.0) += 1.0;
                            *doc.terms[id].left.entry(prev).or_insert(0.0) += 1.0;
                        }
                    }
                    window.push((!numeric).then_some(id));
                    if window.len() > WINDOW_SIZE {
                        window.remove(0);
                    }
                }
            }

            if position > 0 {
                doc.sentence_count += 1;
            }
        }

        doc
    }

    fn rank(&self, top: usize) -> Vec<RankedKeyword> {
        let valid: Vec<f64> = self
            .terms
            .iter()
            .filter(|t| !t.stopword && !t.numeric)
            .map(|t| t.tf)
            .collect();
        if valid.is_empty() {
            return Vec::new();
        }

        let mean = valid.iter().sum::<f64>() / valid.len() as f64;
        let variance = valid.iter().map(|tf| (tf - mean).powi(2)).sum::<f64>() / valid.len() as f64;
        let tf_norm_base = mean + variance.sqrt();
        let max_tf = self.terms.iter().map(|t| t.tf).fold(0.0, f64::max);

        let mut ranked: Vec<(usize, f64)> = self
            .terms
            .iter()
            .enumerate()
            .filter(|(_, term)| term.is_candidate())
            .map(|(id, term)| {
                let h = self.term_weight(term, tf_norm_base, max_tf);
                (id, h / ((1.0 + h) * term.tf))
            })
            .collect();

        // Ties keep first-appearance order.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(top)
            .map(|(id, score)| RankedKeyword {
                keyword: self.terms[id].surface.clone(),
                score,
            })
            .collect()
    }

    fn term_weight(&self, term: &Term, tf_norm_base: f64, max_tf: f64) -> f64 {
        let casing = term.tf_acronym.max(term.tf_capitalized) / (1.0 + term.tf.ln());
        let position = (3.0 + term.median_sentence()).ln().ln();
        let frequency = term.tf / tf_norm_base;
        let relatedness =
            1.0 + (dispersion(&term.left) + dispersion(&term.right)) * (term.tf / max_tf);
        let spread = term.sentences.len() as f64 / self.sentence_count.max(1) as f64;

        (position * relatedness) / (casing + (frequency + spread) / relatedness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::default()
    }

    #[test]
    fn test_empty_text_has_no_keywords() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n  ").is_empty());
    }

    #[test]
    fn test_stopword_only_text_has_no_keywords() {
        assert!(extractor().extract("the and of it is was").is_empty());
    }

    #[test]
    fn test_scores_ascending_and_bounded() {
        let text = "The guitar solo was amazing. That guitar tone is great. \
                    Best guitar ever. I ate a banana.";
        let keywords = KeywordExtractor::new(3, StopWords::english()).extract(text);

        assert_eq!(keywords.len(), 3);
        assert!(keywords.windows(2).all(|w| w[0].score <= w[1].score));
        assert!(keywords.iter().all(|k| k.score > 0.0));
    }

    #[test]
    fn test_frequent_term_beats_single_mention() {
        let text = "The guitar solo was amazing. That guitar tone is great. \
                    Best guitar ever. I ate a banana.";
        let keywords = extractor().extract(text);
        let score_of = |word: &str| {
            keywords
                .iter()
                .find(|k| k.keyword == word)
                .map(|k| k.score)
                .unwrap()
        };
        assert!(score_of("guitar") < score_of("banana"));
    }

    #[test]
    fn test_case_variants_merge_into_one_keyword() {
        let keywords = extractor().extract("guitar rocks. The GUITAR rocks. My Guitar rocks.");
        let guitars = keywords
            .iter()
            .filter(|k| k.keyword.eq_ignore_ascii_case("guitar"))
            .count();
        assert_eq!(guitars, 1);
    }

    #[test]
    fn test_numbers_and_short_tokens_excluded() {
        let keywords = extractor().extract("2024 was ok. 3d printing at 60fps is wild.");
        assert!(keywords.iter().all(|k| k.keyword.chars().count() >= MIN_KEYWORD_CHARS));
        assert!(keywords
            .iter()
            .all(|k| !k.keyword.starts_with(|c: char| c.is_ascii_digit())));
        assert!(keywords.iter().any(|k| k.keyword == "printing"));
    }

    #[test]
    fn test_extra_stopwords_respected() {
        let stopwords = StopWords::english().with_words(["guitar"]);
        let keywords = KeywordExtractor::new(15, stopwords).extract("guitar guitar amazing tone");
        assert!(keywords.iter().all(|k| k.keyword != "guitar"));
    }

    #[test]
    fn test_display_score_rounds_to_four_places() {
        let keyword = RankedKeyword {
            keyword: "guitar".to_string(),
            score: 0.123_456,
        };
        assert_eq!(keyword.display_score(), 0.1235);
    }
}
