use crate::stopwords::StopWords;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

pub const MAX_CLOUD_WORDS: usize = 200;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w']+").expect("word regex is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedWord {
    pub word: String,
    pub count: usize,
    /// Frequency relative to the most frequent word, in `(0, 1]`.
    pub weight: f32,
}

/// Word frequencies ready for rendering, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordCloud {
    pub words: Vec<WeightedWord>,
}

#[derive(Debug, Default)]
struct CaseGroup {
    first_seen: usize,
    /// Surface forms with counts, in first-seen order.
    forms: Vec<(String, usize)>,
}

impl CaseGroup {
    fn add(&mut self, form: &str, count: usize) {
        match self.forms.iter_mut().find(|(f, _)| f == form) {
            Some((_, n)) => *n += count,
            None => self.forms.push((form.to_string(), count)),
        }
    }

    fn total(&self) -> usize {
        self.forms.iter().map(|(_, n)| n).sum()
    }

    fn dominant_form(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.forms {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(form, _)| form.as_str()).unwrap_or_default()
    }
}

impl WordCloud {
    pub fn generate(text: &str, stopwords: &StopWords, max_words: usize) -> Self {
        let mut groups: HashMap<String, CaseGroup> = HashMap::new();

        for (position, raw) in WORD_RE.find_iter(text).map(|m| m.as_str()).enumerate() {
            let word = strip_possessive(raw);
            if word.is_empty() || word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if stopwords.contains(word) {
                continue;
            }
            groups
                .entry(word.to_lowercase())
                .or_insert_with(|| CaseGroup {
                    first_seen: position,
                    forms: Vec::new(),
                })
                .add(word, 1);
        }

        fold_plurals(&mut groups);

        let mut counted: Vec<(usize, usize, String)> = groups
            .values()
            .map(|g| (g.total(), g.first_seen, g.dominant_form().to_string()))
            .collect();
        counted.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        counted.truncate(max_words);

        let max_count = counted.first().map(|c| c.0).unwrap_or(0);
        let words = counted
            .into_iter()
            .map(|(count, _, word)| WeightedWord {
                word,
                count,
                weight: count as f32 / max_count as f32,
            })
            .collect();

        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("'S"))
        .unwrap_or(word)
}

/// Merges "cats" into "cat" when both occur. "glass" is left alone.
fn fold_plurals(groups: &mut HashMap<String, CaseGroup>) {
    let plurals: Vec<String> = groups
        .keys()
        .filter(|key| key.ends_with('s') && !key.ends_with("ss"))
        .filter(|key| groups.contains_key(&key[..key.len() - 1]))
        .cloned()
        .collect();

    for plural in plurals {
        let Some(group) = groups.remove(&plural) else {
            continue;
        };
        let total = group.total();
        if let Some(singular) = groups.get_mut(&plural[..plural.len() - 1]) {
            let form = singular.dominant_form().to_string();
            singular.add(&form, total);
            singular.first_seen = singular.first_seen.min(group.first_seen);
        }
    }
}
