use std::collections::HashSet;

/// Common English function words, matching the set word-cloud generators ship with.
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm", "i've",
    "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should",
    "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the", "their",
    "theirs", "them", "themselves", "then", "there", "there's", "therefore", "these", "they",
    "they'd", "they'll", "they're", "they've", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while", "who",
    "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www", "you",
    "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Words that dominate any comment section without saying anything about the video.
pub const NOISE_WORDS: &[&str] = &[
    "video",
    "like",
    "subscribe",
    "please",
    "watch",
    "channel",
    "https",
];

/// Case-insensitive stopword set.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        Self::default().with_words(ENGLISH.iter().copied())
    }

    /// English stopwords plus comment-section noise words, used for word clouds.
    pub fn for_word_clouds() -> Self {
        Self::english().with_words(NOISE_WORDS.iter().copied())
    }

    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let stopwords = StopWords::english();
        assert!(stopwords.contains("The"));
        assert!(stopwords.contains("DON'T"));
        assert!(!stopwords.contains("guitar"));
    }

    #[test]
    fn test_word_cloud_set_adds_noise_words() {
        let english = StopWords::english();
        let cloud = StopWords::for_word_clouds();
        assert!(!english.contains("subscribe"));
        for word in NOISE_WORDS {
            assert!(cloud.contains(word), "{word}");
        }
        assert!(cloud.words.len() > english.words.len());
    }

    #[test]
    fn test_extra_words() {
        let stopwords = StopWords::english().with_words(["  Bro ", "LOL"]);
        assert!(stopwords.contains("bro"));
        assert!(stopwords.contains("lol"));
    }
}
