//! Symptom text normalization and keyword matching.
//!
//! Symptom text is a comma-separated list of free-text phrases. Each phrase
//! is lower-cased, trimmed, and has inner whitespace collapsed; empty phrases
//! are discarded. A keyword matches a phrase when the phrase contains it, so
//! "sudden chest pain at rest" matches "chest pain".

/// Split `text` into normalized symptom fragments.
pub fn symptom_fragments(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A fixed set of symptom keywords.
#[derive(Debug, Clone, Default)]
pub struct SymptomMatcher {
    keywords: Vec<String>,
}

impl SymptomMatcher {
    /// Build a matcher. Keywords are normalized like fragments; blank and
    /// duplicate keywords are dropped, first occurrence wins.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = normalize(keyword.as_ref());
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self { keywords: normalized }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords found in any of `fragments`, in keyword order.
    pub fn matched(&self, fragments: &[String]) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|keyword| fragments.iter().any(|f| f.contains(keyword.as_str())))
            .cloned()
            .collect()
    }
}
