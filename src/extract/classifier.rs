//! Keyword classification
//!
//! Scores text against ordered keyword sets. Category ordering encodes
//! priority: the first registered category achieving the best score wins,
//! so a more specific category registered earlier beats a generic one with
//! an equal score.

/// One registered category with its trigger keywords.
#[derive(Debug, Clone)]
pub struct ClassifierEntry {
    pub category: String,
    pub keywords: Vec<String>,
}

impl ClassifierEntry {
    pub fn new(category: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            category: category.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Substring-counting classifier over an ordered category table.
///
/// The table is supplied at construction and never mutated.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    entries: Vec<ClassifierEntry>,
}

impl KeywordClassifier {
    pub fn new(entries: Vec<ClassifierEntry>) -> Self {
        Self { entries }
    }

    /// Best-matching category, or None when no keyword occurs at all.
    pub fn classify(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for entry in &self.entries {
            let score = entry
                .keywords
                .iter()
                .filter(|kw| lower.contains(kw.as_str()))
                .count();
            // Strictly greater: earlier registration wins ties.
            if score >= 1 && best.map_or(true, |(_, s)| score > s) {
                best = Some((&entry.category, score));
            }
        }

        best.map(|(category, _)| category)
    }
}
