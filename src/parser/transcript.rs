//! Transcript tokenization and case-insensitive pattern lookup

/// A transcript prepared for analysis: the raw text plus its lower-cased form.
///
/// All substring matching is done against the lower-cased text. Tokens are
/// whitespace-delimited; punctuation stays attached ("morning," is one token).
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Transcript<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.raw.split_whitespace().count()
    }

    /// Lower-cased whitespace tokens
    pub fn lower_tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.lower.split_whitespace()
    }

    /// True if any pattern occurs anywhere in the lower-cased text
    pub fn contains_any<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        patterns.iter().any(|p| self.lower.contains(p.as_ref()))
    }

    /// Byte offset of the first pattern, in list order, that occurs in the text.
    ///
    /// List order decides: an earlier pattern wins even when a later one occurs
    /// at a smaller offset.
    pub fn first_position<S: AsRef<str>>(&self, patterns: &[S]) -> Option<usize> {
        patterns.iter().find_map(|p| self.lower.find(p.as_ref()))
    }

    /// Non-overlapping occurrences of `pattern` in the lower-cased text
    pub fn count_occurrences(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        self.lower.matches(pattern).count()
    }
}
