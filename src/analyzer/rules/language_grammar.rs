//! Language & grammar: grammar error density plus vocabulary richness (0-20)

use super::CategoryRule;
use crate::collaborators::GrammarChecker;
use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::rubric::Rubric;
use crate::{Category, LanguageScore};
use std::collections::HashSet;

/// Rule scoring grammar and vocabulary.
///
/// Without a grammar checker the transcript is treated as error-free.
pub struct LanguageGrammarRule<'r> {
    rubric: &'r Rubric,
    checker: Option<&'r dyn GrammarChecker>,
}

impl<'r> LanguageGrammarRule<'r> {
    pub fn new(rubric: &'r Rubric) -> Self {
        Self {
            rubric,
            checker: None,
        }
    }

    pub fn with_checker(mut self, checker: Option<&'r dyn GrammarChecker>) -> Self {
        self.checker = checker;
        self
    }

    /// `1 - min(errors per 100 words / ceiling, 1)`
    fn grammar_ratio(&self, errors: usize, word_count: usize) -> f64 {
        let per_100 = errors as f64 / word_count as f64 * 100.0;
        1.0 - (per_100 / self.rubric.grammar.errors_per_100_ceiling).min(1.0)
    }

    /// Distinct lower-cased tokens over total tokens
    fn type_token_ratio(transcript: &Transcript<'_>) -> f64 {
        let mut total = 0usize;
        let mut distinct = HashSet::new();
        for token in transcript.lower_tokens() {
            total += 1;
            distinct.insert(token);
        }
        if total == 0 {
            return 0.0;
        }
        distinct.len() as f64 / total as f64
    }

    fn count_errors(&self, text: &str) -> Result<usize, ScoringError> {
        match self.checker {
            Some(checker) => checker
                .check(text)
                .map_err(|e| ScoringError::evaluation(Category::LanguageAndGrammar, e)),
            None => Ok(0),
        }
    }
}

impl CategoryRule for LanguageGrammarRule<'_> {
    type Output = LanguageScore;

    fn name(&self) -> &'static str {
        "language-grammar"
    }

    fn category(&self) -> Category {
        Category::LanguageAndGrammar
    }

    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<LanguageScore, ScoringError> {
        let word_count = transcript.word_count();
        if word_count == 0 {
            return Ok(LanguageScore::new(0, 0));
        }

        let errors = self.count_errors(transcript.raw())?;
        let grammar_ratio = self.grammar_ratio(errors, word_count);
        let ttr = Self::type_token_ratio(transcript);
        tracing::trace!(errors, grammar_ratio, ttr, "language metrics");

        Ok(LanguageScore::new(
            self.rubric.grammar.bands.score(grammar_ratio),
            self.rubric.vocabulary.score(ttr),
        ))
    }
}
