//! Clarity: filler word rate (0-15)

use super::{round2, CategoryRule};
use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::rubric::ClarityRubric;
use crate::{Category, ClarityScore};
use std::collections::HashSet;

/// Rule scoring how often the speaker leans on fillers.
///
/// Single-word fillers must match a whole token exactly ("um," does not count as
/// "um"); phrase fillers are counted as substrings of the lower-cased text.
pub struct ClarityRule<'r> {
    rubric: &'r ClarityRubric,
}

impl<'r> ClarityRule<'r> {
    pub fn new(rubric: &'r ClarityRubric) -> Self {
        Self { rubric }
    }

    pub fn count_fillers(&self, transcript: &Transcript<'_>) -> usize {
        let singles: HashSet<&str> = self.rubric.single_word_fillers().collect();
        let token_hits = transcript
            .lower_tokens()
            .filter(|token| singles.contains(token))
            .count();
        let phrase_hits: usize = self
            .rubric
            .multi_word_fillers()
            .map(|phrase| transcript.count_occurrences(phrase))
            .sum();
        token_hits + phrase_hits
    }
}

impl CategoryRule for ClarityRule<'_> {
    type Output = ClarityScore;

    fn name(&self) -> &'static str {
        "clarity"
    }

    fn category(&self) -> Category {
        Category::Clarity
    }

    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<ClarityScore, ScoringError> {
        let word_count = transcript.lower_tokens().count();
        if word_count == 0 {
            return Ok(ClarityScore {
                filler_word_count: 0,
                filler_word_rate_percent: 0.0,
                score: Category::Clarity.max_score(),
            });
        }

        let fillers = self.count_fillers(transcript);
        let rate = fillers as f64 / word_count as f64 * 100.0;
        Ok(ClarityScore {
            filler_word_count: fillers,
            filler_word_rate_percent: round2(rate),
            score: self.rubric.bands.score(rate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Rubric;

    /// `fillers` copies of "um" followed by plain words up to `total` tokens
    fn text_with_fillers(fillers: usize, total: usize) -> String {
        let mut tokens = vec!["um".to_string(); fillers];
        tokens.extend((fillers..total).map(|i| format!("w{}", i)));
        tokens.join(" ")
    }

    fn score(text: &str) -> ClarityScore {
        ClarityRule::new(&Rubric::standard().clarity)
            .evaluate(&Transcript::new(text))
            .unwrap()
    }

    #[test]
    fn test_no_fillers_full_marks() {
        let result = score(&text_with_fillers(0, 30));
        assert_eq!(result.filler_word_count, 0);
        assert_eq!(result.filler_word_rate_percent, 0.0);
        assert_eq!(result.score, 15);
    }

    #[test]
    fn test_rate_bands() {
        assert_eq!(score(&text_with_fillers(2, 100)).score, 15);
        assert_eq!(score(&text_with_fillers(5, 100)).score, 12);
        assert_eq!(score(&text_with_fillers(8, 100)).score, 9);
        assert_eq!(score(&text_with_fillers(10, 100)).score, 6);
        assert_eq!(score(&text_with_fillers(20, 100)).score, 3);
    }

    #[test]
    fn test_rate_between_bands_takes_fallback() {
        // 1 in 29 words = 3.45%, between the 3 and 4 bands
        let result = score(&text_with_fillers(1, 29));
        assert_eq!(result.filler_word_rate_percent, 3.45);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_phrase_fillers_counted_as_substrings() {
        let result = ClarityRule::new(&Rubric::standard().clarity)
            .count_fillers(&Transcript::new("You know what I mean, it was sort of fun"));
        assert_eq!(result, 3);
    }

    #[test]
    fn test_punctuated_token_is_not_a_filler() {
        let rule = ClarityRule::new(&Rubric::standard().clarity);
        assert_eq!(rule.count_fillers(&Transcript::new("Um, well")), 1);
        assert_eq!(rule.count_fillers(&Transcript::new("UM well LIKE")), 3);
    }
}
