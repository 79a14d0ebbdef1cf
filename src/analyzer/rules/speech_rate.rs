//! Speech rate: words per minute over an assumed speaking duration (0-10)

use super::CategoryRule;
use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::rubric::SpeechRateRubric;
use crate::{Category, SpeechRateScore};

/// Rule scoring speaking pace.
///
/// Transcripts carry no timing, so every one is assumed to last the rubric's
/// `assumed_duration_secs`. The band lookup uses the exact rate; the reported
/// `wpm` is truncated.
pub struct SpeechRateRule<'r> {
    rubric: &'r SpeechRateRubric,
}

impl<'r> SpeechRateRule<'r> {
    pub fn new(rubric: &'r SpeechRateRubric) -> Self {
        Self { rubric }
    }

    pub fn words_per_minute(&self, word_count: usize) -> f64 {
        word_count as f64 / (self.rubric.assumed_duration_secs / 60.0)
    }
}

impl CategoryRule for SpeechRateRule<'_> {
    type Output = SpeechRateScore;

    fn name(&self) -> &'static str {
        "speech-rate"
    }

    fn category(&self) -> Category {
        Category::SpeechRate
    }

    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<SpeechRateScore, ScoringError> {
        let wpm = self.words_per_minute(transcript.word_count());
        Ok(SpeechRateScore {
            wpm: wpm as u32,
            score: self.rubric.bands.score(wpm),
        })
    }
}
