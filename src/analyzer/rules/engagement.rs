//! Engagement: sentiment positivity (0-15)

use super::{round2, CategoryRule};
use crate::collaborators::SentimentAnalyzer;
use crate::error::{CollaboratorError, ScoringError};
use crate::parser::Transcript;
use crate::rubric::BandTable;
use crate::{Category, EngagementScore};

/// Score for a transcript with nothing to analyze
const BLANK_ENGAGEMENT_SCORE: u8 = 3;

/// Rule scoring how positive the speaker sounds
pub struct EngagementRule<'r> {
    bands: &'r BandTable,
    analyzer: &'r dyn SentimentAnalyzer,
}

impl<'r> EngagementRule<'r> {
    pub fn new(bands: &'r BandTable, analyzer: &'r dyn SentimentAnalyzer) -> Self {
        Self { bands, analyzer }
    }

    /// Map a compound polarity in [-1, 1] to a probability in [0, 1]
    pub fn positive_probability(polarity: f64) -> f64 {
        (polarity + 1.0) / 2.0
    }

    fn polarity(&self, text: &str) -> Result<f64, CollaboratorError> {
        let polarity = self.analyzer.polarity(text)?;
        if !(-1.0..=1.0).contains(&polarity) {
            return Err(CollaboratorError::PolarityOutOfRange(polarity));
        }
        Ok(polarity)
    }
}

impl CategoryRule for EngagementRule<'_> {
    type Output = EngagementScore;

    fn name(&self) -> &'static str {
        "engagement"
    }

    fn category(&self) -> Category {
        Category::Engagement
    }

    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<EngagementScore, ScoringError> {
        if transcript.is_blank() {
            return Ok(EngagementScore {
                sentiment_positive_probability: 0.0,
                score: BLANK_ENGAGEMENT_SCORE,
            });
        }

        let polarity = self
            .polarity(transcript.raw())
            .map_err(|e| ScoringError::evaluation(Category::Engagement, e))?;
        let probability = Self::positive_probability(polarity);

        Ok(EngagementScore {
            sentiment_positive_probability: round2(probability),
            score: self.bands.score(probability),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::FixedSentiment;
    use crate::rubric::Rubric;

    fn evaluate(text: &str, polarity: f64) -> Result<EngagementScore, ScoringError> {
        let analyzer = FixedSentiment(polarity);
        EngagementRule::new(&Rubric::standard().engagement, &analyzer)
            .evaluate(&Transcript::new(text))
    }

    #[test]
    fn test_polarity_bands() {
        let cases = [
            (1.0, 1.0, 15),
            (0.5, 0.75, 12),
            (0.2, 0.6, 9),
            (0.0, 0.5, 9),
            (-0.2, 0.4, 6),
            (-1.0, 0.0, 3),
        ];
        for (polarity, probability, expected) in cases {
            let result = evaluate("I love sharing my story", polarity).unwrap();
            assert_eq!(result.sentiment_positive_probability, probability, "polarity {}", polarity);
            assert_eq!(result.score, expected, "polarity {}", polarity);
        }
    }

    #[test]
    fn test_reported_probability_ties_round_to_even() {
        let cases = [(0.25, 0.62, 9), (-0.25, 0.38, 6), (0.75, 0.88, 12), (-0.75, 0.12, 3)];
        for (polarity, probability, expected) in cases {
            let result = evaluate("I love sharing my story", polarity).unwrap();
            assert_eq!(result.sentiment_positive_probability, probability, "polarity {}", polarity);
            assert_eq!(result.score, expected, "polarity {}", polarity);
        }
    }

    #[test]
    fn test_blank_text_skips_analyzer() {
        // an out-of-range polarity would fail if the analyzer were consulted
        let result = evaluate("   ", 7.0).unwrap();
        assert_eq!(result.sentiment_positive_probability, 0.0);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_out_of_range_polarity_is_rejected() {
        for polarity in [1.5, -1.01, f64::NAN, f64::INFINITY] {
            let err = evaluate("hello", polarity).unwrap_err();
            assert!(matches!(
                err,
                ScoringError::EvaluationFailed {
                    category: Category::Engagement,
                    source: CollaboratorError::PolarityOutOfRange(_),
                }
            ));
        }
    }
}
