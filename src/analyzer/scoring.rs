//! Score aggregation and feedback for rubric reports

use crate::{ClarityScore, ContentScore, EngagementScore, LanguageScore, Report, SpeechRateScore};

/// Below this content total the speaker is told to cover more details
const CONTENT_ADVICE_BELOW: u8 = 20;
const SPEECH_ADVICE_BELOW: u8 = 6;
const CLARITY_ADVICE_BELOW: u8 = 10;
const ENGAGEMENT_ADVICE_BELOW: u8 = 10;

/// Calculator for overall scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Combine category results into a report; the overall score is their sum clamped to 0-100
    pub fn aggregate(
        content: ContentScore,
        speech: SpeechRateScore,
        language: LanguageScore,
        clarity: ClarityScore,
        engagement: EngagementScore,
    ) -> Report {
        let mut report = Report {
            overall_score: 0,
            content_and_structure: content,
            speech_rate: speech,
            language_and_grammar: language,
            clarity,
            engagement,
        };
        report.overall_score = Self::clamp_overall(report.raw_total());
        report
    }

    pub fn clamp_overall(raw: u32) -> u8 {
        raw.min(100) as u8
    }

    /// Feedback lines for a report, content first
    pub fn recommendations(report: &Report) -> Vec<String> {
        let mut recs = Vec::new();

        if report.content_and_structure.total < CONTENT_ADVICE_BELOW {
            recs.push(
                "Content needs improvement. Ensure you include all key details like name, age, \
                 family, and hobbies."
                    .to_string(),
            );
        } else {
            recs.push("Good content coverage.".to_string());
        }

        if report.speech_rate.score < SPEECH_ADVICE_BELOW {
            recs.push("Watch your speaking pace. Aim for ~130 words per minute.".to_string());
        }

        if report.clarity.score < CLARITY_ADVICE_BELOW {
            recs.push(
                "Try to reduce filler words (um, uh, like) to sound more confident.".to_string(),
            );
        }

        if report.engagement.score < ENGAGEMENT_ADVICE_BELOW {
            recs.push("Try to sound more enthusiastic and positive.".to_string());
        }

        recs
    }
}
