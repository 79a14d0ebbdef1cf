//! Category rules: one evaluator per rubric category

pub mod clarity;
pub mod content_structure;
pub mod engagement;
pub mod language_grammar;
pub mod speech_rate;

pub use clarity::ClarityRule;
pub use content_structure::ContentStructureRule;
pub use engagement::EngagementRule;
pub use language_grammar::LanguageGrammarRule;
pub use speech_rate::SpeechRateRule;

use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::Category;

/// Trait for category rules
pub trait CategoryRule {
    /// Sub-score record produced by this rule
    type Output;

    /// Name of the rule
    fn name(&self) -> &'static str;

    /// Category this rule scores
    fn category(&self) -> Category;

    /// Score a non-empty transcript
    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<Self::Output, ScoringError>;
}

/// Round to two decimals, ties to even
pub(crate) fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = scaled.round();
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        rounded - rounded % 2.0
    } else {
        rounded
    };
    rounded / 100.0
}
