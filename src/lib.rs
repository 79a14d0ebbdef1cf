//! VaaniMeter: rubric scoring for spoken self-introductions
//!
//! This library scores a self-introduction transcript against a fixed professional rubric
//! and returns per-category sub-scores plus an overall score on a 0-100 scale.

pub mod analyzer;
pub mod cache;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod parser;
pub mod reporter;
pub mod rubric;

pub use analyzer::RubricEngine;
pub use error::{CollaboratorError, ScoringError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rubric categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ContentAndStructure,
    SpeechRate,
    LanguageAndGrammar,
    Clarity,
    Engagement,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ContentAndStructure,
        Category::SpeechRate,
        Category::LanguageAndGrammar,
        Category::Clarity,
        Category::Engagement,
    ];

    /// Maximum points this category contributes to the overall score
    pub fn max_score(self) -> u8 {
        match self {
            Category::ContentAndStructure => 40,
            Category::SpeechRate => 10,
            Category::LanguageAndGrammar => 20,
            Category::Clarity => 15,
            Category::Engagement => 15,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::ContentAndStructure => write!(f, "Content & Structure"),
            Category::SpeechRate => write!(f, "Speech Rate"),
            Category::LanguageAndGrammar => write!(f, "Language & Grammar"),
            Category::Clarity => write!(f, "Clarity"),
            Category::Engagement => write!(f, "Engagement"),
        }
    }
}

/// Content & structure breakdown (0-40)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentScore {
    /// Greeting quality (0-5)
    pub salutation_score: u8,
    /// Must-have keyword coverage (0-20)
    pub keyword_must_have_score: u8,
    /// Good-to-have keyword coverage (0-10)
    pub keyword_good_to_have_score: u8,
    /// Ordering of sections (0-5)
    pub flow_score: u8,
    pub total: u8,
}

impl ContentScore {
    pub fn new(salutation: u8, must_have: u8, good_to_have: u8, flow: u8) -> Self {
        let total = (salutation + must_have + good_to_have + flow)
            .min(Category::ContentAndStructure.max_score());
        Self {
            salutation_score: salutation,
            keyword_must_have_score: must_have,
            keyword_good_to_have_score: good_to_have,
            flow_score: flow,
            total,
        }
    }
}

/// Speech rate breakdown (0-10)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechRateScore {
    /// Words per minute, truncated
    pub wpm: u32,
    pub score: u8,
}

/// Language & grammar breakdown (0-20)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageScore {
    /// Grammar error ratio score (0-10)
    pub grammar_score: u8,
    /// Type-token ratio score (0-10)
    pub vocabulary_richness_score: u8,
    pub total: u8,
}

impl LanguageScore {
    pub fn new(grammar: u8, vocabulary: u8) -> Self {
        Self {
            grammar_score: grammar,
            vocabulary_richness_score: vocabulary,
            total: (grammar + vocabulary).min(Category::LanguageAndGrammar.max_score()),
        }
    }
}

/// Clarity breakdown (0-15)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClarityScore {
    pub filler_word_count: usize,
    /// Fillers per 100 words, rounded to 2 decimals
    pub filler_word_rate_percent: f64,
    pub score: u8,
}

/// Engagement breakdown (0-15)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementScore {
    /// Compound polarity mapped to [0, 1], rounded to 2 decimals
    pub sentiment_positive_probability: f64,
    pub score: u8,
}

/// The full scoring result for one transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Sum of the five category totals, clamped to 0-100
    pub overall_score: u8,
    pub content_and_structure: ContentScore,
    pub speech_rate: SpeechRateScore,
    pub language_and_grammar: LanguageScore,
    pub clarity: ClarityScore,
    pub engagement: EngagementScore,
}

impl Report {
    /// All-zero report used for empty transcripts
    pub fn empty() -> Self {
        Self::default()
    }

    /// Score contributed by one category
    pub fn category_total(&self, category: Category) -> u8 {
        match category {
            Category::ContentAndStructure => self.content_and_structure.total,
            Category::SpeechRate => self.speech_rate.score,
            Category::LanguageAndGrammar => self.language_and_grammar.total,
            Category::Clarity => self.clarity.score,
            Category::Engagement => self.engagement.score,
        }
    }

    /// Sum of the category totals before clamping
    pub fn raw_total(&self) -> u32 {
        Category::ALL
            .iter()
            .map(|c| self.category_total(*c) as u32)
            .sum()
    }

    /// Each category rescaled to 0-10, for radar-style displays
    pub fn normalized_profile(&self) -> [(Category, f64); 5] {
        Category::ALL.map(|c| {
            let value = self.category_total(c) as f64 * 10.0 / c.max_score() as f64;
            (c, value)
        })
    }
}

/// A scored transcript with its origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTranscript {
    /// Path of the transcript (or a virtual path such as `stdin.txt`)
    pub source: PathBuf,
    /// Whitespace-delimited word count
    pub word_count: usize,
    pub report: Report,
}
