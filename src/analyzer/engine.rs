//! Rubric engine - runs every category rule over a transcript

use crate::collaborators::{GrammarChecker, SentimentAnalyzer};
use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::rubric::Rubric;
use crate::{Category, Report, ScoredTranscript};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use super::rules::{
    CategoryRule, ClarityRule, ContentStructureRule, EngagementRule, LanguageGrammarRule,
    SpeechRateRule,
};
use super::ScoreCalculator;

/// Scores transcripts against a rubric using the configured collaborators.
///
/// The engine holds no per-call state; one instance can score many transcripts,
/// including concurrently.
pub struct RubricEngine {
    rubric: Cow<'static, Rubric>,
    grammar: Option<Box<dyn GrammarChecker>>,
    sentiment: Box<dyn SentimentAnalyzer>,
}

impl RubricEngine {
    /// Create an engine with the standard rubric and no grammar checker
    pub fn new(sentiment: Box<dyn SentimentAnalyzer>) -> Self {
        Self {
            rubric: Cow::Borrowed(Rubric::standard()),
            grammar: None,
            sentiment,
        }
    }

    /// Start a builder for engines assembled from optional parts
    pub fn builder() -> RubricEngineBuilder {
        RubricEngineBuilder::default()
    }

    /// Attach a grammar checker
    pub fn with_grammar_checker(mut self, checker: Box<dyn GrammarChecker>) -> Self {
        self.grammar = Some(checker);
        self
    }

    /// Replace the standard rubric, rejecting tables that cannot be scored
    pub fn with_rubric(mut self, rubric: Rubric) -> std::result::Result<Self, ScoringError> {
        rubric.validate()?;
        self.rubric = Cow::Owned(rubric);
        Ok(self)
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn has_grammar_checker(&self) -> bool {
        self.grammar.is_some()
    }

    /// Hash identifying everything that can change a score: the rubric and the collaborators
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(self.rubric()).unwrap_or_default());
        hasher.update(b"\0");
        if let Some(ref grammar) = self.grammar {
            hasher.update(grammar.describe().as_bytes());
        }
        hasher.update(b"\0");
        hasher.update(self.sentiment.describe().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Score one transcript.
    ///
    /// Empty or whitespace-only input yields the all-zero report without
    /// consulting any collaborator. A collaborator failure aborts scoring with
    /// `ScoringError::EvaluationFailed` naming the category.
    pub fn score(&self, text: &str) -> std::result::Result<Report, ScoringError> {
        let transcript = Transcript::new(text);
        if transcript.is_blank() {
            tracing::debug!("blank transcript, returning empty report");
            return Ok(Report::empty());
        }

        let rubric = self.rubric();
        let content = ContentStructureRule::new(rubric).evaluate(&transcript)?;
        let speech = SpeechRateRule::new(&rubric.speech_rate).evaluate(&transcript)?;
        let language = LanguageGrammarRule::new(rubric)
            .with_checker(self.grammar.as_deref())
            .evaluate(&transcript)?;
        let clarity = ClarityRule::new(&rubric.clarity).evaluate(&transcript)?;
        let engagement =
            EngagementRule::new(&rubric.engagement, self.sentiment.as_ref()).evaluate(&transcript)?;

        let report = ScoreCalculator::aggregate(content, speech, language, clarity, engagement);
        tracing::debug!(
            overall = report.overall_score,
            content = report.content_and_structure.total,
            speech = report.speech_rate.score,
            language = report.language_and_grammar.total,
            clarity = report.clarity.score,
            engagement = report.engagement.score,
            "scored transcript"
        );
        Ok(report)
    }

    /// Score transcript text from memory (e.g. stdin), labelled with a virtual path
    pub fn score_source(
        &self,
        text: &str,
        virtual_path: &Path,
    ) -> std::result::Result<ScoredTranscript, ScoringError> {
        let report = self.score(text)?;
        Ok(ScoredTranscript {
            source: virtual_path.to_path_buf(),
            word_count: Transcript::new(text).word_count(),
            report,
        })
    }

    /// Read and score a transcript file
    pub fn score_file(&self, path: &Path) -> Result<ScoredTranscript> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        self.score_source(&text, path)
            .with_context(|| format!("Failed to score transcript: {}", path.display()))
    }

    /// Score multiple transcript files sequentially
    pub fn score_many(&self, paths: &[PathBuf]) -> Vec<Result<ScoredTranscript>> {
        paths.iter().map(|p| self.score_file(p)).collect()
    }

    /// Score multiple transcript files in parallel using rayon
    pub fn score_parallel(&self, paths: &[PathBuf]) -> Vec<Result<ScoredTranscript>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.score_file(p)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[ScoredTranscript]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let count = results.len() as f64;
        let total_score: u32 = results.iter().map(|r| r.report.overall_score as u32).sum();
        let total_words: usize = results.iter().map(|r| r.word_count).sum();

        let category_averages = Category::ALL
            .iter()
            .map(|&category| {
                let sum: u32 = results
                    .iter()
                    .map(|r| r.report.category_total(category) as u32)
                    .sum();
                CategoryAverage {
                    category,
                    average: sum as f64 / count,
                }
            })
            .collect();

        AggregateStats {
            files_scored: results.len(),
            average_score: (total_score / results.len() as u32) as u8,
            total_words,
            category_averages,
        }
    }
}

/// Builder for engines whose parts come from configuration
#[derive(Default)]
pub struct RubricEngineBuilder {
    rubric: Option<Rubric>,
    grammar: Option<Box<dyn GrammarChecker>>,
    sentiment: Option<Box<dyn SentimentAnalyzer>>,
}

impl RubricEngineBuilder {
    pub fn rubric(mut self, rubric: Option<Rubric>) -> Self {
        self.rubric = rubric;
        self
    }

    pub fn grammar_checker(mut self, checker: Option<Box<dyn GrammarChecker>>) -> Self {
        self.grammar = checker;
        self
    }

    pub fn sentiment_analyzer(mut self, analyzer: Box<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = Some(analyzer);
        self
    }

    /// Build the engine; fails without a sentiment analyzer or with an invalid rubric
    pub fn build(self) -> std::result::Result<RubricEngine, ScoringError> {
        let sentiment = self.sentiment.ok_or(ScoringError::MissingSentimentAnalyzer)?;
        let mut engine = RubricEngine::new(sentiment);
        match self.grammar {
            Some(checker) => engine = engine.with_grammar_checker(checker),
            None => tracing::warn!("no grammar checker configured, assuming zero grammar errors"),
        }
        if let Some(rubric) = self.rubric {
            engine = engine.with_rubric(rubric)?;
        }
        Ok(engine)
    }
}

/// Average points for one category across scored transcripts
#[derive(Debug, Clone, Serialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub average: f64,
}

/// Aggregate statistics from multiple transcripts
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of transcripts scored
    pub files_scored: usize,
    /// Average overall score, truncated
    pub average_score: u8,
    /// Total words across all transcripts
    pub total_words: usize,
    /// Per-category averages, in report order
    pub category_averages: Vec<CategoryAverage>,
}
