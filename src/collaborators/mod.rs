//! External capabilities consumed by the engine: grammar checking and sentiment polarity
//!
//! Both are narrow traits so the engine can be driven by deterministic stubs in tests
//! and by external tools (a command, a LanguageTool server) in the CLI.

pub mod command;
#[cfg(feature = "languagetool")]
pub mod languagetool;

pub use command::{CommandGrammarChecker, CommandSentimentAnalyzer, ExternalCommand};
#[cfg(feature = "languagetool")]
pub use languagetool::LanguageToolClient;

use crate::error::{CollaboratorError, ScoringError};

/// Counts grammar issues in a text
pub trait GrammarChecker: Send + Sync {
    /// Short description used in logs and cache fingerprints
    fn describe(&self) -> String;

    fn check(&self, text: &str) -> Result<usize, CollaboratorError>;
}

/// Produces a compound sentiment polarity in [-1, 1]
pub trait SentimentAnalyzer: Send + Sync {
    /// Short description used in logs and cache fingerprints
    fn describe(&self) -> String;

    fn polarity(&self, text: &str) -> Result<f64, CollaboratorError>;
}

/// Grammar checker that always reports the same number of issues
#[derive(Debug, Clone, Copy)]
pub struct FixedGrammar(pub usize);

impl GrammarChecker for FixedGrammar {
    fn describe(&self) -> String {
        format!("fixed-grammar:{}", self.0)
    }

    fn check(&self, _text: &str) -> Result<usize, CollaboratorError> {
        Ok(self.0)
    }
}

/// Sentiment analyzer that always reports the same polarity
#[derive(Debug, Clone, Copy)]
pub struct FixedSentiment(pub f64);

impl SentimentAnalyzer for FixedSentiment {
    fn describe(&self) -> String {
        format!("fixed-sentiment:{}", self.0)
    }

    fn polarity(&self, _text: &str) -> Result<f64, CollaboratorError> {
        Ok(self.0)
    }
}

/// Where the CLI may find each collaborator, highest priority first within each field
#[derive(Debug, Clone, Default)]
pub struct CollaboratorSources {
    /// Explicit grammar issue count (skips any checker)
    pub grammar_errors: Option<usize>,
    /// Explicit compound polarity (skips any analyzer)
    pub polarity: Option<f64>,
    pub grammar_command: Option<String>,
    pub sentiment_command: Option<String>,
    pub languagetool_url: Option<String>,
}

impl CollaboratorSources {
    /// Whether any grammar source is named at this layer
    pub fn has_grammar_source(&self) -> bool {
        self.grammar_errors.is_some()
            || self.grammar_command.is_some()
            || self.languagetool_url.is_some()
    }

    /// Whether any sentiment source is named at this layer
    pub fn has_sentiment_source(&self) -> bool {
        self.polarity.is_some() || self.sentiment_command.is_some()
    }

    /// Build the grammar checker, or `None` when nothing is configured or it fails to start.
    ///
    /// A missing checker is not an error: the engine assumes zero grammar issues.
    pub fn grammar_checker(&self) -> Option<Box<dyn GrammarChecker>> {
        if let Some(count) = self.grammar_errors {
            return Some(Box::new(FixedGrammar(count)));
        }
        if let Some(ref cmd) = self.grammar_command {
            return match ExternalCommand::parse(cmd) {
                Some(command) => Some(Box::new(CommandGrammarChecker::new(command))),
                None => {
                    tracing::warn!(command = %cmd, "empty grammar command; grammar checking disabled");
                    None
                }
            };
        }
        if let Some(ref url) = self.languagetool_url {
            return languagetool_checker(url);
        }
        None
    }

    /// Build the sentiment analyzer; there is no fallback
    pub fn sentiment_analyzer(&self) -> Result<Box<dyn SentimentAnalyzer>, ScoringError> {
        if let Some(polarity) = self.polarity {
            return Ok(Box::new(FixedSentiment(polarity)));
        }
        self.sentiment_command
            .as_deref()
            .and_then(ExternalCommand::parse)
            .map(|command| Box::new(CommandSentimentAnalyzer::new(command)) as Box<dyn SentimentAnalyzer>)
            .ok_or(ScoringError::MissingSentimentAnalyzer)
    }
}

#[cfg(feature = "languagetool")]
fn languagetool_checker(url: &str) -> Option<Box<dyn GrammarChecker>> {
    match LanguageToolClient::connect(url) {
        Ok(client) => Some(Box::new(client)),
        Err(e) => {
            tracing::warn!(url, error = %e, "LanguageTool unavailable; grammar checking disabled");
            None
        }
    }
}

#[cfg(not(feature = "languagetool"))]
fn languagetool_checker(url: &str) -> Option<Box<dyn GrammarChecker>> {
    tracing::warn!(
        url,
        "built without the `languagetool` feature; grammar checking disabled"
    );
    None
}
