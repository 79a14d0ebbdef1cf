//! Config schema and deserialization

use crate::collaborators::CollaboratorSources;
use crate::rubric::Rubric;
use serde::{Deserialize, Serialize};

/// Environment fallback for the grammar command
pub const GRAMMAR_CMD_ENV: &str = "VAANI_GRAMMAR_CMD";
/// Environment fallback for the sentiment command
pub const SENTIMENT_CMD_ENV: &str = "VAANI_SENTIMENT_CMD";

/// Root config structure for .vaanirc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum overall score (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Glob patterns for files/directories to exclude
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// File name suffixes treated as transcripts (default: .txt)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript_patterns: Vec<String>,

    /// Command that prints a grammar issue count for stdin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_command: Option<String>,

    /// Command that prints a compound sentiment polarity for stdin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_command: Option<String>,

    /// LanguageTool server base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languagetool_url: Option<String>,

    /// Replacement rubric tables; omitted fields keep the standard values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<Rubric>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Fill collaborator sources the CLI left empty: config first, then the environment.
    ///
    /// Each collaborator is resolved as a whole from the first layer that names any
    /// source for it, so a lower layer never outranks a flag from a higher one.
    pub fn collaborator_sources(&self, cli: CollaboratorSources) -> CollaboratorSources {
        self.collaborator_sources_with_env(cli, |key| std::env::var(key).ok())
    }

    pub(crate) fn collaborator_sources_with_env(
        &self,
        mut cli: CollaboratorSources,
        env: impl Fn(&str) -> Option<String>,
    ) -> CollaboratorSources {
        if !cli.has_grammar_source() {
            if self.grammar_command.is_some() || self.languagetool_url.is_some() {
                cli.grammar_command = self.grammar_command.clone();
                cli.languagetool_url = self.languagetool_url.clone();
            } else {
                cli.grammar_command = env(GRAMMAR_CMD_ENV);
            }
        }
        if !cli.has_sentiment_source() {
            cli.sentiment_command = self
                .sentiment_command
                .clone()
                .or_else(|| env(SENTIMENT_CMD_ENV));
        }
        cli
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.transcript_patterns.is_empty() {
            self.transcript_patterns = base.transcript_patterns;
        }
        if self.grammar_command.is_none() {
            self.grammar_command = base.grammar_command;
        }
        if self.sentiment_command.is_none() {
            self.sentiment_command = base.sentiment_command;
        }
        if self.languagetool_url.is_none() {
            self.languagetool_url = base.languagetool_url;
        }
        if self.rubric.is_none() {
            self.rubric = base.rubric;
        }
    }

    /// Get transcript file suffixes
    pub fn get_transcript_patterns(&self) -> Vec<&str> {
        if self.transcript_patterns.is_empty() {
            vec![".txt"]
        } else {
            self.transcript_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubric_override_is_partial() {
        let config: Config = serde_json::from_str(
            r#"{ "threshold": 60, "rubric": { "closings": ["bye"] } }"#,
        )
        .unwrap();
        let rubric = config.rubric.unwrap();
        assert_eq!(rubric.closings, vec!["bye".to_string()]);
        assert_eq!(rubric.must_have, Rubric::standard().must_have);
    }

    #[test]
    fn test_default_transcript_patterns() {
        assert_eq!(Config::default().get_transcript_patterns(), vec![".txt"]);
        let config = Config {
            transcript_patterns: vec![".md".to_string()],
            ..Config::default()
        };
        assert_eq!(config.get_transcript_patterns(), vec![".md"]);
    }

    #[test]
    fn test_collaborator_source_priority() {
        let config = Config {
            grammar_command: Some("from-config".to_string()),
            ..Config::default()
        };
        let env = |key: &str| match key {
            GRAMMAR_CMD_ENV => Some("grammar-from-env".to_string()),
            SENTIMENT_CMD_ENV => Some("sentiment-from-env".to_string()),
            _ => None,
        };

        let sources = config.collaborator_sources_with_env(CollaboratorSources::default(), env);
        assert_eq!(sources.grammar_command.as_deref(), Some("from-config"));
        assert_eq!(sources.sentiment_command.as_deref(), Some("sentiment-from-env"));

        let cli = CollaboratorSources {
            sentiment_command: Some("from-cli".to_string()),
            ..CollaboratorSources::default()
        };
        let sources = config.collaborator_sources_with_env(cli, env);
        assert_eq!(sources.sentiment_command.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_cli_languagetool_url_beats_lower_grammar_sources() {
        let config = Config {
            grammar_command: Some("from-config".to_string()),
            ..Config::default()
        };
        let env = |key: &str| match key {
            GRAMMAR_CMD_ENV => Some("wc -w".to_string()),
            _ => None,
        };
        let cli = CollaboratorSources {
            languagetool_url: Some("http://localhost:8081".to_string()),
            ..CollaboratorSources::default()
        };

        let sources = config.collaborator_sources_with_env(cli.clone(), env);
        assert_eq!(sources.grammar_command, None);
        assert_eq!(sources.languagetool_url.as_deref(), Some("http://localhost:8081"));

        let sources = Config::default().collaborator_sources_with_env(cli, env);
        assert_eq!(sources.grammar_command, None);
    }

    #[test]
    fn test_config_languagetool_url_beats_env_command() {
        let config = Config {
            languagetool_url: Some("http://lt.example".to_string()),
            ..Config::default()
        };
        let env = |key: &str| match key {
            GRAMMAR_CMD_ENV => Some("wc -w".to_string()),
            _ => None,
        };
        let sources = config.collaborator_sources_with_env(CollaboratorSources::default(), env);
        assert_eq!(sources.grammar_command, None);
        assert_eq!(sources.languagetool_url.as_deref(), Some("http://lt.example"));
    }

    #[test]
    fn test_cli_counts_and_polarity_block_lower_layers() {
        let config = Config {
            grammar_command: Some("from-config".to_string()),
            sentiment_command: Some("from-config".to_string()),
            ..Config::default()
        };
        let cli = CollaboratorSources {
            grammar_errors: Some(2),
            polarity: Some(0.5),
            ..CollaboratorSources::default()
        };
        let sources = config.collaborator_sources_with_env(cli, |_| None);
        assert_eq!(sources.grammar_command, None);
        assert_eq!(sources.sentiment_command, None);
    }

    #[test]
    fn test_cli_threshold_wins() {
        let config = Config {
            threshold: Some(50),
            ..Config::default()
        };
        assert_eq!(config.clone().merge_with_cli(Some(80)).threshold, Some(80));
        assert_eq!(config.merge_with_cli(None).threshold, Some(50));
    }
}
