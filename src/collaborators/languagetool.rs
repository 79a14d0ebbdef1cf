//! Grammar checking against a LanguageTool HTTP server
//!
//! Only compiled with the `languagetool` feature.

use super::GrammarChecker;
use crate::error::CollaboratorError;

const DEFAULT_LANGUAGE: &str = "en-US";

/// Blocking client for a LanguageTool `/v2` endpoint
pub struct LanguageToolClient {
    base_url: String,
    language: String,
    client: reqwest::blocking::Client,
}

impl LanguageToolClient {
    /// Connect to `base_url` (e.g. `http://localhost:8081`), probing `/v2/languages` first.
    ///
    /// A failed probe is returned as an error so callers can decide to run without a checker.
    pub fn connect(base_url: &str) -> Result<Self, CollaboratorError> {
        let client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::blocking::Client::new(),
        };

        let response = client
            .client
            .get(format!("{}/v2/languages", client.base_url))
            .send()
            .map_err(|e| CollaboratorError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CollaboratorError::Request(format!(
                "probe of {} returned {}",
                client.base_url,
                response.status()
            )));
        }

        Ok(client)
    }
}

impl GrammarChecker for LanguageToolClient {
    fn describe(&self) -> String {
        format!("languagetool:{}:{}", self.base_url, self.language)
    }

    fn check(&self, text: &str) -> Result<usize, CollaboratorError> {
        let params = [("language", self.language.as_str()), ("text", text)];
        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&params)
            .send()
            .map_err(|e| CollaboratorError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CollaboratorError::Request(format!("{}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| CollaboratorError::Request(e.to_string()))?;

        json["matches"]
            .as_array()
            .map(|matches| matches.len())
            .ok_or_else(|| CollaboratorError::InvalidOutput {
                output: json.to_string(),
                expected: "a LanguageTool response with `matches`",
            })
    }
}
