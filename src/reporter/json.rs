//! JSON reporter for machine-readable output

use crate::analyzer::engine::{AggregateStats, CategoryAverage};
use crate::analyzer::scoring::ScoreCalculator;
use crate::{Category, Report, ScoredTranscript};
use serde::Serialize;
use std::path::Path;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single transcript: the report keys at top level plus file metadata and feedback
    pub fn report(&self, result: &ScoredTranscript) -> String {
        self.to_json(&JsonResult::from(result), "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[ScoredTranscript]) -> String {
        let entries: Vec<JsonResult<'_>> = results.iter().map(JsonResult::from).collect();
        self.to_json(&entries, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(
        &self,
        results: &[ScoredTranscript],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonOutput {
            results: results.iter().map(JsonResult::from).collect(),
            summary: JsonSummary {
                files_scored: stats.files_scored,
                average_score: stats.average_score,
                total_words: stats.total_words,
                category_averages: &stats.category_averages,
            },
        };
        self.to_json(&output, "{}")
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ProfileEntry {
    category: Category,
    value: f64,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    file: &'a Path,
    word_count: usize,
    #[serde(flatten)]
    report: &'a Report,
    normalized_profile: Vec<ProfileEntry>,
    recommendations: Vec<String>,
}

impl<'a> From<&'a ScoredTranscript> for JsonResult<'a> {
    fn from(result: &'a ScoredTranscript) -> Self {
        Self {
            file: &result.source,
            word_count: result.word_count,
            report: &result.report,
            normalized_profile: result
                .report
                .normalized_profile()
                .into_iter()
                .map(|(category, value)| ProfileEntry { category, value })
                .collect(),
            recommendations: ScoreCalculator::recommendations(&result.report),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: Vec<JsonResult<'a>>,
    summary: JsonSummary<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    files_scored: usize,
    average_score: u8,
    total_words: usize,
    category_averages: &'a [CategoryAverage],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentScore, SpeechRateScore};
    use std::path::PathBuf;

    fn make_result(path: &str, overall: u8) -> ScoredTranscript {
        ScoredTranscript {
            source: PathBuf::from(path),
            word_count: 42,
            report: Report {
                overall_score: overall,
                content_and_structure: ContentScore::new(4, 16, 2, 5),
                speech_rate: SpeechRateScore { wpm: 48, score: 2 },
                ..Report::default()
            },
        }
    }

    #[test]
    fn test_single_report_keeps_report_keys_at_top_level() {
        let json = JsonReporter::new().report(&make_result("asha.txt", 33));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["file"], "asha.txt");
        assert_eq!(value["word_count"], 42);
        assert_eq!(value["overall_score"], 33);
        assert_eq!(value["content_and_structure"]["total"], 27);
        assert_eq!(value["speech_rate"]["wpm"], 48);
        assert_eq!(value["normalized_profile"][0]["category"], "content_and_structure");
        assert!(value["recommendations"].is_array());
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let json = JsonReporter::new().pretty().report(&make_result("asha.txt", 33));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_report_many_is_array() {
        let results = vec![make_result("a.txt", 50), make_result("b.txt", 70)];
        let value: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().report_many(&results)).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_report_with_summary() {
        let results = vec![make_result("a.txt", 50), make_result("b.txt", 70)];
        let stats = crate::RubricEngine::aggregate_stats(&results);
        let json = JsonReporter::new().report_with_summary(&results, &stats);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["filesScored"], 2);
        assert_eq!(value["summary"]["averageScore"], 60);
        assert_eq!(value["summary"]["totalWords"], 84);
        assert_eq!(value["summary"]["categoryAverages"][0]["average"], 27.0);
        assert_eq!(value["results"][1]["file"], "b.txt");
    }
}
