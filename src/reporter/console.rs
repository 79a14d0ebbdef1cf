//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{Category, Report, ScoredTranscript};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show the per-category profile and metric details
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single scored transcript
    pub fn report(&self, result: &ScoredTranscript) {
        print!("{}", self.render(result));
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[ScoredTranscript], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (just the score), with an optional trend suffix
    pub fn report_quiet(&self, result: &ScoredTranscript, delta: &str) {
        println!(
            "{}: {}{}",
            result.source.display(),
            self.paint_score(result.report.overall_score, 100),
            delta
        );
    }

    /// Full text for one transcript
    pub fn render(&self, result: &ScoredTranscript) -> String {
        let report = &result.report;
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.bold(&format!("🎙  Self-Introduction Evaluation: {}", result.source.display()))
        );
        let _ = writeln!(
            out,
            "   Words: {} | Pace: {} WPM",
            result.word_count, report.speech_rate.wpm
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "   Overall: {}", self.create_score_bar(report.overall_score));
        let _ = writeln!(out);

        self.render_breakdown(&mut out, report);
        if self.verbose {
            self.render_details(&mut out, report);
            self.render_profile(&mut out, report);
        }
        self.render_recommendations(&mut out, report);
        out
    }

    fn render_breakdown(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "   {}", self.bold("Score Breakdown:"));
        for category in Category::ALL {
            let score = report.category_total(category);
            let max = category.max_score();
            let _ = writeln!(
                out,
                "   {} {} {}",
                self.create_mini_bar(score, max),
                self.paint_score(score, max),
                category
            );
        }
        let _ = writeln!(out);
    }

    fn render_details(&self, out: &mut String, report: &Report) {
        let content = &report.content_and_structure;
        let language = &report.language_and_grammar;
        let _ = writeln!(out, "   {}", self.bold("Details:"));
        let _ = writeln!(
            out,
            "   Salutation {}/5 · Must-have {}/20 · Good-to-have {}/10 · Flow {}/5",
            content.salutation_score,
            content.keyword_must_have_score,
            content.keyword_good_to_have_score,
            content.flow_score
        );
        let _ = writeln!(
            out,
            "   Grammar {}/10 · Vocabulary {}/10",
            language.grammar_score, language.vocabulary_richness_score
        );
        let _ = writeln!(
            out,
            "   Fillers: {} ({:.2}%) · Positive sentiment: {:.2}",
            report.clarity.filler_word_count,
            report.clarity.filler_word_rate_percent,
            report.engagement.sentiment_positive_probability
        );
        let _ = writeln!(out);
    }

    fn render_profile(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "   {}", self.bold("Profile (0-10):"));
        for (category, value) in report.normalized_profile() {
            let _ = writeln!(out, "   {:>5.1} {}", value, category);
        }
        let _ = writeln!(out);
    }

    fn render_recommendations(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "   {}", self.bold("Feedback:"));
        for rec in ScoreCalculator::recommendations(report) {
            let arrow = if self.use_colors {
                "→".cyan().to_string()
            } else {
                "→".to_string()
            };
            let _ = writeln!(out, "   {} {}", arrow, rec);
        }
        let _ = writeln!(out);
    }

    /// Summary block for multiple transcripts
    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Transcripts scored: {}", stats.files_scored);
        let _ = writeln!(
            out,
            "   Average score:      {}",
            self.paint_score(stats.average_score, 100)
        );
        let _ = writeln!(out, "   Total words:        {}", stats.total_words);
        for avg in &stats.category_averages {
            let _ = writeln!(
                out,
                "   {:<20} {:>5.1}/{}",
                avg.category.to_string(),
                avg.average,
                avg.category.max_score()
            );
        }
        let _ = writeln!(out);
        out
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// "12/15" colored by how much of the category was earned
    fn paint_score(&self, score: u8, max: u8) -> String {
        let text = format!("{:>2}/{}", score, max);
        if !self.use_colors {
            return text;
        }
        let ratio = score as f64 / max as f64;
        if ratio >= 0.8 {
            text.green().to_string()
        } else if ratio >= 0.6 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}/100", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8, max: u8) -> String {
        let filled = (score as usize * 10) / max.max(1) as usize;
        let filled = filled.min(10);
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RubricEngine;
    use crate::collaborators::FixedSentiment;
    use std::path::{Path, PathBuf};

    fn scored(text: &str) -> ScoredTranscript {
        RubricEngine::new(Box::new(FixedSentiment(0.5)))
            .score_source(text, Path::new("asha.txt"))
            .unwrap()
    }

    #[test]
    fn test_render_lists_every_category() {
        let reporter = ConsoleReporter::new().without_colors();
        let text = reporter.render(&scored("Hello everyone, my name is Asha"));
        for category in Category::ALL {
            assert!(text.contains(&category.to_string()), "missing {}", category);
        }
        assert!(text.contains("asha.txt"));
        assert!(text.contains("Words: 6"));
    }

    #[test]
    fn test_render_includes_feedback() {
        let reporter = ConsoleReporter::new().without_colors();
        let text = reporter.render(&scored("um uh like so"));
        assert!(text.contains("Content needs improvement"));
        assert!(text.contains("filler words"));
    }

    #[test]
    fn test_verbose_adds_profile_and_details() {
        let result = scored("Hello everyone, my name is Asha");
        let plain = ConsoleReporter::new().without_colors().render(&result);
        let verbose = ConsoleReporter::new().without_colors().verbose().render(&result);
        assert!(!plain.contains("Profile (0-10):"));
        assert!(verbose.contains("Profile (0-10):"));
        assert!(verbose.contains("Salutation 4/5"));
    }

    #[test]
    fn test_score_bar_bounds() {
        let reporter = ConsoleReporter::new().without_colors();
        assert_eq!(reporter.create_score_bar(0), format!("[{}]   0/100", "░".repeat(20)));
        assert_eq!(reporter.create_score_bar(100), format!("[{}] 100/100", "█".repeat(20)));
    }

    #[test]
    fn test_mini_bar_scales_to_max() {
        let reporter = ConsoleReporter::new();
        assert_eq!(reporter.create_mini_bar(20, 40), format!("[{}{}]", "▓".repeat(5), "░".repeat(5)));
        assert_eq!(reporter.create_mini_bar(15, 15), format!("[{}]", "▓".repeat(10)));
    }

    #[test]
    fn test_summary_shows_averages() {
        let results = vec![
            ScoredTranscript {
                source: PathBuf::from("a.txt"),
                ..scored("Hi, I am Ravi")
            },
            scored("Hello everyone, my name is Asha"),
        ];
        let stats = RubricEngine::aggregate_stats(&results);
        let text = ConsoleReporter::new().without_colors().render_summary(&stats);
        assert!(text.contains("Transcripts scored: 2"));
        assert!(text.contains("Content & Structure"));
    }
}
