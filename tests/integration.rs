//! Integration tests: full scoring pipeline against test-transcripts/

use std::path::{Path, PathBuf};
use vaanimeter::collaborators::{FixedGrammar, FixedSentiment, GrammarChecker};
use vaanimeter::config::load_config;
use vaanimeter::rubric::Rubric;
use vaanimeter::{Category, CollaboratorError, RubricEngine, ScoredTranscript, ScoringError};

const ASHA: &str = "test-transcripts/class7/asha.txt";
const RAVI: &str = "test-transcripts/class7/ravi.txt";

fn engine(polarity: f64) -> RubricEngine {
    RubricEngine::new(Box::new(FixedSentiment(polarity)))
}

fn score(path: &str) -> ScoredTranscript {
    engine(0.5)
        .score_file(Path::new(path))
        .unwrap_or_else(|e| panic!("score_file({}) failed: {:#}", path, e))
}

// --- Fixture scores ---

#[test]
fn asha_scores_72() {
    let r = score(ASHA);
    assert_eq!(r.word_count, 25);
    assert_eq!(r.report.content_and_structure.total, 25);
    assert_eq!(r.report.speech_rate.score, 2);
    assert_eq!(r.report.language_and_grammar.total, 18);
    assert_eq!(r.report.clarity.score, 15);
    assert_eq!(r.report.engagement.score, 12);
    assert_eq!(r.report.overall_score, 72);
}

#[test]
fn ravi_covers_every_keyword_category() {
    let r = score(RAVI);
    let content = &r.report.content_and_structure;
    assert_eq!(content.salutation_score, 4);
    assert_eq!(content.keyword_must_have_score, 20);
    assert_eq!(content.keyword_good_to_have_score, 10);
    assert_eq!(content.flow_score, 5);
    assert_eq!(content.total, 39);
}

#[test]
fn ravi_scores_86() {
    let r = score(RAVI);
    assert_eq!(r.word_count, 66);
    // 66 words over 52 seconds is below every speech band
    assert_eq!(r.report.speech_rate.wpm, 76);
    assert_eq!(r.report.speech_rate.score, 2);
    // 48 distinct of 66 tokens
    assert_eq!(r.report.language_and_grammar.vocabulary_richness_score, 8);
    assert_eq!(r.report.clarity.filler_word_count, 0);
    assert_eq!(r.report.overall_score, 86);
}

#[test]
fn fuller_introduction_ranks_higher() {
    assert!(score(RAVI).report.overall_score > score(ASHA).report.overall_score);
}

// --- Invariants across the pipeline ---

#[test]
fn overall_equals_sum_of_categories() {
    for path in [ASHA, RAVI] {
        let r = score(path);
        let sum: u32 = Category::ALL
            .iter()
            .map(|&c| r.report.category_total(c) as u32)
            .sum();
        assert_eq!(r.report.overall_score as u32, sum, "{}", path);
    }
}

#[test]
fn categories_stay_within_maximums() {
    for path in [ASHA, RAVI] {
        let r = score(path);
        for category in Category::ALL {
            assert!(
                r.report.category_total(category) <= category.max_score(),
                "{} {} = {}",
                path,
                category,
                r.report.category_total(category)
            );
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    let paths = vec![PathBuf::from(ASHA), PathBuf::from(RAVI)];
    let engine = engine(0.2);
    let sequential: Vec<_> = engine
        .score_many(&paths)
        .into_iter()
        .map(|r| r.unwrap().report)
        .collect();
    let parallel: Vec<_> = engine
        .score_parallel(&paths)
        .into_iter()
        .map(|r| r.unwrap().report)
        .collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn aggregate_over_fixtures() {
    let results = vec![score(ASHA), score(RAVI)];
    let stats = RubricEngine::aggregate_stats(&results);
    assert_eq!(stats.files_scored, 2);
    assert_eq!(stats.average_score, 79);
    assert_eq!(stats.total_words, 91);
    assert_eq!(stats.category_averages[0].category, Category::ContentAndStructure);
    assert_eq!(stats.category_averages[0].average, 32.0);
}

// --- Collaborators ---

#[test]
fn grammar_errors_reduce_language_score() {
    let clean = engine(0.5).score_file(Path::new(RAVI)).unwrap();
    let noisy = engine(0.5)
        .with_grammar_checker(Box::new(FixedGrammar(4)))
        .score_file(Path::new(RAVI))
        .unwrap();
    assert!(
        noisy.report.language_and_grammar.grammar_score
            < clean.report.language_and_grammar.grammar_score
    );
    assert_eq!(
        noisy.report.content_and_structure,
        clean.report.content_and_structure
    );
}

struct UnreachableChecker;

impl GrammarChecker for UnreachableChecker {
    fn describe(&self) -> String {
        "unreachable".to_string()
    }

    fn check(&self, _text: &str) -> Result<usize, CollaboratorError> {
        Err(CollaboratorError::Request("connection refused".to_string()))
    }
}

#[test]
fn grammar_failure_names_category() {
    let engine = engine(0.5).with_grammar_checker(Box::new(UnreachableChecker));
    let text = std::fs::read_to_string(ASHA).unwrap();
    match engine.score(&text) {
        Err(ScoringError::EvaluationFailed { category, .. }) => {
            assert_eq!(category, Category::LanguageAndGrammar)
        }
        other => panic!("expected EvaluationFailed, got {:?}", other),
    }
}

#[test]
fn sentiment_extremes_map_to_engagement_bands() {
    let text = std::fs::read_to_string(ASHA).unwrap();
    let cases = [(1.0, 15), (0.5, 12), (0.0, 9), (-0.5, 3), (-1.0, 3)];
    for (polarity, expected) in cases {
        let report = engine(polarity).score(&text).unwrap();
        assert_eq!(report.engagement.score, expected, "polarity {}", polarity);
    }
}

// --- Config ---

#[test]
fn fixture_config_ignores_drafts() {
    let config = load_config(Path::new("test-transcripts/class7"), None).unwrap();
    assert_eq!(config.ignore, vec!["**/drafts/**".to_string()]);
    let set = vaanimeter::config::build_ignore_set(&config.ignore).unwrap();
    assert!(vaanimeter::config::is_ignored(
        Path::new("test-transcripts/class7/drafts/unfinished.txt"),
        &set
    ));
    assert!(!vaanimeter::config::is_ignored(Path::new(ASHA), &set));
}

#[test]
fn rubric_override_changes_scores() {
    let mut rubric = Rubric::default();
    // half a minute of speech instead of 52 seconds
    rubric.speech_rate.assumed_duration_secs = 30.0;
    let engine = engine(0.5).with_rubric(rubric).unwrap();
    let r = engine.score_file(Path::new(RAVI)).unwrap();
    // 66 words over 30 seconds
    assert_eq!(r.report.speech_rate.wpm, 132);
    assert_eq!(r.report.speech_rate.score, 10);
}

#[test]
fn invalid_rubric_is_rejected() {
    let mut rubric = Rubric::default();
    rubric.speech_rate.assumed_duration_secs = 0.0;
    let result = engine(0.5).with_rubric(rubric);
    assert!(matches!(result, Err(ScoringError::InvalidRubric(_))));
}

#[test]
fn short_introduction_scores_expected_parts() {
    let report = engine(0.5)
        .score(
            "Good morning, my name is Asha, I am 9 years old, I study in class 4, \
             I love reading and playing, thank you",
        )
        .unwrap();
    assert_eq!(report.speech_rate.score, 2);
    assert_eq!(report.content_and_structure.salutation_score, 4);
    assert!(report.content_and_structure.keyword_must_have_score >= 16);
    // no grammar checker means no grammar errors
    assert_eq!(report.language_and_grammar.grammar_score, 10);
}

#[test]
fn identical_inputs_serialize_identically() {
    let first = serde_json::to_string(&score(RAVI).report).unwrap();
    let second = serde_json::to_string(&score(RAVI).report).unwrap();
    assert_eq!(first, second);
}
