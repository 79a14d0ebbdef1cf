//! Property tests: every report stays within bounds whatever the input.

use proptest::prelude::*;
use vaanimeter::collaborators::{FixedGrammar, FixedSentiment};
use vaanimeter::{Category, RubricEngine};

/// Strategy producing text built from rubric phrases, fillers and noise
fn introduction_like() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "hello",
            "Good morning",
            "everyone,",
            "my name is",
            "I am",
            "13 years old",
            "class",
            "school",
            "family",
            "hobbies",
            "reading",
            "I want to become",
            "thank you",
            "um",
            "uh",
            "you know",
            "like",
            "so",
            ".",
            "\n",
            "   ",
            "ÉCOLE",
            "नमस्ते",
        ]),
        0..120,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn scores_stay_in_bounds(
        ref text in introduction_like(),
        polarity in -1.0f64..=1.0,
        errors in 0usize..50,
    ) {
        let engine = RubricEngine::new(Box::new(FixedSentiment(polarity)))
            .with_grammar_checker(Box::new(FixedGrammar(errors)));
        let report = engine.score(text).unwrap();

        prop_assert!(report.overall_score <= 100);
        for category in Category::ALL {
            prop_assert!(report.category_total(category) <= category.max_score());
        }
        prop_assert_eq!(report.overall_score as u32, report.raw_total());
    }

    #[test]
    fn arbitrary_input_never_panics(ref text in ".{0,400}") {
        let engine = RubricEngine::new(Box::new(FixedSentiment(0.0)));
        let report = engine.score(text).unwrap();
        prop_assert!(report.overall_score <= 100);
        prop_assert!(report.clarity.filler_word_rate_percent >= 0.0);
    }

    #[test]
    fn scoring_is_deterministic(ref text in introduction_like(), polarity in -1.0f64..=1.0) {
        let engine = RubricEngine::new(Box::new(FixedSentiment(polarity)));
        prop_assert_eq!(engine.score(text).unwrap(), engine.score(text).unwrap());
    }

    #[test]
    fn more_grammar_errors_never_raise_the_score(
        ref text in introduction_like(),
        errors in 0usize..20,
    ) {
        let fewer = RubricEngine::new(Box::new(FixedSentiment(0.0)))
            .with_grammar_checker(Box::new(FixedGrammar(errors)))
            .score(text)
            .unwrap();
        let more = RubricEngine::new(Box::new(FixedSentiment(0.0)))
            .with_grammar_checker(Box::new(FixedGrammar(errors + 1)))
            .score(text)
            .unwrap();
        prop_assert!(
            more.language_and_grammar.grammar_score <= fewer.language_and_grammar.grammar_score
        );
    }
}
