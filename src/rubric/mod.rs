//! Rubric tables: keyword dictionaries, greeting tiers, filler lists and threshold bands
//!
//! The tables are plain data so they can be printed, diffed and replaced from a config
//! file. `Rubric::standard()` is the process-wide default, built once on first use.

mod bands;

pub use bands::{BandTable, Bound, ThresholdBand};

use crate::error::ScoringError;
use crate::Category;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One labelled group of substring patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub label: String,
    pub patterns: Vec<String>,
}

impl KeywordCategory {
    pub fn new(label: &str, patterns: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered label → patterns mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordDictionary {
    pub categories: Vec<KeywordCategory>,
}

impl KeywordDictionary {
    pub fn new(categories: Vec<KeywordCategory>) -> Self {
        Self { categories }
    }

    pub fn get(&self, label: &str) -> Option<&KeywordCategory> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordCategory> {
        self.categories.iter()
    }
}

/// Greeting phrases by tier, strongest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalutationTiers {
    pub strong: Vec<String>,
    pub good: Vec<String>,
    pub basic: Vec<String>,
}

impl Default for SalutationTiers {
    fn default() -> Self {
        Self {
            strong: strings(&[
                "i am excited to introduce myself",
                "i'm very happy to introduce myself",
                "i am very happy to introduce myself",
            ]),
            good: strings(&[
                "good morning",
                "good afternoon",
                "good evening",
                "good day",
                "hello everyone",
            ]),
            basic: strings(&["hi", "hello"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechRateRubric {
    /// Speaking time assumed for every transcript, in seconds
    pub assumed_duration_secs: f64,
    pub bands: BandTable,
}

impl Default for SpeechRateRubric {
    fn default() -> Self {
        Self {
            assumed_duration_secs: 52.0,
            bands: BandTable::new(
                vec![
                    ThresholdBand::above(161.0, 2),
                    ThresholdBand::between(141.0, 160.0, 6),
                    ThresholdBand::between(111.0, 140.0, 10),
                    ThresholdBand::between(81.0, 110.0, 6),
                ],
                2,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrammarRubric {
    /// Errors per 100 words at which the grammar ratio bottoms out at 0
    pub errors_per_100_ceiling: f64,
    pub bands: BandTable,
}

impl Default for GrammarRubric {
    fn default() -> Self {
        Self {
            errors_per_100_ceiling: 10.0,
            bands: BandTable::ratio_ladder([10, 8, 6, 4], 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityRubric {
    /// Filler words and phrases; entries containing a space are matched as phrases
    pub fillers: Vec<String>,
    /// Bands over the filler rate in percent
    pub bands: BandTable,
}

impl ClarityRubric {
    pub fn single_word_fillers(&self) -> impl Iterator<Item = &str> {
        self.fillers.iter().map(String::as_str).filter(|f| !f.contains(' '))
    }

    pub fn multi_word_fillers(&self) -> impl Iterator<Item = &str> {
        self.fillers.iter().map(String::as_str).filter(|f| f.contains(' '))
    }
}

impl Default for ClarityRubric {
    fn default() -> Self {
        Self {
            fillers: strings(&[
                "um",
                "uh",
                "like",
                "you know",
                "so",
                "actually",
                "basically",
                "right",
                "i mean",
                "well",
                "kinda",
                "sort of",
                "okay",
                "hmm",
                "ah",
            ]),
            bands: BandTable::new(
                vec![
                    ThresholdBand::at_most(3.0, 15),
                    ThresholdBand::between(4.0, 6.0, 12),
                    ThresholdBand::between(7.0, 9.0, 9),
                    ThresholdBand::between(10.0, 12.0, 6),
                ],
                3,
            ),
        }
    }
}

/// Every table the evaluators consult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rubric {
    pub salutations: SalutationTiers,
    /// Closing phrases, in lookup order
    pub closings: Vec<String>,
    pub must_have: KeywordDictionary,
    pub good_to_have: KeywordDictionary,
    pub speech_rate: SpeechRateRubric,
    pub grammar: GrammarRubric,
    /// Bands over the type-token ratio
    pub vocabulary: BandTable,
    pub clarity: ClarityRubric,
    /// Bands over the positive-sentiment probability
    pub engagement: BandTable,
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            salutations: SalutationTiers::default(),
            closings: strings(&["thank you", "thanks", "that's all"]),
            must_have: KeywordDictionary::new(vec![
                KeywordCategory::new("Name", &["name is", "i am", "my name"]),
                KeywordCategory::new(
                    "Age",
                    &[
                        "years old", "age is", "i am 1", "i am 2", "i am 3", "i am 4", "i am 5",
                        "i am 6", "i am 7", "i am 8", "i am 9",
                    ],
                ),
                KeywordCategory::new(
                    "School/Class",
                    &["study in", "class", "grade", "school", "student at"],
                ),
                KeywordCategory::new(
                    "Family",
                    &[
                        "family",
                        "parents",
                        "brother",
                        "sister",
                        "mother",
                        "father",
                        "live with",
                    ],
                ),
                KeywordCategory::new(
                    "Hobbies",
                    &[
                        "hobby", "hobbies", "like to", "enjoy", "love to", "playing", "reading",
                    ],
                ),
            ]),
            good_to_have: KeywordDictionary::new(vec![
                KeywordCategory::new(
                    "Family Details",
                    &[
                        "father is",
                        "mother is",
                        "sister is",
                        "brother is",
                        "parents are",
                    ],
                ),
                KeywordCategory::new(
                    "Origin",
                    &["i am from", "parents are from", "born in", "native"],
                ),
                KeywordCategory::new(
                    "Ambition",
                    &["want to become", "goal", "future", "aim to", "dream"],
                ),
                KeywordCategory::new(
                    "Unique",
                    &["interesting", "unique", "fact about me", "special"],
                ),
                KeywordCategory::new(
                    "Strengths",
                    &["strength", "good at", "achievement", "proud of"],
                ),
            ]),
            speech_rate: SpeechRateRubric::default(),
            grammar: GrammarRubric::default(),
            vocabulary: BandTable::ratio_ladder([10, 8, 6, 4], 2),
            clarity: ClarityRubric::default(),
            engagement: BandTable::ratio_ladder([15, 12, 9, 6], 3),
        }
    }
}

static STANDARD: OnceLock<Rubric> = OnceLock::new();

impl Rubric {
    /// The built-in tables, shared for the life of the process
    pub fn standard() -> &'static Rubric {
        STANDARD.get_or_init(Rubric::default)
    }

    /// Reject tables the evaluators cannot score within their category bounds
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.check().map_err(ScoringError::InvalidRubric)
    }

    fn check(&self) -> Result<(), String> {
        let duration = self.speech_rate.assumed_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(format!(
                "assumedDurationSecs must be positive, got {}",
                duration
            ));
        }
        let ceiling = self.grammar.errors_per_100_ceiling;
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(format!(
                "errorsPer100Ceiling must be positive, got {}",
                ceiling
            ));
        }

        self.speech_rate
            .bands
            .validate("speech rate", Category::SpeechRate.max_score())?;
        self.grammar.bands.validate("grammar", 10)?;
        self.vocabulary.validate("vocabulary", 10)?;
        self.clarity
            .bands
            .validate("clarity", Category::Clarity.max_score())?;
        self.engagement
            .validate("engagement", Category::Engagement.max_score())?;

        let tiers = [
            ("strong salutations", &self.salutations.strong),
            ("good salutations", &self.salutations.good),
            ("basic salutations", &self.salutations.basic),
            ("closings", &self.closings),
            ("fillers", &self.clarity.fillers),
        ];
        for (name, patterns) in tiers {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(format!("{} contain an empty pattern", name));
            }
        }
        for category in self.must_have.iter().chain(self.good_to_have.iter()) {
            if category.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(format!(
                    "keyword category '{}' contains an empty pattern",
                    category.label
                ));
            }
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
