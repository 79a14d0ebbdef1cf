//! Content & structure: greeting, keyword coverage and section ordering (0-40)

use super::CategoryRule;
use crate::error::ScoringError;
use crate::parser::Transcript;
use crate::rubric::{KeywordDictionary, Rubric};
use crate::{Category, ContentScore};

const STRONG_SALUTATION_POINTS: u8 = 5;
const GOOD_SALUTATION_POINTS: u8 = 4;
const BASIC_SALUTATION_POINTS: u8 = 2;

const MUST_HAVE_POINTS: u32 = 4;
const MUST_HAVE_CAP: u32 = 20;
const GOOD_TO_HAVE_POINTS: u32 = 2;
const GOOD_TO_HAVE_CAP: u32 = 10;

const FLOW_START: i32 = 5;
/// Name introduced before the greeting
const NAME_BEFORE_GREETING_PENALTY: i32 = 2;
/// Closing phrase before the name
const CLOSING_BEFORE_NAME_PENALTY: i32 = 3;
/// Hobbies before the name
const HOBBIES_BEFORE_NAME_PENALTY: i32 = 1;

/// Must-have categories whose positions drive the flow check
const NAME_LABEL: &str = "Name";
const HOBBIES_LABEL: &str = "Hobbies";

/// Rule scoring what the speaker covered and in which order
pub struct ContentStructureRule<'r> {
    rubric: &'r Rubric,
}

impl<'r> ContentStructureRule<'r> {
    pub fn new(rubric: &'r Rubric) -> Self {
        Self { rubric }
    }

    /// Highest greeting tier present anywhere in the text
    fn salutation_score(&self, transcript: &Transcript<'_>) -> u8 {
        let tiers = &self.rubric.salutations;
        if transcript.contains_any(&tiers.strong) {
            STRONG_SALUTATION_POINTS
        } else if transcript.contains_any(&tiers.good) {
            GOOD_SALUTATION_POINTS
        } else if transcript.contains_any(&tiers.basic) {
            BASIC_SALUTATION_POINTS
        } else {
            0
        }
    }

    fn coverage_score(
        transcript: &Transcript<'_>,
        dictionary: &KeywordDictionary,
        points: u32,
        cap: u32,
    ) -> u8 {
        let matched = dictionary
            .iter()
            .filter(|category| transcript.contains_any(&category.patterns))
            .count() as u32;
        (matched * points).min(cap) as u8
    }

    /// Start at 5 and deduct for sections that appear out of order.
    ///
    /// Every check is anchored on where the name is introduced; without a
    /// name there is nothing to order against and the full 5 is kept.
    fn flow_score(&self, transcript: &Transcript<'_>) -> u8 {
        let position = |label: &str| {
            self.rubric
                .must_have
                .get(label)
                .and_then(|category| transcript.first_position(&category.patterns))
        };

        let Some(name) = position(NAME_LABEL) else {
            return FLOW_START as u8;
        };

        let greetings: Vec<&str> = self
            .rubric
            .salutations
            .good
            .iter()
            .chain(self.rubric.salutations.basic.iter())
            .map(String::as_str)
            .collect();
        let greeting = transcript.first_position(&greetings);
        let closing = transcript.first_position(&self.rubric.closings);
        let hobbies = position(HOBBIES_LABEL);

        let mut score = FLOW_START;
        if greeting.is_some_and(|g| name < g) {
            score -= NAME_BEFORE_GREETING_PENALTY;
        }
        if closing.is_some_and(|c| c < name) {
            score -= CLOSING_BEFORE_NAME_PENALTY;
        }
        if hobbies.is_some_and(|h| h < name) {
            score -= HOBBIES_BEFORE_NAME_PENALTY;
        }
        score.max(0) as u8
    }
}

impl CategoryRule for ContentStructureRule<'_> {
    type Output = ContentScore;

    fn name(&self) -> &'static str {
        "content-structure"
    }

    fn category(&self) -> Category {
        Category::ContentAndStructure
    }

    fn evaluate(&self, transcript: &Transcript<'_>) -> Result<ContentScore, ScoringError> {
        let salutation = self.salutation_score(transcript);
        let must_have = Self::coverage_score(
            transcript,
            &self.rubric.must_have,
            MUST_HAVE_POINTS,
            MUST_HAVE_CAP,
        );
        let good_to_have = Self::coverage_score(
            transcript,
            &self.rubric.good_to_have,
            GOOD_TO_HAVE_POINTS,
            GOOD_TO_HAVE_CAP,
        );
        let flow = self.flow_score(transcript);
        Ok(ContentScore::new(salutation, must_have, good_to_have, flow))
    }
}
