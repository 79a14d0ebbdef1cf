//! Threshold bands: step functions from a continuous metric to a discrete score

use serde::{Deserialize, Serialize};

/// One edge of a band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// No limit on this side
    Open,
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits_from_below(self, value: f64) -> bool {
        match self {
            Bound::Open => true,
            Bound::Inclusive(b) => value >= b,
            Bound::Exclusive(b) => value > b,
        }
    }

    fn admits_from_above(self, value: f64) -> bool {
        match self {
            Bound::Open => true,
            Bound::Inclusive(b) => value <= b,
            Bound::Exclusive(b) => value < b,
        }
    }

    fn limit(self) -> Option<f64> {
        match self {
            Bound::Open => None,
            Bound::Inclusive(b) | Bound::Exclusive(b) => Some(b),
        }
    }
}

/// A (lower, upper, score) triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub lower: Bound,
    pub upper: Bound,
    pub score: u8,
}

impl ThresholdBand {
    pub fn new(lower: Bound, upper: Bound, score: u8) -> Self {
        Self {
            lower,
            upper,
            score,
        }
    }

    /// `value >= min`
    pub fn at_least(min: f64, score: u8) -> Self {
        Self::new(Bound::Inclusive(min), Bound::Open, score)
    }

    /// `value > min`
    pub fn above(min: f64, score: u8) -> Self {
        Self::new(Bound::Exclusive(min), Bound::Open, score)
    }

    /// `value <= max`
    pub fn at_most(max: f64, score: u8) -> Self {
        Self::new(Bound::Open, Bound::Inclusive(max), score)
    }

    /// `min <= value <= max`
    pub fn between(min: f64, max: f64, score: u8) -> Self {
        Self::new(Bound::Inclusive(min), Bound::Inclusive(max), score)
    }

    /// `min <= value < max`
    pub fn half_open(min: f64, max: f64, score: u8) -> Self {
        Self::new(Bound::Inclusive(min), Bound::Exclusive(max), score)
    }

    pub fn contains(&self, value: f64) -> bool {
        !value.is_nan() && self.lower.admits_from_below(value) && self.upper.admits_from_above(value)
    }
}

/// Ordered bands plus the score used when none matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<ThresholdBand>,
    pub fallback: u8,
}

impl BandTable {
    pub fn new(bands: Vec<ThresholdBand>, fallback: u8) -> Self {
        Self { bands, fallback }
    }

    /// The 0.9 / 0.7 / 0.5 / 0.3 ladder shared by ratio-style metrics
    pub fn ratio_ladder(scores: [u8; 4], fallback: u8) -> Self {
        Self::new(
            vec![
                ThresholdBand::at_least(0.9, scores[0]),
                ThresholdBand::half_open(0.7, 0.9, scores[1]),
                ThresholdBand::half_open(0.5, 0.7, scores[2]),
                ThresholdBand::half_open(0.3, 0.5, scores[3]),
            ],
            fallback,
        )
    }

    /// Score of the first band containing `value`, else the fallback
    pub fn score(&self, value: f64) -> u8 {
        self.bands
            .iter()
            .find(|b| b.contains(value))
            .map(|b| b.score)
            .unwrap_or(self.fallback)
    }

    /// Highest score this table can produce
    pub fn max_score(&self) -> u8 {
        self.bands
            .iter()
            .map(|b| b.score)
            .chain(std::iter::once(self.fallback))
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn validate(&self, name: &str, max: u8) -> Result<(), String> {
        if self.bands.is_empty() {
            return Err(format!("{} has no bands", name));
        }
        if self.max_score() > max {
            return Err(format!(
                "{} bands can award {} points but the maximum is {}",
                name,
                self.max_score(),
                max
            ));
        }
        for (idx, band) in self.bands.iter().enumerate() {
            let (lower, upper) = (band.lower.limit(), band.upper.limit());
            if lower.is_some_and(|v| !v.is_finite()) || upper.is_some_and(|v| !v.is_finite()) {
                return Err(format!("{} band #{} has a non-finite bound", name, idx + 1));
            }
            if let (Some(lo), Some(hi)) = (lower, upper) {
                if lo > hi {
                    return Err(format!(
                        "{} band #{} has lower bound {} above upper bound {}",
                        name,
                        idx + 1,
                        lo,
                        hi
                    ));
                }
            }
        }
        Ok(())
    }
}
