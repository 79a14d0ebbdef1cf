//! Analyzer module - rubric scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{AggregateStats, RubricEngine, RubricEngineBuilder};
pub use scoring::ScoreCalculator;
