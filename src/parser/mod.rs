//! Parser module for transcript text

pub mod transcript;

pub use transcript::Transcript;
