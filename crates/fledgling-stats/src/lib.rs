//! Dependency-free descriptive statistics for fitness summaries.

pub use self::descriptive::DescriptiveStats;

pub mod descriptive;
