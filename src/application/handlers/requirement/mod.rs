//! Requirement extraction and merge pipeline.

mod extractor;

pub use extractor::{ExtractionOutcome, RequirementExtractor};
