//! PACS subject classification: the controlled vocabulary, keyword-string
//! segmentation against it, and code extraction from free text.

pub mod patterns;
pub mod segment;
pub mod vocabulary;

pub use patterns::{extract_pacs_codes, pacs_level, PACS_REGEX};
pub use segment::{segment, Segmentation, UNIT_SEPARATOR};
pub use vocabulary::PacsVocabulary;
