//! Metadata model for physics publications.
//!
//! * [`document`]: typed records and their `_type`-tagged JSON form
//! * [`catalog`]: the record types (people, aliases, publications, snapshots)
//! * [`names`]: abbreviation-tolerant author name comparison
//! * [`pacs`]: PACS keyword segmentation and code extraction
//! * [`store`]: JSONL document storage and alias lookup

pub mod catalog;
pub mod common;
pub mod document;
pub mod names;
pub mod pacs;
pub mod store;
