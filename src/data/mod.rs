//! Input loading: follow records and community tables

pub mod communities;
pub mod json;
pub mod records;

pub use records::{FollowRecord, LoadIssue, LoadedRecords};
