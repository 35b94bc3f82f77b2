//! Follow records and their validation

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalyzerError, Result};

/// One followed account as delivered by the acquisition side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowRecord {
    /// Unique account handle
    pub handle: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub posts_count: Option<u64>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl FollowRecord {
    /// Record carrying only a handle
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A record that was rejected during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// Where the record came from, e.g. `following[3]` or `alice.bsky.social[0]`
    pub context: String,
    pub reason: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.reason)
    }
}

impl From<AnalyzerError> for LoadIssue {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::MalformedRecord { context, reason } => LoadIssue { context, reason },
            other => LoadIssue {
                context: "input".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Validated follow data ready for graph construction
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    /// Handle of the analyzed account
    pub source_handle: String,

    /// The analyzed account's direct follows
    pub source_follows: Vec<FollowRecord>,

    /// Each followed account's own follow list, ordered by handle
    pub network: BTreeMap<String, Vec<FollowRecord>>,

    /// Records that were skipped
    pub issues: Vec<LoadIssue>,
}

impl LoadedRecords {
    /// Total number of accepted follow entries
    pub fn record_count(&self) -> usize {
        self.source_follows.len() + self.network.values().map(Vec::len).sum::<usize>()
    }
}

/// Validate a single raw follow entry
pub fn parse_record(value: &Value, context: &str) -> Result<FollowRecord> {
    match value.get("handle") {
        Some(Value::String(handle)) if !handle.trim().is_empty() => {}
        Some(Value::String(_)) => return Err(AnalyzerError::malformed(context, "empty handle")),
        Some(_) => return Err(AnalyzerError::malformed(context, "handle is not a string")),
        None => return Err(AnalyzerError::malformed(context, "missing handle")),
    }

    serde_json::from_value(value.clone())
        .map_err(|e| AnalyzerError::malformed(context, e.to_string()))
}

/// Validate one follow list, collecting rejected entries instead of failing
fn parse_follow_list(
    entries: &[Value],
    label: &str,
    issues: &mut Vec<LoadIssue>,
) -> Vec<FollowRecord> {
    let mut records = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        match parse_record(entry, &format!("{}[{}]", label, i)) {
            Ok(record) => records.push(record),
            Err(err) => {
                let issue = LoadIssue::from(err);
                log::warn!("Skipping follow record {}", issue);
                issues.push(issue);
            }
        }
    }

    records
}

/// Turn raw follow lists into validated records.
///
/// Rejected entries are collected in [`LoadedRecords::issues`]; only a
/// blank source handle aborts the load.
pub fn load_records<I>(
    source_handle: &str,
    source_entries: &[Value],
    network: I,
) -> Result<LoadedRecords>
where
    I: IntoIterator<Item = (String, Vec<Value>)>,
{
    if source_handle.trim().is_empty() {
        return Err(AnalyzerError::malformed("source account", "missing handle"));
    }

    let mut issues = Vec::new();
    let source_follows = parse_follow_list(source_entries, source_handle, &mut issues);

    let mut network_records = BTreeMap::new();
    for (account, entries) in network {
        if account.trim().is_empty() {
            let issue = LoadIssue {
                context: "network".to_string(),
                reason: format!(
                    "follow list with blank account handle ({} entries)",
                    entries.len()
                ),
            };
            log::warn!("Skipping follow list {}", issue);
            issues.push(issue);
            continue;
        }

        let records = parse_follow_list(&entries, &account, &mut issues);
        network_records.insert(account, records);
    }

    let loaded = LoadedRecords {
        source_handle: source_handle.to_string(),
        source_follows,
        network: network_records,
        issues,
    };

    log::info!(
        "Loaded {} direct follows and {} follow lists ({} records, {} rejected)",
        loaded.source_follows.len(),
        loaded.network.len(),
        loaded.record_count(),
        loaded.issues.len()
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_record_defaults_optional_fields() {
        let record = parse_record(&json!({"handle": "alice", "display_name": null}), "t").unwrap();
        assert_eq!(record, FollowRecord::new("alice"));
    }

    #[test]
    fn test_parse_record_ignores_unknown_fields() {
        let value = json!({
            "handle": "bob",
            "did": "did:plc:xyz",
            "description": "hello",
            "posts_count": 12,
            "created_at": "2023-05-01T00:00:00Z"
        });
        let record = parse_record(&value, "t").unwrap();
        assert_eq!(record.description.as_deref(), Some("hello"));
        assert_eq!(record.posts_count, Some(12));
        assert_eq!(record.created_at.as_deref(), Some("2023-05-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_record_requires_handle() {
        let err = parse_record(&json!({"display_name": "no handle"}), "following[0]").unwrap_err();
        match err {
            AnalyzerError::MalformedRecord { context, .. } => assert_eq!(context, "following[0]"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_record(&json!({"handle": 7}), "t").is_err());
        assert!(parse_record(&json!({"handle": "  "}), "t").is_err());
    }

    #[test]
    fn test_load_records_collects_issues_per_record() {
        let source = vec![json!({"handle": "a"}), json!({"name": "x"}), json!({"handle": "b"})];
        let network = vec![
            ("a".to_string(), vec![json!({"handle": "c"}), json!({})]),
            ("b".to_string(), vec![json!({"handle": "c"})]),
        ];

        let loaded = load_records("me", &source, network).unwrap();

        assert_eq!(loaded.source_follows.len(), 2);
        assert_eq!(loaded.network["a"].len(), 1);
        assert_eq!(loaded.network["b"].len(), 1);
        assert_eq!(loaded.issues.len(), 2);
        assert_eq!(loaded.issues[0].context, "me[1]");
        assert_eq!(loaded.issues[1].context, "a[1]");
    }

    #[test]
    fn test_load_records_does_not_deduplicate() {
        let source = vec![json!({"handle": "a"}), json!({"handle": "a"})];
        let loaded = load_records("me", &source, Vec::new()).unwrap();
        assert_eq!(loaded.source_follows.len(), 2);
    }

    #[test]
    fn test_blank_source_handle_is_fatal() {
        let result = load_records(" ", &[], Vec::new());
        assert!(matches!(result, Err(AnalyzerError::MalformedRecord { .. })));
    }
}
