//! Community groupings read back from the tabular node export

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::data::LoadIssue;
use crate::error::{AnalyzerError, Result};

/// Handles grouped by community id
pub type CommunityGroups = BTreeMap<i64, Vec<String>>;

/// Community table plus the rows that could not be used
#[derive(Debug, Clone, Default)]
pub struct CommunityTable {
    pub groups: CommunityGroups,
    pub issues: Vec<LoadIssue>,
}

#[derive(Debug, Deserialize)]
struct CommunityRow {
    #[serde(rename = "Handle")]
    handle: String,

    #[serde(rename = "Community")]
    community: String,
}

/// Group handles by the `Community` column of a CSV with `Handle, Community` headers.
///
/// Extra columns are ignored, so the full node export can be fed back in.
/// Bad rows are collected as issues; only I/O failures abort the read.
pub fn read_community_groups<R: Read>(reader: R) -> Result<CommunityTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = CommunityTable::default();

    for (i, row) in csv_reader.deserialize::<CommunityRow>().enumerate() {
        // Header is line 1
        let context = format!("row {}", i + 2);

        match row.map_err(AnalyzerError::from).and_then(|row| parse_row(row, &context)) {
            Ok((community, handle)) => table.groups.entry(community).or_default().push(handle),
            Err(AnalyzerError::Csv(err)) if err.is_io_error() => return Err(err.into()),
            Err(AnalyzerError::Csv(err)) => table.issues.push(LoadIssue {
                context,
                reason: err.to_string(),
            }),
            Err(err) => table.issues.push(LoadIssue::from(err)),
        }
    }

    Ok(table)
}

fn parse_row(row: CommunityRow, context: &str) -> Result<(i64, String)> {
    if row.handle.trim().is_empty() {
        return Err(AnalyzerError::malformed(context, "missing handle"));
    }
    let community: i64 = row.community.trim().parse().map_err(|_| {
        AnalyzerError::malformed(
            context,
            format!("community '{}' is not an integer", row.community),
        )
    })?;

    Ok((community, row.handle))
}

/// Load community groups from a CSV file
pub fn load_community_csv(path: &Path) -> Result<CommunityTable> {
    log::info!("Reading community assignments: {}", path.display());

    let file = std::fs::File::open(path)?;
    let table = read_community_groups(file)?;

    for issue in &table.issues {
        log::warn!("Skipping community row: {}", issue);
    }
    log::info!("Found {} communities", table.groups.len());
    Ok(table)
}

/// Draw up to `per_group` members from every community.
///
/// The same seed always yields the same sample.
pub fn sample_members(groups: &CommunityGroups, per_group: usize, seed: u64) -> CommunityGroups {
    let mut rng = StdRng::seed_from_u64(seed);

    groups
        .iter()
        .map(|(&community, members)| {
            let sample = members
                .choose_multiple(&mut rng, per_group.min(members.len()))
                .cloned()
                .collect();
            (community, sample)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODES_CSV: &str = "Handle,DisplayName,Community\n\
                             a,Alice,0\n\
                             b,Bob,1\n\
                             c,,0\n\
                             d,Dee,-1\n";

    #[test]
    fn test_read_community_groups() {
        let table = read_community_groups(NODES_CSV.as_bytes()).unwrap();
        let groups = table.groups;
        assert!(table.issues.is_empty());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&0], vec!["a", "c"]);
        assert_eq!(groups[&1], vec!["b"]);
        assert_eq!(groups[&-1], vec!["d"]);
    }

    #[test]
    fn test_bad_rows_are_collected_not_fatal() {
        let input = "Handle,Community\na,zero\nb,1\n,2\nc\nd,1\n";
        let table = read_community_groups(input.as_bytes()).unwrap();

        assert_eq!(table.groups.len(), 1);
        assert_eq!(table.groups[&1], vec!["b", "d"]);

        let contexts: Vec<&str> = table.issues.iter().map(|i| i.context.as_str()).collect();
        assert_eq!(contexts, vec!["row 2", "row 4", "row 5"]);
        assert!(table.issues[0].reason.contains("not an integer"));
        assert!(table.issues[1].reason.contains("missing handle"));
    }

    #[test]
    fn test_sample_members_is_bounded_and_seeded() {
        let mut groups = CommunityGroups::new();
        groups.insert(0, (0..20).map(|i| format!("user{i}")).collect());
        groups.insert(1, vec!["solo".to_string()]);

        let first = sample_members(&groups, 5, 42);
        let second = sample_members(&groups, 5, 42);

        assert_eq!(first, second);
        assert_eq!(first[&0].len(), 5);
        assert_eq!(first[&1], vec!["solo"]);
        assert!(first[&0].iter().all(|h| groups[&0].contains(h)));
    }
}
