//! JSON file handling for follow data

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::data::records::{load_records, LoadIssue, LoadedRecords};
use crate::error::{AnalyzerError, Result};

/// Read a file holding a JSON array of account objects
fn read_follow_list(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Array(entries) => Ok(entries),
        _ => Err(AnalyzerError::malformed(
            path.display().to_string(),
            "expected a JSON array of accounts",
        )),
    }
}

/// Load the analyzed account's follow list and the per-account follow lists.
///
/// `network_dir` holds one `<handle>.json` file per followed account. Files
/// are read in handle order; a file that cannot be parsed is reported as an
/// issue and skipped, while an unreadable main file aborts the load.
pub fn load_network_data(
    main_json_path: &Path,
    network_dir: &Path,
    source_handle: &str,
) -> Result<LoadedRecords> {
    log::info!("Reading follow list: {}", main_json_path.display());

    if !main_json_path.exists() {
        return Err(AnalyzerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", main_json_path.display()),
        )));
    }

    let main_following = read_follow_list(main_json_path)?;

    let mut files: Vec<(String, std::path::PathBuf)> = Vec::new();
    if network_dir.is_dir() {
        for entry in fs::read_dir(network_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }
    } else {
        log::warn!(
            "Network directory {} not found, loading direct follows only",
            network_dir.display()
        );
    }
    files.sort();

    log::info!("Reading {} follow lists from {}", files.len(), network_dir.display());

    let mut file_issues = Vec::new();
    let mut network = Vec::with_capacity(files.len());
    for (handle, path) in files {
        match read_follow_list(&path) {
            Ok(entries) => network.push((handle, entries)),
            Err(err) => {
                let issue = LoadIssue {
                    context: path.display().to_string(),
                    reason: err.to_string(),
                };
                log::warn!("Skipping follow list {}", issue);
                file_issues.push(issue);
            }
        }
    }

    let mut loaded = load_records(source_handle, &main_following, network)?;
    loaded.issues.extend(file_issues);

    Ok(loaded)
}
