// src/crawl/seeds.rs
// =============================================================================
// Reading a batch seed list from a CSV manifest.
//
// The manifest format is the same one the crawler writes to url_list/:
// no header, the URL in the first column. Extra columns are ignored so a
// richer spreadsheet export works too.
// =============================================================================

use std::path::Path;

use super::session::SessionError;

// Loads the first-column URLs of a manifest file, in file order
//
// Skipped: empty rows, rows whose first cell is blank, rows starting with '#'.
//
// Errors (all session-level, nothing gets crawled):
//   - the file is missing or unreadable
//   - a row is not valid CSV / UTF-8
//   - no URL is left after skipping
pub fn load_seed_manifest(path: &Path) -> Result<Vec<String>, SessionError> {
    let manifest_error = |source| SessionError::SeedManifest {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(manifest_error)?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record.map_err(manifest_error)?;
        let first = record.get(0).map(str::trim).unwrap_or_default();
        if first.is_empty() || first.starts_with('#') {
            continue;
        }
        urls.push(first.to_string());
    }

    if urls.is_empty() {
        return Err(SessionError::EmptySeedList);
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.csv");
        fs::write(
            &path,
            "https://example.com/a\n# a comment\n\nhttps://example.com/b,extra,columns\n  https://example.com/c  \n",
        )
        .unwrap();

        let urls = load_seed_manifest(&path).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_seed_manifest(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(SessionError::SeedManifest { .. })));
    }

    #[test]
    fn test_only_comments_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.csv");
        fs::write(&path, "# nothing here\n\n").unwrap();
        assert!(matches!(
            load_seed_manifest(&path),
            Err(SessionError::EmptySeedList)
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.csv");
        fs::write(&path, b"https://example.com/\xff\xfe\n").unwrap();
        assert!(matches!(
            load_seed_manifest(&path),
            Err(SessionError::SeedManifest { .. })
        ));
    }

    #[test]
    fn test_reads_quoted_manifest_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.csv");
        fs::write(&path, "\"https://example.com/?a=1,2\"\n").unwrap();
        assert_eq!(
            load_seed_manifest(&path).unwrap(),
            vec!["https://example.com/?a=1,2"]
        );
    }
}
