//! Line callbacks for [`FileManager::download_and_parse_file`].
//!
//! [`FileManager::download_and_parse_file`]: super::FileManager::download_and_parse_file

/// Keeps each line as-is, skipping `#` comments.
pub fn plain_text_line(_extension: &str, line: &str) -> Option<String> {
    if line.starts_with('#') {
        return None;
    }
    Some(line.to_string())
}

/// Splits a line into trimmed fields: on `,` for csv, on tabs for tsv, and
/// as a single field otherwise. Records with only empty fields are dropped.
pub fn csv_line(extension: &str, line: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = if extension.eq_ignore_ascii_case("csv") {
        line.split(',').map(|f| f.trim().to_string()).collect()
    } else if extension.eq_ignore_ascii_case("tsv") {
        line.split('\t').map(|f| f.trim().to_string()).collect()
    } else {
        vec![line.trim().to_string()]
    };

    if fields.iter().all(|f| f.is_empty()) {
        None
    } else {
        Some(fields)
    }
}
