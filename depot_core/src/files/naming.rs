//! Splitting URLs and paths into a file name and extension.

use url::Url;

use super::models::FileNameParts;
use super::validation::extension_of;

pub trait NameSplitter: Send + Sync {
    fn get_file_name_and_extension(&self, url_or_path: &str) -> FileNameParts;
}

/// Takes the last path segment of a URL (or of a plain path when the input
/// does not parse as an absolute URL) and splits off its extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlNameSplitter;

impl NameSplitter for UrlNameSplitter {
    fn get_file_name_and_extension(&self, url_or_path: &str) -> FileNameParts {
        let file_name = match Url::parse(url_or_path) {
            Ok(url) if !url.cannot_be_a_base() => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or("")
                .to_string(),
            _ => last_segment(url_or_path).to_string(),
        };

        let file_extension = extension_of(&file_name).to_string();

        FileNameParts {
            file_name,
            file_extension,
        }
    }
}

fn last_segment(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> (String, String) {
        let parts = UrlNameSplitter.get_file_name_and_extension(input);
        (parts.file_name, parts.file_extension)
    }

    #[test]
    fn test_split_url() {
        assert_eq!(
            split("https://example.com/data/report.txt"),
            ("report.txt".to_string(), "txt".to_string())
        );
        assert_eq!(
            split("https://example.com/exports/prices.csv?version=2#top"),
            ("prices.csv".to_string(), "csv".to_string())
        );
    }

    #[test]
    fn test_split_keeps_percent_encoding() {
        assert_eq!(
            split("https://example.com/my%20list.txt"),
            ("my%20list.txt".to_string(), "txt".to_string())
        );
    }

    #[test]
    fn test_split_plain_path() {
        assert_eq!(
            split("/var/data/archive.tar.gz"),
            ("archive.tar.gz".to_string(), "gz".to_string())
        );
        assert_eq!(
            split("C:\\exports\\list.TSV"),
            ("list.TSV".to_string(), "TSV".to_string())
        );
        assert_eq!(split("README"), ("README".to_string(), String::new()));
    }

    #[test]
    fn test_split_url_without_file() {
        assert_eq!(split("https://example.com/"), (String::new(), String::new()));
    }
}
