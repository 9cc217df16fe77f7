use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file already staged by the upload intake, waiting to be promoted into
/// the upload folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub tmp_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileNameParts {
    pub file_name: String,
    pub file_extension: String,
}
