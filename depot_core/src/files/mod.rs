pub mod fetch;
pub mod listing;
pub mod manager;
pub mod models;
pub mod naming;
pub mod origin;
pub mod parsers;
pub mod validation;

pub use fetch::{HttpFetcher, NetworkError, RemoteFetcher};
pub use listing::{FolderLister, WalkDirLister};
pub use manager::{FileManager, FileManagerConfig};
pub use models::{FileNameParts, UploadDescriptor, WriteMode};
pub use naming::{NameSplitter, UrlNameSplitter};
pub use origin::{AnyOrigin, StagingArea, UploadOrigin};
pub use parsers::{csv_line, plain_text_line};
pub use validation::{validate_file_name, UploadRules, UploadValidator, ValidationError};
