pub mod settings;

pub use settings::{AppConfig, DownloadConfig, FileConfig, ServerConfig};
