use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::files::FileManagerConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub files: FileConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub upload_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub max_file_size_kb: u64,
    pub allowed_extensions: Vec<String>,
    /// Searched after `upload_dir`, in order.
    pub search_roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub cache_dir: PathBuf,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            staging_dir: PathBuf::from("./staging"),
            max_file_size_kb: 2048,
            allowed_extensions: vec![
                "txt".to_string(),
                "csv".to_string(),
                "tsv".to_string(),
                "json".to_string(),
            ],
            search_roots: Vec::new(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache"),
            timeout_seconds: 30,
            user_agent: concat!("file-depot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FileConfig {
    pub fn to_manager_config(&self, download: &DownloadConfig) -> FileManagerConfig {
        FileManagerConfig {
            upload_folder: self.upload_dir.clone(),
            allowed_extensions: self.allowed_extensions.clone(),
            max_allowed_file_size: self.max_file_size_kb,
            fetch_timeout: download.timeout(),
        }
    }
}

impl DownloadConfig {
    /// `None` when the timeout is disabled with `0`.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl AppConfig {
    /// Defaults, then `depot.toml` if present, then `DEPOT_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("depot.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("DEPOT")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("files.allowed_extensions")
                .with_list_parse_key("files.search_roots")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.files.max_file_size_kb == 0 {
            return Err(ConfigError::Message(
                "Max file size must be greater than 0".to_string(),
            ));
        }

        if self.files.allowed_extensions.is_empty() {
            return Err(ConfigError::Message(
                "At least one upload extension must be allowed".to_string(),
            ));
        }

        if self.files.upload_dir == self.files.staging_dir {
            return Err(ConfigError::Message(
                "Staging directory must differ from the upload directory".to_string(),
            ));
        }

        Ok(())
    }

    pub fn create_directories(&self) -> Result<(), std::io::Error> {
        std::fs::create_dir_all(&self.files.upload_dir)?;
        std::fs::create_dir_all(&self.files.staging_dir)?;
        std::fs::create_dir_all(&self.download.cache_dir)?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
