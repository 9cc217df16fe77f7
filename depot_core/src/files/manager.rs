use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{DepotError, Result};
use super::fetch::{NetworkError, RemoteFetcher};
use super::listing::{FolderLister, WalkDirLister};
use super::models::{UploadDescriptor, WriteMode};
use super::naming::{NameSplitter, UrlNameSplitter};
use super::origin::{AnyOrigin, UploadOrigin};
use super::validation::{validate_file_name, UploadRules, UploadValidator, ValidationError};

#[derive(Debug, Clone)]
pub struct FileManagerConfig {
    pub upload_folder: PathBuf,
    pub allowed_extensions: Vec<String>,
    /// Upper bound for uploads, in KB.
    pub max_allowed_file_size: u64,
    pub fetch_timeout: Option<Duration>,
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            upload_folder: PathBuf::from("uploads"),
            allowed_extensions: vec!["txt".to_string(), "csv".to_string()],
            max_allowed_file_size: 2048,
            fetch_timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Clone)]
pub struct FileManager {
    config: FileManagerConfig,
    validator: UploadValidator,
    fetcher: Arc<dyn RemoteFetcher>,
    splitter: Arc<dyn NameSplitter>,
    lister: Arc<dyn FolderLister>,
    origin: Arc<dyn UploadOrigin>,
}

impl FileManager {
    pub fn new(config: FileManagerConfig, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        let validator = UploadValidator::new(UploadRules {
            allowed_extensions: config.allowed_extensions.clone(),
            max_file_size_kb: config.max_allowed_file_size,
        });

        Self {
            config,
            validator,
            fetcher,
            splitter: Arc::new(UrlNameSplitter),
            lister: Arc::new(WalkDirLister),
            origin: Arc::new(AnyOrigin),
        }
    }

    pub fn with_origin(mut self, origin: Arc<dyn UploadOrigin>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_lister(mut self, lister: Arc<dyn FolderLister>) -> Self {
        self.lister = lister;
        self
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn NameSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn config(&self) -> &FileManagerConfig {
        &self.config
    }

    pub async fn initialize(&self) -> Result<()> {
        if !self.config.upload_folder.exists() {
            async_fs::create_dir_all(&self.config.upload_folder)
                .await
                .map_err(|e| DepotError::io("create", &self.config.upload_folder, e))?;
        }
        Ok(())
    }

    /// Reads a whole file as text. Zero-length files short-circuit to `""`.
    pub async fn read_local_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();

        let metadata = async_fs::metadata(path)
            .await
            .map_err(|e| DepotError::io("open", path, e))?;
        if metadata.len() == 0 {
            return Ok(String::new());
        }

        async_fs::read_to_string(path)
            .await
            .map_err(|e| DepotError::io("read", path, e))
    }

    pub async fn write_local_file(
        &self,
        text: &str,
        path: impl AsRef<Path>,
        mode: WriteMode,
    ) -> Result<()> {
        let path = path.as_ref();

        let mut options = async_fs::OpenOptions::new();
        match mode {
            WriteMode::Overwrite => {
                options.write(true).create(true).truncate(true);
            }
            WriteMode::Append => {
                options.append(true).create(true);
            }
        }

        let mut file = options
            .open(path)
            .await
            .map_err(|e| DepotError::io("open", path, e))?;
        // write_all reports a write that makes no progress as WriteZero.
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| DepotError::io("write", path, e))?;
        file.flush()
            .await
            .map_err(|e| DepotError::io("close", path, e))?;

        Ok(())
    }

    pub async fn copy_file(&self, source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<()> {
        let (source, target) = (source.as_ref(), target.as_ref());

        async_fs::copy(source, target)
            .await
            .map_err(|e| DepotError::Copy {
                from: source.to_path_buf(),
                to: target.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    pub async fn delete_local_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        async_fs::remove_file(path)
            .await
            .map_err(|e| DepotError::io("delete", path, e))
    }

    /// Validates a staged upload and promotes it into the upload folder,
    /// returning its final location.
    pub async fn upload_file(&self, upload: &UploadDescriptor) -> Result<PathBuf> {
        if let Err(e) = self.validator.validate(upload) {
            warn!("Rejected upload '{}': {}", upload.name, e);
            return Err(e.into());
        }

        let path = self.config.upload_folder.join(&upload.name);

        if !self.origin.is_uploaded_file(&upload.tmp_path) {
            warn!(
                "Rejected upload '{}': {} is not a staged upload",
                upload.name,
                upload.tmp_path.display()
            );
            return Err(ValidationError::UntrustedUpload {
                tmp_path: upload.tmp_path.clone(),
            }
            .into());
        }

        if upload.tmp_path != path {
            self.copy_file(&upload.tmp_path, &path).await?;
        }

        info!("Stored upload '{}' ({} bytes) at {}", upload.name, upload.size, path.display());
        Ok(path)
    }

    /// Returns the parsed lines of a remote file, fetching it only when no
    /// copy exists in `local_dir` yet.
    ///
    /// Lines are trimmed and handed to `line_parser` together with the file
    /// extension. Processing ends at the first blank line; `None` results
    /// are dropped.
    pub async fn download_and_parse_file<T, F>(
        &self,
        file_url: &str,
        local_dir: impl AsRef<Path>,
        line_parser: F,
    ) -> Result<Vec<T>>
    where
        F: Fn(&str, &str) -> Option<T>,
    {
        let local_dir = local_dir.as_ref();
        let parts = self.splitter.get_file_name_and_extension(file_url);
        let file_name = url_decode(&parts.file_name);
        // Decoded names may carry separators (%2F) or be empty for `dir/` URLs.
        validate_file_name(&file_name)?;
        let file_path = local_dir.join(&file_name);

        let cached = async_fs::try_exists(&file_path)
            .await
            .map_err(|e| DepotError::io("inspect", &file_path, e))?;

        let content = if cached {
            debug!("Cache hit for {} at {}", file_url, file_path.display());
            self.read_local_file(&file_path).await?
        } else {
            let content = self.fetch_remote(file_url).await?;

            async_fs::create_dir_all(local_dir)
                .await
                .map_err(|e| DepotError::io("create", local_dir, e))?;
            self.write_local_file(&content, &file_path, WriteMode::Overwrite)
                .await?;

            info!("Cached {} at {}", file_url, file_path.display());
            content
        };

        let mut parsed = Vec::new();
        for line in content.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line_parser(&parts.file_extension, line) {
                parsed.push(value);
            }
        }

        Ok(parsed)
    }

    async fn fetch_remote(&self, file_url: &str) -> Result<String> {
        let fetch = self.fetcher.fetch(file_url);

        let content = match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| NetworkError::Timeout {
                    url: file_url.to_string(),
                    timeout_ms: limit.as_millis(),
                })??,
            None => fetch.await?,
        };

        Ok(content)
    }

    /// Finds the first file under `search_roots` whose path contains
    /// `file_name`. Roots are tried in order and the first match wins.
    pub async fn search_file<P: AsRef<Path>>(
        &self,
        search_roots: &[P],
        file_name: &str,
    ) -> Result<Option<PathBuf>> {
        let needle = format!(
            "{}{}",
            MAIN_SEPARATOR,
            file_name.trim_start_matches(['/', '\\'])
        );

        for root in search_roots {
            let root = root.as_ref().to_path_buf();
            let lister = Arc::clone(&self.lister);
            let pattern = needle.clone();

            debug!("Searching {} for '{}'", root.display(), pattern);

            let found = tokio::task::spawn_blocking(move || {
                lister
                    .list_contents(&root, None, None, None, true)
                    .into_iter()
                    .filter(|path| !path.is_dir())
                    .find(|path| path.to_string_lossy().contains(pattern.as_str()))
            })
            .await
            .map_err(|e| anyhow::anyhow!("File search task failed: {}", e))?;

            if found.is_some() {
                return Ok(found);
            }
        }

        Ok(None)
    }
}

fn url_decode(name: &str) -> String {
    percent_decode_str(&name.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
