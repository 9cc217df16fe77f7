use std::path::PathBuf;
use thiserror::Error;

use super::models::UploadDescriptor;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("No file was provided")]
    MissingName,

    #[error("File too large: {size_kb} KB (max: {max_kb} KB)")]
    SizeExceeded { size_kb: u64, max_kb: u64 },

    #[error("Unsupported file type: '{extension}' (allowed: {})", .allowed.join(", "))]
    UnsupportedType { extension: String, allowed: Vec<String> },

    #[error("Invalid filename: {name}")]
    InvalidName { name: String },

    #[error("Rejected upload: {} was not staged by the upload intake", .tmp_path.display())]
    UntrustedUpload { tmp_path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct UploadRules {
    pub allowed_extensions: Vec<String>,
    pub max_file_size_kb: u64,
}

#[derive(Clone)]
pub struct UploadValidator {
    rules: UploadRules,
}

impl UploadValidator {
    pub fn new(rules: UploadRules) -> Self {
        Self { rules }
    }

    /// Checks run in a fixed order: name present, size, extension, then
    /// filename safety. Nothing touches the filesystem.
    pub fn validate(&self, upload: &UploadDescriptor) -> Result<(), ValidationError> {
        if upload.name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        self.validate_size(upload.size)?;
        self.validate_extension(&upload.name)?;
        validate_file_name(&upload.name)?;

        Ok(())
    }

    fn validate_size(&self, size_bytes: u64) -> Result<(), ValidationError> {
        let size_kb = size_bytes.div_ceil(1024);
        if size_kb > self.rules.max_file_size_kb {
            return Err(ValidationError::SizeExceeded {
                size_kb,
                max_kb: self.rules.max_file_size_kb,
            });
        }
        Ok(())
    }

    fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = extension_of(filename);

        let allowed = self
            .rules
            .allowed_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension));

        if !allowed {
            return Err(ValidationError::UnsupportedType {
                extension: extension.to_string(),
                allowed: self.rules.allowed_extensions.clone(),
            });
        }
        Ok(())
    }
}

/// Rejects names that would not stay inside the directory they are joined to.
pub fn validate_file_name(filename: &str) -> Result<(), ValidationError> {
    if filename.is_empty() || filename == "." || filename == ".." {
        return Err(ValidationError::InvalidName {
            name: filename.to_string(),
        });
    }

    if filename.contains('\0') || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidName {
            name: filename.to_string(),
        });
    }

    Ok(())
}

/// Text after the last `.`, or `""` when the name has none.
pub fn extension_of(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
