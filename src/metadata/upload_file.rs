// src/metadata/upload_file.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;

/// Upper bound for `max_file_size_limit`: 10 MiB.
pub const MAX_FILE_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Upper bound for `max_file_amount`.
pub const MAX_FILE_AMOUNT: u32 = 10;

/// Metadata of upload-file questions.
///
/// Only the answer's file *count* is validated here; per-file size and type
/// enforcement belongs to the external file storage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileMetadata {
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    #[validate(range(min = 1, max = 10))]
    pub max_file_amount: u32,
    #[validate(range(min = 1, max = 10_485_760))]
    pub max_file_size_limit: u64,
}

impl UploadFileMetadata {
    pub fn check(&self) -> Result<(), String> {
        if self.max_file_amount < 1 || self.max_file_amount > MAX_FILE_AMOUNT {
            return Err(format!(
                "maxFileAmount {} is outside [1, {}]",
                self.max_file_amount, MAX_FILE_AMOUNT
            ));
        }
        if self.max_file_size_limit < 1 || self.max_file_size_limit > MAX_FILE_SIZE_LIMIT {
            return Err(format!(
                "maxFileSizeLimit {} is outside [1, {}]",
                self.max_file_size_limit, MAX_FILE_SIZE_LIMIT
            ));
        }
        Ok(())
    }
}

/// Validates an editor payload and produces canonical upload-file metadata.
pub fn generate(payload: &Value) -> Result<UploadFileMetadata, AppError> {
    let metadata: UploadFileMetadata = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
    metadata
        .validate()
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
    Ok(metadata)
}
