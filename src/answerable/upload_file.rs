// src/answerable/upload_file.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::UploadFileMetadata;
use crate::models::answer::{FileReference, UploadFileAnswer};
use crate::models::question::Question;

/// Upload-file questions. Validation covers the file *count* only; per-file
/// size and type limits are enforced by the external file storage when the
/// bytes arrive, this variant only ever sees the reference list.
#[derive(Debug, Clone)]
pub struct UploadFileAnswerable {
    question: Question,
    form_id: Uuid,
    metadata: UploadFileMetadata,
}

/// Request and storage share the same shape.
#[derive(Debug, Serialize, Deserialize)]
struct StoredFiles {
    files: Vec<FileReference>,
}

impl UploadFileAnswerable {
    pub fn new(question: Question, form_id: Uuid, metadata: UploadFileMetadata) -> Self {
        UploadFileAnswerable {
            question,
            form_id,
            metadata,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    pub fn metadata(&self) -> &UploadFileMetadata {
        &self.metadata
    }

    pub fn decode_request(&self, raw: &[u8]) -> Result<UploadFileAnswer, AppError> {
        let stored: StoredFiles =
            serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("expected a files object: {}", e),
            })?;
        if stored.files.is_empty() && self.question.required {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: "an answer is required".to_string(),
            });
        }
        let limit = self.metadata.max_file_amount as usize;
        if stored.files.len() > limit {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("{} files submitted, limit is {}", stored.files.len(), limit),
            });
        }
        Ok(UploadFileAnswer {
            files: stored.files,
        })
    }

    pub fn decode_storage(&self, raw: &[u8]) -> Result<UploadFileAnswer, AppError> {
        let stored: StoredFiles =
            serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("corrupt stored file answer: {}", e),
            })?;
        Ok(UploadFileAnswer {
            files: stored.files,
        })
    }

    pub fn encode_request(&self, answer: &UploadFileAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredFiles {
            files: answer.files.clone(),
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage(&self, answer: &UploadFileAnswer) -> Result<Vec<u8>, AppError> {
        self.encode_request(answer)
    }

    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage(raw)?;
        let names: Vec<&str> = answer
            .files
            .iter()
            .map(|file| file.original_filename.as_str())
            .collect();
        Ok(names.join(", "))
    }
}
