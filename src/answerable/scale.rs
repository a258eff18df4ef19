// src/answerable/scale.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::ScaleMetadata;
use crate::models::answer::ScaleAnswer;
use crate::models::question::Question;

/// Linear scale and rating questions. The wire value is a bare JSON integer
/// inside the configured inclusive range; floats are rejected, not truncated.
#[derive(Debug, Clone)]
pub struct ScaleAnswerable {
    question: Question,
    form_id: Uuid,
    metadata: ScaleMetadata,
}

/// Storage shape of a scale answer.
#[derive(Debug, Serialize, Deserialize)]
struct StoredScale {
    value: i64,
}

impl ScaleAnswerable {
    pub fn new(question: Question, form_id: Uuid, metadata: ScaleMetadata) -> Self {
        ScaleAnswerable {
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

    pub fn metadata(&self) -> &ScaleMetadata {
        &self.metadata
    }

    pub fn decode_request(&self, raw: &[u8]) -> Result<ScaleAnswer, AppError> {
        let value: Value = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("expected a JSON integer: {}", e),
        })?;
        // `as_i64` is None for floats, so 3.5 (and 3.0) never sneak through.
        let value = value.as_i64().ok_or_else(|| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("expected a JSON integer, got {}", value),
        })?;
        if value < self.metadata.min_val || value > self.metadata.max_val {
            return Err(AppError::InvalidScaleValue {
                question_id: self.question.id,
                value,
                min: self.metadata.min_val,
                max: self.metadata.max_val,
            });
        }
        Ok(ScaleAnswer { value })
    }

    /// Accepts the stored object or the bare-integer request shape. The range
    /// is not re-checked; the bounds may have changed since the answer was
    /// written.
    pub fn decode_storage(&self, raw: &[u8]) -> Result<ScaleAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredScale>(raw) {
            return Ok(ScaleAnswer {
                value: stored.value,
            });
        }
        let value: Value = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("corrupt stored scale answer: {}", e),
        })?;
        let value = value.as_i64().ok_or_else(|| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("corrupt stored scale answer: {}", value),
        })?;
        Ok(ScaleAnswer { value })
    }

    pub fn encode_request(&self, answer: &ScaleAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&answer.value).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage(&self, answer: &ScaleAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredScale {
            value: answer.value,
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        Ok(self.decode_storage(raw)?.value.to_string())
    }

    pub fn canonical(&self, raw: &[u8]) -> Result<String, AppError> {
        self.display_value(raw)
    }
}
