// src/answerable/text.rs

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::answer::TextAnswer;
use crate::models::question::Question;

/// Short text, long text and hyperlink questions. No metadata; the three
/// types differ only in length cap and the hyperlink URL rule.
#[derive(Debug, Clone)]
pub struct TextAnswerable {
    question: Question,
    form_id: Uuid,
    max_len: usize,
    require_url: bool,
}

/// Storage shape of a text answer.
#[derive(Debug, Serialize, Deserialize)]
struct StoredText {
    value: String,
}

impl TextAnswerable {
    pub fn short(question: Question, form_id: Uuid) -> Self {
        TextAnswerable {
            question,
            form_id,
            max_len: 100,
            require_url: false,
        }
    }

    pub fn long(question: Question, form_id: Uuid) -> Self {
        TextAnswerable {
            question,
            form_id,
            max_len: 1000,
            require_url: false,
        }
    }

    pub fn hyperlink(question: Question, form_id: Uuid) -> Self {
        TextAnswerable {
            question,
            form_id,
            max_len: 100,
            require_url: true,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    /// Wire JSON (a bare string) → DTO, applying the length cap and, for
    /// hyperlinks, the http(s)-with-host rule.
    pub fn decode_request(&self, raw: &[u8]) -> Result<TextAnswer, AppError> {
        let value: String = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("expected a JSON string: {}", e),
        })?;
        self.check(&value)?;
        Ok(TextAnswer { value })
    }

    /// Storage JSON → DTO. Accepts the stored object or a bare string;
    /// historical values are trusted and not re-validated.
    pub fn decode_storage(&self, raw: &[u8]) -> Result<TextAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredText>(raw) {
            return Ok(TextAnswer {
                value: stored.value,
            });
        }
        let value: String = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("corrupt stored text answer: {}", e),
        })?;
        Ok(TextAnswer { value })
    }

    pub fn encode_request(&self, answer: &TextAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&answer.value).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage(&self, answer: &TextAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredText {
            value: answer.value.clone(),
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage(raw)?;
        Ok(super::truncate_display(&answer.value))
    }

    /// The canonical string for pattern matching is the raw value, never the
    /// truncated display form.
    pub fn canonical(&self, raw: &[u8]) -> Result<String, AppError> {
        Ok(self.decode_storage(raw)?.value)
    }

    fn check(&self, value: &str) -> Result<(), AppError> {
        if self.question.required && value.trim().is_empty() {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: "an answer is required".to_string(),
            });
        }
        let length = value.chars().count();
        if length > self.max_len {
            return Err(AppError::InvalidAnswerLength {
                question_id: self.question.id,
                length,
                max: self.max_len,
            });
        }
        if self.require_url && !value.is_empty() {
            let parsed = Url::parse(value).map_err(|_| AppError::InvalidHyperlinkFormat {
                question_id: self.question.id,
                value: value.to_string(),
            })?;
            let scheme_ok = parsed.scheme() == "http" || parsed.scheme() == "https";
            let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
            if !scheme_ok || !has_host {
                return Err(AppError::InvalidHyperlinkFormat {
                    question_id: self.question.id,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}
