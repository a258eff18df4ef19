// src/answerable/oauth.rs

use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::OAuthConnectMetadata;
use crate::models::answer::OAuthConnectAnswer;
use crate::models::question::Question;

/// OAuth-connect questions. Decode and encode are pass-through on the flat
/// DTO; the only business rule is that the linked account's provider matches
/// the question's configured provider.
#[derive(Debug, Clone)]
pub struct OAuthConnectAnswerable {
    question: Question,
    form_id: Uuid,
    metadata: OAuthConnectMetadata,
}

impl OAuthConnectAnswerable {
    pub fn new(question: Question, form_id: Uuid, metadata: OAuthConnectMetadata) -> Self {
        OAuthConnectAnswerable {
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

    pub fn metadata(&self) -> &OAuthConnectMetadata {
        &self.metadata
    }

    pub fn decode_request(&self, raw: &[u8]) -> Result<OAuthConnectAnswer, AppError> {
        let answer: OAuthConnectAnswer =
            serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("expected an oauth account object: {}", e),
            })?;
        if answer.provider != self.metadata.provider {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!(
                    "account provider {} does not match configured provider {}",
                    answer.provider, self.metadata.provider
                ),
            });
        }
        if answer.provider_id.trim().is_empty() {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: "provider account ID must not be empty".to_string(),
            });
        }
        Ok(answer)
    }

    pub fn decode_storage(&self, raw: &[u8]) -> Result<OAuthConnectAnswer, AppError> {
        serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("corrupt stored oauth answer: {}", e),
        })
    }

    pub fn encode_request(&self, answer: &OAuthConnectAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(answer).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage(&self, answer: &OAuthConnectAnswer) -> Result<Vec<u8>, AppError> {
        self.encode_request(answer)
    }

    /// Prefers "username(email)", falls back to username, then email.
    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage(raw)?;
        let username = answer.username.trim();
        let email = answer.email.trim();
        Ok(match (username.is_empty(), email.is_empty()) {
            (false, false) => format!("{}({})", username, email),
            (false, true) => username.to_string(),
            (true, _) => email.to_string(),
        })
    }
}
