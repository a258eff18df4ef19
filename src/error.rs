// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use uuid::Uuid;

use crate::models::question::QuestionType;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Three broad kinds live here:
/// * configuration corruption (`MetadataBroken`) — stored metadata that should
///   never have been written; an internal error, never the caller's fault,
/// * configuration rejection (`MetadataValidate`, `UnsupportedQuestionType`) —
///   a bad question definition was about to be written,
/// * answer rejection (`InvalidChoiceId`, `InvalidScaleValue`, ...) — a
///   submitted value failed a business rule.
#[derive(Debug)]
pub enum AppError {
    /// Stored question metadata failed to parse or violates an invariant.
    /// Carries the raw bytes for diagnosis; signals data corruption.
    MetadataBroken {
        question_id: Uuid,
        raw: String,
        detail: String,
    },

    /// A metadata-generation request is malformed (editor error).
    MetadataValidate(String),

    /// The question carries a type tag this build does not know.
    UnsupportedQuestionType(String),

    /// A submitted choice ID does not belong to the question's choice set.
    InvalidChoiceId {
        question_id: Uuid,
        choice_id: String,
    },

    /// A scale/rating value outside the configured inclusive range,
    /// or not an integer at all.
    InvalidScaleValue {
        question_id: Uuid,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A date answer that does not parse or falls outside the allowed range.
    InvalidDateFormat { question_id: Uuid, value: String },

    /// A text answer exceeding the type's length cap.
    InvalidAnswerLength {
        question_id: Uuid,
        length: usize,
        max: usize,
    },

    /// A hyperlink answer without an http(s) scheme or a host.
    InvalidHyperlinkFormat { question_id: Uuid, value: String },

    /// Any other answer rejection (wrong JSON shape, empty when required,
    /// too many selections, ...).
    InvalidAnswer { question_id: Uuid, detail: String },

    /// Pattern matching is not a sensible operation for this question type.
    PatternMatchUnsupported { question_type: QuestionType },

    /// A DTO from another variant was handed to `encode_request` /
    /// `encode_storage`. Programmer error, never a user error.
    AnswerTypeMismatch {
        question_id: Uuid,
        expected: QuestionType,
    },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MetadataBroken {
                question_id,
                detail,
                ..
            } => write!(
                f,
                "metadata of question {} is broken: {}",
                question_id, detail
            ),
            AppError::MetadataValidate(msg) => write!(f, "invalid metadata: {}", msg),
            AppError::UnsupportedQuestionType(tag) => {
                write!(f, "unsupported question type: {}", tag)
            }
            AppError::InvalidChoiceId {
                question_id,
                choice_id,
            } => write!(
                f,
                "choice {} does not belong to question {}",
                choice_id, question_id
            ),
            AppError::InvalidScaleValue {
                question_id,
                value,
                min,
                max,
            } => write!(
                f,
                "value {} for question {} is outside [{}, {}]",
                value, question_id, min, max
            ),
            AppError::InvalidDateFormat { question_id, value } => write!(
                f,
                "date answer {:?} for question {} is invalid or out of range",
                value, question_id
            ),
            AppError::InvalidAnswerLength {
                question_id,
                length,
                max,
            } => write!(
                f,
                "answer for question {} is {} characters long, limit is {}",
                question_id, length, max
            ),
            AppError::InvalidHyperlinkFormat { question_id, value } => write!(
                f,
                "answer {:?} for question {} is not a valid http(s) URL",
                value, question_id
            ),
            AppError::InvalidAnswer {
                question_id,
                detail,
            } => write!(f, "invalid answer for question {}: {}", question_id, detail),
            AppError::PatternMatchUnsupported { question_type } => write!(
                f,
                "pattern matching is not supported for {} questions",
                question_type
            ),
            AppError::AnswerTypeMismatch {
                question_id,
                expected,
            } => write!(
                f,
                "answer DTO does not match question {} of type {}",
                question_id, expected
            ),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MetadataBroken {
                question_id, raw, ..
            } => {
                tracing::error!(%question_id, raw = %raw, "broken question metadata: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::AnswerTypeMismatch { .. } | AppError::Internal(_) => {
                tracing::error!("Internal Server Error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            _ => (StatusCode::BAD_REQUEST, self.to_string()),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
