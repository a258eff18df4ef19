// src/models/question.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Closed set of question type tags.
///
/// Every operation that dispatches on the type matches this enum exhaustively;
/// an unknown tag string never reaches the variants, it fails at
/// [`QuestionType::from_tag`] with `UnsupportedQuestionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    ShortText,
    LongText,
    Hyperlink,
    Date,
    SingleChoice,
    Dropdown,
    MultipleChoice,
    DetailedMultipleChoice,
    Ranking,
    LinearScale,
    Rating,
    UploadFile,
    #[serde(rename = "oauthConnect")]
    OAuthConnect,
}

impl QuestionType {
    /// Parses a wire tag. Unknown tags fail loudly instead of defaulting.
    pub fn from_tag(tag: &str) -> Result<Self, AppError> {
        match tag {
            "shortText" => Ok(QuestionType::ShortText),
            "longText" => Ok(QuestionType::LongText),
            "hyperlink" => Ok(QuestionType::Hyperlink),
            "date" => Ok(QuestionType::Date),
            "singleChoice" => Ok(QuestionType::SingleChoice),
            "dropdown" => Ok(QuestionType::Dropdown),
            "multipleChoice" => Ok(QuestionType::MultipleChoice),
            "detailedMultipleChoice" => Ok(QuestionType::DetailedMultipleChoice),
            "ranking" => Ok(QuestionType::Ranking),
            "linearScale" => Ok(QuestionType::LinearScale),
            "rating" => Ok(QuestionType::Rating),
            "uploadFile" => Ok(QuestionType::UploadFile),
            "oauthConnect" => Ok(QuestionType::OAuthConnect),
            other => Err(AppError::UnsupportedQuestionType(other.to_string())),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            QuestionType::ShortText => "shortText",
            QuestionType::LongText => "longText",
            QuestionType::Hyperlink => "hyperlink",
            QuestionType::Date => "date",
            QuestionType::SingleChoice => "singleChoice",
            QuestionType::Dropdown => "dropdown",
            QuestionType::MultipleChoice => "multipleChoice",
            QuestionType::DetailedMultipleChoice => "detailedMultipleChoice",
            QuestionType::Ranking => "ranking",
            QuestionType::LinearScale => "linearScale",
            QuestionType::Rating => "rating",
            QuestionType::UploadFile => "uploadFile",
            QuestionType::OAuthConnect => "oauthConnect",
        }
    }

    /// True for the types whose metadata is a choice list. Only these may
    /// reuse another question's choices via `source_id`.
    pub fn is_choice_family(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice
                | QuestionType::Dropdown
                | QuestionType::MultipleChoice
                | QuestionType::DetailedMultipleChoice
                | QuestionType::Ranking
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Represents the 'questions' table in the database.
///
/// `metadata` is the type-tagged JSON envelope as raw bytes; it is parsed on
/// demand when the matching answerable variant is built. If `source_id` is
/// set, `metadata` must be empty and the type must be in the choice family —
/// the question borrows the source question's choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,

    pub section_id: Uuid,

    /// Mapped from the database column 'type' since `type` is a reserved
    /// keyword in Rust.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub title: String,

    pub description: Option<String>,

    pub required: bool,

    /// Type-tagged JSON configuration blob, absent for the text family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<u8>>,

    /// Another question whose choice set this question reuses.
    pub source_id: Option<Uuid>,

    /// 1-based position inside the section, dense across the section.
    pub order: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub section_id: Uuid,

    /// Wire type tag, e.g. "singleChoice".
    #[serde(rename = "type")]
    pub question_type: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub source_id: Option<Uuid>,

    /// Requested position; clamped into `[1, count + 1]` on insert.
    pub order: Option<i32>,

    /// Editor-supplied metadata envelope, validated and canonicalized before
    /// it is persisted.
    pub metadata: Option<serde_json::Value>,
}

/// DTO for updating an existing question. The type tag is immutable after
/// creation; changing it would orphan every stored answer.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub required: Option<bool>,

    /// New position; clamped into `[1, count]` and reindexed when it differs
    /// from the stored order.
    pub order: Option<i32>,

    pub metadata: Option<serde_json::Value>,
}
