// src/models/answer.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::choice::{RankedChoice, SelectedChoice};
use crate::models::question::QuestionType;

/// Decoded answer value, one arm per question type.
///
/// The arm carries the type identity: two text answers with the same payload
/// but different arms are different answers, which is what lets
/// `encode_request` reject a DTO handed to the wrong variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    ShortText(TextAnswer),
    LongText(TextAnswer),
    Hyperlink(TextAnswer),
    Date(DateAnswer),
    SingleChoice(SingleChoiceAnswer),
    Dropdown(SingleChoiceAnswer),
    MultipleChoice(MultipleChoiceAnswer),
    DetailedMultipleChoice(MultipleChoiceAnswer),
    Ranking(RankingAnswer),
    LinearScale(ScaleAnswer),
    Rating(ScaleAnswer),
    UploadFile(UploadFileAnswer),
    OAuthConnect(OAuthConnectAnswer),
}

impl Answer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::ShortText(_) => QuestionType::ShortText,
            Answer::LongText(_) => QuestionType::LongText,
            Answer::Hyperlink(_) => QuestionType::Hyperlink,
            Answer::Date(_) => QuestionType::Date,
            Answer::SingleChoice(_) => QuestionType::SingleChoice,
            Answer::Dropdown(_) => QuestionType::Dropdown,
            Answer::MultipleChoice(_) => QuestionType::MultipleChoice,
            Answer::DetailedMultipleChoice(_) => QuestionType::DetailedMultipleChoice,
            Answer::Ranking(_) => QuestionType::Ranking,
            Answer::LinearScale(_) => QuestionType::LinearScale,
            Answer::Rating(_) => QuestionType::Rating,
            Answer::UploadFile(_) => QuestionType::UploadFile,
            Answer::OAuthConnect(_) => QuestionType::OAuthConnect,
        }
    }
}

/// Short text, long text and hyperlink payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnswer {
    pub value: String,
}

/// Partial-precision date payload. Components the question does not ask for
/// stay `None` even when the submitted value carried them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAnswer {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Single choice / dropdown payload. `None` means the (optional) question was
/// answered with an empty selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleChoiceAnswer {
    pub choice: Option<SelectedChoice>,
}

/// Multiple choice payload, shared by the detailed variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceAnswer {
    pub choices: Vec<SelectedChoice>,
}

/// Ranking payload. `rank` is 1-based and contiguous; after
/// `encode_request` the array position equals the rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingAnswer {
    pub choices: Vec<RankedChoice>,
}

/// Linear scale and rating payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleAnswer {
    pub value: i64,
}

/// Reference to an uploaded file. The bytes themselves live in the external
/// file storage; this core only ever sees the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub file_id: Uuid,
    pub original_filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Upload-file payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFileAnswer {
    pub files: Vec<FileReference>,
}

/// Closed set of supported OAuth providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthProvider::Google => f.write_str("google"),
            OAuthProvider::Github => f.write_str("github"),
        }
    }
}

/// Linked third-party account payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConnectAnswer {
    pub provider: OAuthProvider,
    pub provider_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}
