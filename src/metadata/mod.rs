// src/metadata/mod.rs

pub mod choice;
pub mod date;
pub mod oauth;
pub mod scale;
pub mod upload_file;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::question::{Question, QuestionType};

pub use choice::ChoiceMetadata;
pub use date::DateMetadata;
pub use oauth::OAuthConnectMetadata;
pub use scale::{IconSet, ScaleMetadata};
pub use upload_file::UploadFileMetadata;

/// Type-tagged metadata envelope.
///
/// Exactly one key is ever populated, and it must match the question's type
/// family. `deny_unknown_fields` turns a stray key into a parse error, which
/// the loaders surface as `MetadataBroken` rather than defaulting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<ChoiceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_file: Option<UploadFileMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_connect: Option<OAuthConnectMetadata>,
}

/// Builds the `MetadataBroken` error for a question, capturing the raw bytes.
pub(crate) fn broken(question: &Question, detail: impl Into<String>) -> AppError {
    let raw = question
        .metadata
        .as_deref()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default();
    AppError::MetadataBroken {
        question_id: question.id,
        raw,
        detail: detail.into(),
    }
}

/// Parses the question's metadata bytes into the envelope.
pub fn load_envelope(question: &Question) -> Result<MetadataEnvelope, AppError> {
    let bytes = question
        .metadata
        .as_deref()
        .ok_or_else(|| broken(question, "metadata is missing"))?;
    serde_json::from_slice(bytes).map_err(|e| broken(question, e.to_string()))
}

/// Loads and invariant-checks the choice metadata of a question.
pub fn load_choice(question: &Question) -> Result<ChoiceMetadata, AppError> {
    let meta = load_envelope(question)?
        .choice
        .ok_or_else(|| broken(question, "missing \"choice\" key"))?;
    meta.check().map_err(|detail| broken(question, detail))?;
    Ok(meta)
}

/// Loads and invariant-checks the scale metadata of a question.
pub fn load_scale(question: &Question) -> Result<ScaleMetadata, AppError> {
    let meta = load_envelope(question)?
        .scale
        .ok_or_else(|| broken(question, "missing \"scale\" key"))?;
    meta.check().map_err(|detail| broken(question, detail))?;
    Ok(meta)
}

/// Loads and invariant-checks the date metadata of a question.
pub fn load_date(question: &Question) -> Result<DateMetadata, AppError> {
    let meta = load_envelope(question)?
        .date
        .ok_or_else(|| broken(question, "missing \"date\" key"))?;
    meta.check().map_err(|detail| broken(question, detail))?;
    Ok(meta)
}

/// Loads and invariant-checks the upload-file metadata of a question.
pub fn load_upload_file(question: &Question) -> Result<UploadFileMetadata, AppError> {
    let meta = load_envelope(question)?
        .upload_file
        .ok_or_else(|| broken(question, "missing \"uploadFile\" key"))?;
    meta.check().map_err(|detail| broken(question, detail))?;
    Ok(meta)
}

/// Loads the oauth-connect metadata of a question. An unknown or blank
/// provider already fails the envelope parse.
pub fn load_oauth(question: &Question) -> Result<OAuthConnectMetadata, AppError> {
    load_envelope(question)?
        .oauth_connect
        .ok_or_else(|| broken(question, "missing \"oauthConnect\" key"))
}

/// Validates an editor-supplied metadata payload and canonicalizes it into
/// the envelope bytes that get persisted on the question row.
///
/// The text family takes no metadata; every other family requires the
/// matching envelope key. Rejections are `MetadataValidate` — the bad
/// configuration is refused before it is ever written.
pub fn generate(
    question_type: QuestionType,
    payload: Option<&Value>,
    icons: &IconSet,
) -> Result<Option<Vec<u8>>, AppError> {
    let envelope = match question_type {
        QuestionType::ShortText | QuestionType::LongText | QuestionType::Hyperlink => {
            if payload.is_some() {
                return Err(AppError::MetadataValidate(format!(
                    "{} questions take no metadata",
                    question_type
                )));
            }
            return Ok(None);
        }
        QuestionType::SingleChoice
        | QuestionType::Dropdown
        | QuestionType::MultipleChoice
        | QuestionType::DetailedMultipleChoice
        | QuestionType::Ranking => MetadataEnvelope {
            choice: Some(choice::generate(question_type, family_payload(payload, "choice")?)?),
            ..Default::default()
        },
        QuestionType::LinearScale | QuestionType::Rating => MetadataEnvelope {
            scale: Some(scale::generate(
                question_type,
                family_payload(payload, "scale")?,
                icons,
            )?),
            ..Default::default()
        },
        QuestionType::Date => MetadataEnvelope {
            date: Some(date::generate(family_payload(payload, "date")?)?),
            ..Default::default()
        },
        QuestionType::UploadFile => MetadataEnvelope {
            upload_file: Some(upload_file::generate(family_payload(payload, "uploadFile")?)?),
            ..Default::default()
        },
        QuestionType::OAuthConnect => MetadataEnvelope {
            oauth_connect: Some(oauth::generate(family_payload(payload, "oauthConnect")?)?),
            ..Default::default()
        },
    };

    let bytes = serde_json::to_vec(&envelope)
        .map_err(|e| AppError::Internal(format!("failed to serialize metadata: {}", e)))?;
    Ok(Some(bytes))
}

/// Extracts the family key from the editor's envelope payload.
fn family_payload<'a>(payload: Option<&'a Value>, key: &str) -> Result<&'a Value, AppError> {
    payload
        .and_then(|value| value.get(key))
        .ok_or_else(|| AppError::MetadataValidate(format!("missing \"{}\" metadata", key)))
}
