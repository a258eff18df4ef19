// src/answerable/mod.rs

pub mod choice;
pub mod date;
pub mod oauth;
pub mod scale;
pub mod text;
pub mod upload_file;

use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::{self, IconSet};
use crate::models::answer::Answer;
use crate::models::question::{Question, QuestionType};

pub use choice::ChoiceAnswerable;
pub use date::DateAnswerable;
pub use oauth::OAuthConnectAnswerable;
pub use scale::ScaleAnswerable;
pub use text::TextAnswerable;
pub use upload_file::UploadFileAnswerable;

/// The per-question-type codec and validation engine, one arm per type tag.
///
/// A closed sum type rather than a trait object: adding an operation forces
/// every arm to be handled, and an unknown type can never silently fall back
/// to a text variant. Instances are built on demand per request and never
/// persisted; all operations are pure functions over byte slices.
#[derive(Debug, Clone)]
pub enum Answerable {
    ShortText(TextAnswerable),
    LongText(TextAnswerable),
    Hyperlink(TextAnswerable),
    Date(DateAnswerable),
    SingleChoice(ChoiceAnswerable),
    Dropdown(ChoiceAnswerable),
    MultipleChoice(ChoiceAnswerable),
    DetailedMultipleChoice(ChoiceAnswerable),
    Ranking(ChoiceAnswerable),
    LinearScale(ScaleAnswerable),
    Rating(ScaleAnswerable),
    UploadFile(UploadFileAnswerable),
    OAuthConnect(OAuthConnectAnswerable),
}

impl Answerable {
    /// Factory: builds the variant matching the question's type tag.
    ///
    /// Each arm independently parses and invariant-checks its metadata;
    /// malformed or missing metadata is `MetadataBroken` (data corruption,
    /// not user error). The rating-icon whitelist is injected so tests can
    /// substitute their own.
    pub fn for_question(
        question: Question,
        form_id: Uuid,
        icons: &IconSet,
    ) -> Result<Answerable, AppError> {
        match question.question_type {
            QuestionType::ShortText => Ok(Answerable::ShortText(TextAnswerable::short(
                question, form_id,
            ))),
            QuestionType::LongText => {
                Ok(Answerable::LongText(TextAnswerable::long(question, form_id)))
            }
            QuestionType::Hyperlink => Ok(Answerable::Hyperlink(TextAnswerable::hyperlink(
                question, form_id,
            ))),
            QuestionType::Date => {
                let meta = metadata::load_date(&question)?;
                Ok(Answerable::Date(DateAnswerable::new(question, form_id, meta)))
            }
            QuestionType::SingleChoice => {
                let meta = metadata::load_choice(&question)?;
                Ok(Answerable::SingleChoice(ChoiceAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::Dropdown => {
                let meta = metadata::load_choice(&question)?;
                Ok(Answerable::Dropdown(ChoiceAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::MultipleChoice => {
                let meta = metadata::load_choice(&question)?;
                Ok(Answerable::MultipleChoice(ChoiceAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::DetailedMultipleChoice => {
                let meta = metadata::load_choice(&question)?;
                Ok(Answerable::DetailedMultipleChoice(ChoiceAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::Ranking => {
                let meta = metadata::load_choice(&question)?;
                Ok(Answerable::Ranking(ChoiceAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::LinearScale => {
                let meta = metadata::load_scale(&question)?;
                Ok(Answerable::LinearScale(ScaleAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::Rating => {
                let meta = metadata::load_scale(&question)?;
                match meta.icon.as_deref() {
                    Some(icon) if icons.contains(icon) => {}
                    Some(icon) => {
                        return Err(metadata::broken(
                            &question,
                            format!("unknown rating icon {:?}", icon),
                        ));
                    }
                    None => {
                        return Err(metadata::broken(&question, "rating icon is missing"));
                    }
                }
                Ok(Answerable::Rating(ScaleAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::UploadFile => {
                let meta = metadata::load_upload_file(&question)?;
                Ok(Answerable::UploadFile(UploadFileAnswerable::new(
                    question, form_id, meta,
                )))
            }
            QuestionType::OAuthConnect => {
                let meta = metadata::load_oauth(&question)?;
                Ok(Answerable::OAuthConnect(OAuthConnectAnswerable::new(
                    question, form_id, meta,
                )))
            }
        }
    }

    pub fn question(&self) -> &Question {
        match self {
            Answerable::ShortText(v) | Answerable::LongText(v) | Answerable::Hyperlink(v) => {
                v.question()
            }
            Answerable::Date(v) => v.question(),
            Answerable::SingleChoice(v)
            | Answerable::Dropdown(v)
            | Answerable::MultipleChoice(v)
            | Answerable::DetailedMultipleChoice(v)
            | Answerable::Ranking(v) => v.question(),
            Answerable::LinearScale(v) | Answerable::Rating(v) => v.question(),
            Answerable::UploadFile(v) => v.question(),
            Answerable::OAuthConnect(v) => v.question(),
        }
    }

    pub fn form_id(&self) -> Uuid {
        match self {
            Answerable::ShortText(v) | Answerable::LongText(v) | Answerable::Hyperlink(v) => {
                v.form_id()
            }
            Answerable::Date(v) => v.form_id(),
            Answerable::SingleChoice(v)
            | Answerable::Dropdown(v)
            | Answerable::MultipleChoice(v)
            | Answerable::DetailedMultipleChoice(v)
            | Answerable::Ranking(v) => v.form_id(),
            Answerable::LinearScale(v) | Answerable::Rating(v) => v.form_id(),
            Answerable::UploadFile(v) => v.form_id(),
            Answerable::OAuthConnect(v) => v.form_id(),
        }
    }

    /// Structural + semantic check of a wire value without keeping the DTO.
    pub fn validate(&self, raw: &[u8]) -> Result<(), AppError> {
        self.decode_request(raw).map(|_| ())
    }

    /// Wire JSON → decoded answer, validated against the question's metadata.
    pub fn decode_request(&self, raw: &[u8]) -> Result<Answer, AppError> {
        match self {
            Answerable::ShortText(v) => Ok(Answer::ShortText(v.decode_request(raw)?)),
            Answerable::LongText(v) => Ok(Answer::LongText(v.decode_request(raw)?)),
            Answerable::Hyperlink(v) => Ok(Answer::Hyperlink(v.decode_request(raw)?)),
            Answerable::Date(v) => Ok(Answer::Date(v.decode_request(raw)?)),
            Answerable::SingleChoice(v) => Ok(Answer::SingleChoice(v.decode_one(raw)?)),
            Answerable::Dropdown(v) => Ok(Answer::Dropdown(v.decode_one(raw)?)),
            Answerable::MultipleChoice(v) => Ok(Answer::MultipleChoice(v.decode_many(raw)?)),
            Answerable::DetailedMultipleChoice(v) => {
                Ok(Answer::DetailedMultipleChoice(v.decode_many(raw)?))
            }
            Answerable::Ranking(v) => Ok(Answer::Ranking(v.decode_ranked(raw)?)),
            Answerable::LinearScale(v) => Ok(Answer::LinearScale(v.decode_request(raw)?)),
            Answerable::Rating(v) => Ok(Answer::Rating(v.decode_request(raw)?)),
            Answerable::UploadFile(v) => Ok(Answer::UploadFile(v.decode_request(raw)?)),
            Answerable::OAuthConnect(v) => Ok(Answer::OAuthConnect(v.decode_request(raw)?)),
        }
    }

    /// Storage JSON → decoded answer. More permissive than the request path;
    /// storage holds already-validated historical data.
    pub fn decode_storage(&self, raw: &[u8]) -> Result<Answer, AppError> {
        match self {
            Answerable::ShortText(v) => Ok(Answer::ShortText(v.decode_storage(raw)?)),
            Answerable::LongText(v) => Ok(Answer::LongText(v.decode_storage(raw)?)),
            Answerable::Hyperlink(v) => Ok(Answer::Hyperlink(v.decode_storage(raw)?)),
            Answerable::Date(v) => Ok(Answer::Date(v.decode_storage(raw)?)),
            Answerable::SingleChoice(v) => Ok(Answer::SingleChoice(v.decode_storage_one(raw)?)),
            Answerable::Dropdown(v) => Ok(Answer::Dropdown(v.decode_storage_one(raw)?)),
            Answerable::MultipleChoice(v) => {
                Ok(Answer::MultipleChoice(v.decode_storage_many(raw)?))
            }
            Answerable::DetailedMultipleChoice(v) => {
                Ok(Answer::DetailedMultipleChoice(v.decode_storage_many(raw)?))
            }
            Answerable::Ranking(v) => Ok(Answer::Ranking(v.decode_storage_ranked(raw)?)),
            Answerable::LinearScale(v) => Ok(Answer::LinearScale(v.decode_storage(raw)?)),
            Answerable::Rating(v) => Ok(Answer::Rating(v.decode_storage(raw)?)),
            Answerable::UploadFile(v) => Ok(Answer::UploadFile(v.decode_storage(raw)?)),
            Answerable::OAuthConnect(v) => Ok(Answer::OAuthConnect(v.decode_storage(raw)?)),
        }
    }

    /// Decoded answer → wire JSON sent back to clients.
    ///
    /// The catch-all arm is the cross-type guard: a DTO built by another
    /// variant is refused with an internal error instead of being
    /// re-serialized under the wrong type.
    pub fn encode_request(&self, answer: &Answer) -> Result<Vec<u8>, AppError> {
        match (self, answer) {
            (Answerable::ShortText(v), Answer::ShortText(a)) => v.encode_request(a),
            (Answerable::LongText(v), Answer::LongText(a)) => v.encode_request(a),
            (Answerable::Hyperlink(v), Answer::Hyperlink(a)) => v.encode_request(a),
            (Answerable::Date(v), Answer::Date(a)) => v.encode_request(a),
            (Answerable::SingleChoice(v), Answer::SingleChoice(a)) => v.encode_request_one(a),
            (Answerable::Dropdown(v), Answer::Dropdown(a)) => v.encode_request_one(a),
            (Answerable::MultipleChoice(v), Answer::MultipleChoice(a)) => v.encode_request_many(a),
            (Answerable::DetailedMultipleChoice(v), Answer::DetailedMultipleChoice(a)) => {
                v.encode_request_many(a)
            }
            (Answerable::Ranking(v), Answer::Ranking(a)) => v.encode_request_ranked(a),
            (Answerable::LinearScale(v), Answer::LinearScale(a)) => v.encode_request(a),
            (Answerable::Rating(v), Answer::Rating(a)) => v.encode_request(a),
            (Answerable::UploadFile(v), Answer::UploadFile(a)) => v.encode_request(a),
            (Answerable::OAuthConnect(v), Answer::OAuthConnect(a)) => v.encode_request(a),
            _ => Err(self.type_mismatch()),
        }
    }

    /// Decoded answer → snapshot-carrying storage JSON, used on the write
    /// path as the complement of `decode_storage`.
    pub fn encode_storage(&self, answer: &Answer) -> Result<Vec<u8>, AppError> {
        match (self, answer) {
            (Answerable::ShortText(v), Answer::ShortText(a)) => v.encode_storage(a),
            (Answerable::LongText(v), Answer::LongText(a)) => v.encode_storage(a),
            (Answerable::Hyperlink(v), Answer::Hyperlink(a)) => v.encode_storage(a),
            (Answerable::Date(v), Answer::Date(a)) => v.encode_storage(a),
            (Answerable::SingleChoice(v), Answer::SingleChoice(a)) => v.encode_storage_one(a),
            (Answerable::Dropdown(v), Answer::Dropdown(a)) => v.encode_storage_one(a),
            (Answerable::MultipleChoice(v), Answer::MultipleChoice(a)) => v.encode_storage_many(a),
            (Answerable::DetailedMultipleChoice(v), Answer::DetailedMultipleChoice(a)) => {
                v.encode_storage_many(a)
            }
            (Answerable::Ranking(v), Answer::Ranking(a)) => v.encode_storage_ranked(a),
            (Answerable::LinearScale(v), Answer::LinearScale(a)) => v.encode_storage(a),
            (Answerable::Rating(v), Answer::Rating(a)) => v.encode_storage(a),
            (Answerable::UploadFile(v), Answer::UploadFile(a)) => v.encode_storage(a),
            (Answerable::OAuthConnect(v), Answer::OAuthConnect(a)) => v.encode_storage(a),
            _ => Err(self.type_mismatch()),
        }
    }

    /// Renders a stored answer to a single human-readable string for exports
    /// and summaries.
    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        match self {
            Answerable::ShortText(v) | Answerable::LongText(v) | Answerable::Hyperlink(v) => {
                v.display_value(raw)
            }
            Answerable::Date(v) => v.display_value(raw),
            Answerable::SingleChoice(v) | Answerable::Dropdown(v) => v.display_one(raw),
            Answerable::MultipleChoice(v) | Answerable::DetailedMultipleChoice(v) => {
                v.display_many(raw)
            }
            Answerable::Ranking(v) => v.display_ranked(raw),
            Answerable::LinearScale(v) | Answerable::Rating(v) => v.display_value(raw),
            Answerable::UploadFile(v) => v.display_value(raw),
            Answerable::OAuthConnect(v) => v.display_value(raw),
        }
    }

    /// Tests a stored answer's canonical string form against a regular
    /// expression, on behalf of the workflow engine.
    ///
    /// An invalid pattern is treated as a non-match, not an error — workflow
    /// conditions are external configuration and a broken one must not fail
    /// the request. Corrupt stored data does error. File and oauth answers
    /// have no sensible canonical string and always refuse the call.
    pub fn matches_pattern(&self, raw: &[u8], pattern: &str) -> Result<bool, AppError> {
        let canonical = match self {
            Answerable::ShortText(v) | Answerable::LongText(v) | Answerable::Hyperlink(v) => {
                v.canonical(raw)?
            }
            Answerable::Date(v) => v.canonical(raw)?,
            Answerable::SingleChoice(v) | Answerable::Dropdown(v) => v.display_one(raw)?,
            Answerable::MultipleChoice(v) | Answerable::DetailedMultipleChoice(v) => {
                v.display_many(raw)?
            }
            Answerable::Ranking(v) => v.display_ranked(raw)?,
            Answerable::LinearScale(v) | Answerable::Rating(v) => v.canonical(raw)?,
            Answerable::UploadFile(_) | Answerable::OAuthConnect(_) => {
                return Err(AppError::PatternMatchUnsupported {
                    question_type: self.question().question_type,
                });
            }
        };
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(_) => return Ok(false),
        };
        Ok(regex.is_match(&canonical))
    }

    fn type_mismatch(&self) -> AppError {
        AppError::AnswerTypeMismatch {
            question_id: self.question().id,
            expected: self.question().question_type,
        }
    }
}

/// Caps a display string at 100 characters with an ellipsis marker.
pub(crate) fn truncate_display(value: &str) -> String {
    const LIMIT: usize = 100;
    if value.chars().count() <= LIMIT {
        return value.to_string();
    }
    let mut out: String = value.chars().take(LIMIT).collect();
    out.push_str("...");
    out
}
