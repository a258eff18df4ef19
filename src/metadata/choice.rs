// src/metadata/choice.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::choice::Choice;
use crate::models::question::QuestionType;

/// Metadata of the choice family: the ordered choice list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMetadata {
    pub choices: Vec<Choice>,
}

impl ChoiceMetadata {
    /// Looks a choice up by ID.
    pub fn find(&self, id: Uuid) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    /// Checks the stored-metadata invariants: at least one choice, non-nil
    /// unique IDs, names non-empty after trimming. A violation here means the
    /// write path let bad data through.
    pub fn check(&self) -> Result<(), String> {
        if self.choices.is_empty() {
            return Err("choice list is empty".to_string());
        }
        let mut seen = HashSet::new();
        for choice in &self.choices {
            if choice.id.is_nil() {
                return Err(format!("choice {:?} has a nil ID", choice.name));
            }
            if !seen.insert(choice.id) {
                return Err(format!("duplicate choice ID {}", choice.id));
            }
            if choice.name.trim().is_empty() {
                return Err(format!("choice {} has an empty name", choice.id));
            }
        }
        Ok(())
    }
}

/// Editor-supplied choice definition; IDs are assigned here, never by the
/// client.
#[derive(Debug, Deserialize, Validate)]
struct ChoiceInput {
    #[validate(length(min = 1, max = 200))]
    name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    description: String,
}

#[derive(Debug, Deserialize, Validate)]
struct ChoiceMetadataRequest {
    #[validate(nested)]
    choices: Vec<ChoiceInput>,
}

/// Validates an editor payload and produces canonical choice metadata.
///
/// The detailed variant additionally requires at least one choice with a
/// non-empty description; that rule lives here and only here — answers are
/// never re-checked against it.
pub fn generate(question_type: QuestionType, payload: &Value) -> Result<ChoiceMetadata, AppError> {
    let request: ChoiceMetadataRequest = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
    request
        .validate()
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;

    if request.choices.is_empty() {
        return Err(AppError::MetadataValidate(
            "at least one choice is required".to_string(),
        ));
    }
    if request
        .choices
        .iter()
        .any(|choice| choice.name.trim().is_empty())
    {
        return Err(AppError::MetadataValidate(
            "choice names must not be blank".to_string(),
        ));
    }
    if question_type == QuestionType::DetailedMultipleChoice
        && request
            .choices
            .iter()
            .all(|choice| choice.description.trim().is_empty())
    {
        return Err(AppError::MetadataValidate(
            "detailed multiple choice requires at least one described choice".to_string(),
        ));
    }

    let choices = request
        .choices
        .into_iter()
        .map(|input| Choice {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
        })
        .collect();

    Ok(ChoiceMetadata { choices })
}
