// src/answerable/choice.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::ChoiceMetadata;
use crate::models::answer::{MultipleChoiceAnswer, RankingAnswer, SingleChoiceAnswer};
use crate::models::choice::{RankedChoice, SelectedChoice};
use crate::models::question::Question;

/// The choice family: single choice, dropdown, multiple choice, detailed
/// multiple choice and ranking. The wire format for all of them is an array
/// of choice-ID strings; what differs is how many IDs are allowed and whether
/// array order carries meaning.
#[derive(Debug, Clone)]
pub struct ChoiceAnswerable {
    question: Question,
    form_id: Uuid,
    metadata: ChoiceMetadata,
}

/// Storage shape of a single-choice answer.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSingle {
    choice: Option<SelectedChoice>,
}

/// Storage shape of a multiple-choice answer.
#[derive(Debug, Serialize, Deserialize)]
struct StoredMany {
    choices: Vec<SelectedChoice>,
}

/// Storage shape of a ranking answer, kept in rank order.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRanked {
    choices: Vec<RankedChoice>,
}

impl ChoiceAnswerable {
    pub fn new(question: Question, form_id: Uuid, metadata: ChoiceMetadata) -> Self {
        ChoiceAnswerable {
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

    pub fn metadata(&self) -> &ChoiceMetadata {
        &self.metadata
    }

    /// Single choice / dropdown: 0 or 1 ID, 0 only when the question is not
    /// required.
    pub fn decode_one(&self, raw: &[u8]) -> Result<SingleChoiceAnswer, AppError> {
        let ids = self.ids(raw)?;
        if ids.len() > 1 {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("single choice accepts at most one selection, got {}", ids.len()),
            });
        }
        match ids.first() {
            Some(&id) => Ok(SingleChoiceAnswer {
                choice: Some(self.snapshot(id)?),
            }),
            None => {
                if self.question.required {
                    Err(self.required())
                } else {
                    Ok(SingleChoiceAnswer { choice: None })
                }
            }
        }
    }

    /// Multiple choice (plain and detailed): 1..N distinct IDs.
    pub fn decode_many(&self, raw: &[u8]) -> Result<MultipleChoiceAnswer, AppError> {
        let ids = self.distinct_ids(raw)?;
        let choices = ids
            .into_iter()
            .map(|id| self.snapshot(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultipleChoiceAnswer { choices })
    }

    /// Ranking: array order is rank order; ranks are assigned from the array
    /// position, 1-based, never taken from the request.
    pub fn decode_ranked(&self, raw: &[u8]) -> Result<RankingAnswer, AppError> {
        let ids = self.distinct_ids(raw)?;
        let choices = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let snapshot = self.snapshot(id)?;
                Ok(RankedChoice {
                    id: snapshot.id,
                    name: snapshot.name,
                    description: snapshot.description,
                    rank: index as u32 + 1,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(RankingAnswer { choices })
    }

    pub fn decode_storage_one(&self, raw: &[u8]) -> Result<SingleChoiceAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredSingle>(raw) {
            return Ok(SingleChoiceAnswer {
                choice: stored.choice,
            });
        }
        // Legacy/compact shape: the request ID array, snapshots re-resolved
        // from the current metadata.
        let ids = self.ids(raw)?;
        match ids.first() {
            Some(&id) => Ok(SingleChoiceAnswer {
                choice: Some(self.snapshot(id)?),
            }),
            None => Ok(SingleChoiceAnswer { choice: None }),
        }
    }

    pub fn decode_storage_many(&self, raw: &[u8]) -> Result<MultipleChoiceAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredMany>(raw) {
            return Ok(MultipleChoiceAnswer {
                choices: stored.choices,
            });
        }
        let ids = self.ids(raw)?;
        let choices = ids
            .into_iter()
            .map(|id| self.snapshot(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultipleChoiceAnswer { choices })
    }

    pub fn decode_storage_ranked(&self, raw: &[u8]) -> Result<RankingAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredRanked>(raw) {
            return Ok(RankingAnswer {
                choices: stored.choices,
            });
        }
        let ids = self.ids(raw)?;
        let choices = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let snapshot = self.snapshot(id)?;
                Ok(RankedChoice {
                    id: snapshot.id,
                    name: snapshot.name,
                    description: snapshot.description,
                    rank: index as u32 + 1,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(RankingAnswer { choices })
    }

    pub fn encode_request_one(&self, answer: &SingleChoiceAnswer) -> Result<Vec<u8>, AppError> {
        let ids: Vec<String> = answer
            .choice
            .iter()
            .map(|choice| choice.id.to_string())
            .collect();
        serde_json::to_vec(&ids).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_request_many(&self, answer: &MultipleChoiceAnswer) -> Result<Vec<u8>, AppError> {
        let ids: Vec<String> = answer
            .choices
            .iter()
            .map(|choice| choice.id.to_string())
            .collect();
        serde_json::to_vec(&ids).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// The stable sort by `rank` is what makes the wire format
    /// order-canonical even when the DTO's internal order drifted.
    pub fn encode_request_ranked(&self, answer: &RankingAnswer) -> Result<Vec<u8>, AppError> {
        let mut ranked = answer.choices.clone();
        ranked.sort_by_key(|choice| choice.rank);
        let ids: Vec<String> = ranked.iter().map(|choice| choice.id.to_string()).collect();
        serde_json::to_vec(&ids).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage_one(&self, answer: &SingleChoiceAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredSingle {
            choice: answer.choice.clone(),
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage_many(&self, answer: &MultipleChoiceAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredMany {
            choices: answer.choices.clone(),
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage_ranked(&self, answer: &RankingAnswer) -> Result<Vec<u8>, AppError> {
        let mut ranked = answer.choices.clone();
        ranked.sort_by_key(|choice| choice.rank);
        serde_json::to_vec(&StoredRanked { choices: ranked })
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn display_one(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage_one(raw)?;
        Ok(answer
            .choice
            .map(|choice| choice.name)
            .unwrap_or_default())
    }

    pub fn display_many(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage_many(raw)?;
        let names: Vec<&str> = answer.choices.iter().map(|c| c.name.as_str()).collect();
        Ok(names.join(", "))
    }

    pub fn display_ranked(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage_ranked(raw)?;
        let mut ranked = answer.choices;
        ranked.sort_by_key(|choice| choice.rank);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        Ok(names.join(", "))
    }

    /// Parses the request ID array without any count rules.
    fn ids(&self, raw: &[u8]) -> Result<Vec<Uuid>, AppError> {
        let raw_ids: Vec<String> =
            serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: format!("expected an array of choice IDs: {}", e),
            })?;
        raw_ids
            .into_iter()
            .map(|raw_id| {
                Uuid::parse_str(&raw_id).map_err(|_| AppError::InvalidChoiceId {
                    question_id: self.question.id,
                    choice_id: raw_id,
                })
            })
            .collect()
    }

    /// ID array with the multi-select rules: at least one, no duplicates.
    fn distinct_ids(&self, raw: &[u8]) -> Result<Vec<Uuid>, AppError> {
        let ids = self.ids(raw)?;
        if ids.is_empty() {
            return Err(if self.question.required {
                self.required()
            } else {
                AppError::InvalidAnswer {
                    question_id: self.question.id,
                    detail: "at least one choice must be selected".to_string(),
                }
            });
        }
        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(*id) {
                return Err(AppError::InvalidAnswer {
                    question_id: self.question.id,
                    detail: format!("choice {} is selected twice", id),
                });
            }
        }
        Ok(ids)
    }

    /// Copies the live choice into an immutable snapshot.
    fn snapshot(&self, id: Uuid) -> Result<SelectedChoice, AppError> {
        self.metadata
            .find(id)
            .map(SelectedChoice::of)
            .ok_or_else(|| AppError::InvalidChoiceId {
                question_id: self.question.id,
                choice_id: id.to_string(),
            })
    }

    fn required(&self) -> AppError {
        AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: "an answer is required".to_string(),
        }
    }
}
