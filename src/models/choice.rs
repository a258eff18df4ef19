// src/models/choice.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One configured choice of a choice-family question.
///
/// Invariants (checked when metadata is loaded): non-nil `id`, `name`
/// non-empty after trimming, `id` unique within the question's choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Snapshot of a choice taken at answer time.
///
/// Copied from the live choice when the answer is decoded and never re-read
/// afterwards, so later edits to the question do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedChoice {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl SelectedChoice {
    pub fn of(choice: &Choice) -> Self {
        SelectedChoice {
            id: choice.id,
            name: choice.name.clone(),
            description: choice.description.clone(),
        }
    }
}

/// A choice snapshot plus its 1-based rank inside a ranking answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedChoice {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rank: u32,
}
