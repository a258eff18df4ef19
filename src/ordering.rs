// src/ordering.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::answerable::Answerable;
use crate::error::AppError;
use crate::metadata::{self, IconSet};
use crate::models::question::{
    CreateQuestionRequest, Question, QuestionType, UpdateQuestionRequest,
};
use crate::store::QuestionStore;

/// Question CRUD with dense 1..N ordering per section.
///
/// The order index stays dense across create/update/delete: inserts clamp the
/// requested position and shift everything at or after it, updates reindex
/// when the position changes, deletes close the gap. The store must serialize
/// concurrent operations on one section (see `QuestionStore`).
pub struct QuestionService<S: QuestionStore> {
    store: S,
    icons: IconSet,
}

impl<S: QuestionStore> QuestionService<S> {
    pub fn new(store: S, icons: IconSet) -> Self {
        QuestionService { store, icons }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a question at the requested position.
    ///
    /// The new row is inserted at the tail and then re-pointed to the clamped
    /// position via explicit order updates, which avoids rewriting the whole
    /// section.
    pub async fn create_question(
        &self,
        form_id: Uuid,
        request: CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        request
            .validate()
            .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
        let question_type = QuestionType::from_tag(&request.question_type)?;

        if !self.store.form_exists(form_id).await? {
            return Err(AppError::NotFound(format!("form {}", form_id)));
        }
        if !self.store.section_exists(request.section_id).await? {
            return Err(AppError::NotFound(format!("section {}", request.section_id)));
        }

        let metadata = self
            .resolve_metadata(question_type, request.source_id, request.metadata.as_ref())
            .await?;

        let existing = self.store.list_by_section(request.section_id).await?;
        let count = existing.len() as i32;
        let tail = count + 1;
        let requested = request.order.unwrap_or(tail).clamp(1, tail);

        let now = Utc::now();
        let mut question = Question {
            id: Uuid::new_v4(),
            section_id: request.section_id,
            question_type,
            title: request.title,
            description: request.description,
            required: request.required,
            metadata,
            source_id: request.source_id,
            order: tail,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(question.clone()).await?;

        if requested < tail {
            self.reorder(request.section_id, question.id, tail, requested)
                .await?;
            question.order = requested;
        }
        Ok(question)
    }

    /// Applies an update, reindexing the section when the position changes.
    pub async fn update_question(
        &self,
        id: Uuid,
        request: UpdateQuestionRequest,
    ) -> Result<Question, AppError> {
        request
            .validate()
            .map_err(|e| AppError::MetadataValidate(e.to_string()))?;

        let mut question = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("question {}", id)))?;

        if let Some(payload) = request.metadata.as_ref() {
            if question.source_id.is_some() {
                return Err(AppError::MetadataValidate(
                    "a question borrowing its choices cannot own metadata".to_string(),
                ));
            }
            question.metadata =
                metadata::generate(question.question_type, Some(payload), &self.icons)?;
        }
        if let Some(title) = request.title {
            question.title = title;
        }
        if let Some(description) = request.description {
            question.description = Some(description);
        }
        if let Some(required) = request.required {
            question.required = required;
        }
        question.updated_at = Utc::now();
        self.store.update(question.clone()).await?;

        if let Some(new_order) = request.order {
            let count = self
                .store
                .list_by_section(question.section_id)
                .await?
                .len() as i32;
            let target = new_order.clamp(1, count.max(1));
            if target != question.order {
                self.reorder(question.section_id, question.id, question.order, target)
                    .await?;
                question.order = target;
            }
        }
        Ok(question)
    }

    /// Deletes a question and compacts the section's order index.
    pub async fn delete_question(&self, id: Uuid) -> Result<(), AppError> {
        let question = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("question {}", id)))?;
        self.store.delete(id).await?;

        // Close the gap left behind.
        let remaining = self.store.list_by_section(question.section_id).await?;
        for other in remaining {
            if other.order > question.order {
                self.store.update_order(other.id, other.order - 1).await?;
            }
        }
        Ok(())
    }

    /// Loads a question and builds its answerable variant, following
    /// `source_id` choice reuse.
    pub async fn load_answerable(
        &self,
        question_id: Uuid,
        form_id: Uuid,
    ) -> Result<Answerable, AppError> {
        let mut question = self
            .store
            .get_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("question {}", question_id)))?;

        if let Some(source_id) = question.source_id {
            if question.metadata.is_some() {
                return Err(metadata::broken(
                    &question,
                    "a question with a source must not own metadata",
                ));
            }
            if !question.question_type.is_choice_family() {
                return Err(metadata::broken(
                    &question,
                    format!(
                        "{} questions cannot borrow another question's choices",
                        question.question_type
                    ),
                ));
            }
            let source = self
                .store
                .get_by_id(source_id)
                .await?
                .ok_or_else(|| metadata::broken(&question, "source question is missing"))?;
            question.metadata = source.metadata;
        }

        Answerable::for_question(question, form_id, &self.icons)
    }

    /// Moves one question from `from` to `to` by shifting the rows in
    /// between, then re-pointing the moved row. Both positions are 1-based.
    async fn reorder(
        &self,
        section_id: Uuid,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<(), AppError> {
        let questions = self.store.list_by_section(section_id).await?;
        for other in questions {
            if other.id == id {
                continue;
            }
            if to < from && other.order >= to && other.order < from {
                self.store.update_order(other.id, other.order + 1).await?;
            } else if to > from && other.order > from && other.order <= to {
                self.store.update_order(other.id, other.order - 1).await?;
            }
        }
        self.store.update_order(id, to).await
    }

    /// Resolves the metadata blob for a new question: either generated from
    /// the inline payload or borrowed (left empty) from a source question.
    async fn resolve_metadata(
        &self,
        question_type: QuestionType,
        source_id: Option<Uuid>,
        payload: Option<&serde_json::Value>,
    ) -> Result<Option<Vec<u8>>, AppError> {
        match source_id {
            Some(source_id) => {
                if payload.is_some() {
                    return Err(AppError::MetadataValidate(
                        "a source question and inline metadata are mutually exclusive".to_string(),
                    ));
                }
                if !question_type.is_choice_family() {
                    return Err(AppError::MetadataValidate(format!(
                        "{} questions cannot borrow another question's choices",
                        question_type
                    )));
                }
                let source = self
                    .store
                    .get_by_id(source_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("question {}", source_id)))?;
                if !source.question_type.is_choice_family() {
                    return Err(AppError::MetadataValidate(format!(
                        "source question {} has no choices to borrow",
                        source_id
                    )));
                }
                Ok(None)
            }
            None => metadata::generate(question_type, payload, &self.icons),
        }
    }
}
