// src/store.rs

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::question::Question;

/// Persistence boundary consumed by the question service.
///
/// The real implementation lives in the database layer and must give each
/// logical create/update/delete exclusive access to the section's order set
/// (per-section transaction or advisory lock) — the reindex algorithm cannot
/// self-synchronize across requests.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Question>, AppError>;

    /// All questions of a section, ascending by `order`.
    async fn list_by_section(&self, section_id: Uuid) -> Result<Vec<Question>, AppError>;

    async fn section_exists(&self, section_id: Uuid) -> Result<bool, AppError>;

    async fn form_exists(&self, form_id: Uuid) -> Result<bool, AppError>;

    async fn insert(&self, question: Question) -> Result<(), AppError>;

    async fn update(&self, question: Question) -> Result<(), AppError>;

    /// Re-points a single question's order without touching the rest of the
    /// row.
    async fn update_order(&self, id: Uuid, order: i32) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// In-memory store used by the service tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    questions: HashMap<Uuid, Question>,
    sections: HashSet<Uuid>,
    forms: HashSet<Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_section(&self, section_id: Uuid) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.sections.insert(section_id);
        }
    }

    pub fn register_form(&self, form_id: Uuid) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.forms.insert(form_id);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Question>, AppError> {
        Ok(self.lock()?.questions.get(&id).cloned())
    }

    async fn list_by_section(&self, section_id: Uuid) -> Result<Vec<Question>, AppError> {
        let mut questions: Vec<Question> = self
            .lock()?
            .questions
            .values()
            .filter(|question| question.section_id == section_id)
            .cloned()
            .collect();
        questions.sort_by_key(|question| question.order);
        Ok(questions)
    }

    async fn section_exists(&self, section_id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock()?.sections.contains(&section_id))
    }

    async fn form_exists(&self, form_id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock()?.forms.contains(&form_id))
    }

    async fn insert(&self, question: Question) -> Result<(), AppError> {
        self.lock()?.questions.insert(question.id, question);
        Ok(())
    }

    async fn update(&self, question: Question) -> Result<(), AppError> {
        let mut inner = self.lock()?;
        if !inner.questions.contains_key(&question.id) {
            return Err(AppError::NotFound(format!("question {}", question.id)));
        }
        inner.questions.insert(question.id, question);
        Ok(())
    }

    async fn update_order(&self, id: Uuid, order: i32) -> Result<(), AppError> {
        let mut inner = self.lock()?;
        match inner.questions.get_mut(&id) {
            Some(question) => {
                question.order = order;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("question {}", id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()?.questions.remove(&id);
        Ok(())
    }
}
