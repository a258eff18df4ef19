// src/lib.rs

pub mod answerable;
pub mod error;
pub mod metadata;
pub mod models;
pub mod ordering;
pub mod store;

// Re-export specific items for convenience if needed
pub use answerable::Answerable;
pub use error::AppError;
pub use metadata::IconSet;
pub use models::answer::Answer;
pub use models::question::{Question, QuestionType};
pub use ordering::QuestionService;
pub use store::{MemoryStore, QuestionStore};
