// src/answerable/date.rs

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::metadata::DateMetadata;
use crate::models::answer::DateAnswer;
use crate::models::question::Question;

/// Date questions with partial precision. The wire format is a full RFC3339
/// timestamp or a bare `YYYY-MM-DD` date; whichever parses first wins.
#[derive(Debug, Clone)]
pub struct DateAnswerable {
    question: Question,
    form_id: Uuid,
    metadata: DateMetadata,
}

/// Storage shape of a date answer. Absent components are omitted.
#[derive(Debug, Serialize, Deserialize)]
struct StoredDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day: Option<u32>,
}

impl DateAnswerable {
    pub fn new(question: Question, form_id: Uuid, metadata: DateMetadata) -> Self {
        DateAnswerable {
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

    /// Wire JSON → DTO. The min/max range check runs against the parsed date
    /// *before* precision trimming, then components the metadata does not ask
    /// for are dropped silently.
    pub fn decode_request(&self, raw: &[u8]) -> Result<DateAnswer, AppError> {
        let value: String = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("expected a JSON string: {}", e),
        })?;
        let date = self.parse_date(&value)?;

        if let Some(min) = self.metadata.min_date {
            if date < min {
                return Err(self.invalid(&value));
            }
        }
        if let Some(max) = self.metadata.max_date {
            if date > max {
                return Err(self.invalid(&value));
            }
        }

        Ok(self.trim(date))
    }

    /// Storage JSON → DTO. Accepts the component object or a date string; no
    /// range re-check on trusted data.
    pub fn decode_storage(&self, raw: &[u8]) -> Result<DateAnswer, AppError> {
        if let Ok(stored) = serde_json::from_slice::<StoredDate>(raw) {
            return Ok(DateAnswer {
                year: stored.year,
                month: stored.month,
                day: stored.day,
            });
        }
        let value: String = serde_json::from_slice(raw).map_err(|e| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: format!("corrupt stored date answer: {}", e),
        })?;
        let date = self.parse_date(&value)?;
        Ok(self.trim(date))
    }

    /// DTO → wire JSON: always a full RFC3339 UTC midnight timestamp.
    ///
    /// The year anchors the encoding and is always required; every other
    /// component flagged `has_*` must be present too, and absent month/day
    /// default to 1.
    pub fn encode_request(&self, answer: &DateAnswer) -> Result<Vec<u8>, AppError> {
        let year = answer.year.ok_or_else(|| AppError::InvalidAnswer {
            question_id: self.question.id,
            detail: "date answer is missing the year".to_string(),
        })?;
        if self.metadata.has_month && answer.month.is_none() {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: "date answer is missing the month".to_string(),
            });
        }
        if self.metadata.has_day && answer.day.is_none() {
            return Err(AppError::InvalidAnswer {
                question_id: self.question.id,
                detail: "date answer is missing the day".to_string(),
            });
        }
        let month = answer.month.unwrap_or(1);
        let day = answer.day.unwrap_or(1);

        let timestamp = Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                self.invalid(&format!("{:04}-{:02}-{:02}", year, month, day))
            })?;
        serde_json::to_vec(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn encode_storage(&self, answer: &DateAnswer) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec(&StoredDate {
            year: answer.year,
            month: answer.month,
            day: answer.day,
        })
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Renders the present components, e.g. "2024", "2024-06", "2024-06-15".
    pub fn display_value(&self, raw: &[u8]) -> Result<String, AppError> {
        let answer = self.decode_storage(raw)?;
        let mut out = String::new();
        if let Some(year) = answer.year {
            out.push_str(&format!("{:04}", year));
        }
        if let Some(month) = answer.month {
            if !out.is_empty() {
                out.push('-');
            }
            out.push_str(&format!("{:02}", month));
        }
        if let Some(day) = answer.day {
            if !out.is_empty() {
                out.push('-');
            }
            out.push_str(&format!("{:02}", day));
        }
        Ok(out)
    }

    pub fn canonical(&self, raw: &[u8]) -> Result<String, AppError> {
        self.display_value(raw)
    }

    fn parse_date(&self, value: &str) -> Result<NaiveDate, AppError> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
            return Ok(timestamp.date_naive());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| self.invalid(value))
    }

    fn trim(&self, date: NaiveDate) -> DateAnswer {
        DateAnswer {
            year: self.metadata.has_year.then(|| date.year()),
            month: self.metadata.has_month.then(|| date.month()),
            day: self.metadata.has_day.then(|| date.day()),
        }
    }

    fn invalid(&self, value: &str) -> AppError {
        AppError::InvalidDateFormat {
            question_id: self.question.id,
            value: value.to_string(),
        }
    }
}
