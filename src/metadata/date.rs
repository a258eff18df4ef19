// src/metadata/date.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Metadata of date questions.
///
/// A question may ask for only a subset of date precision; the `has_*` flags
/// say which components the answer keeps. The optional bounds apply to the
/// parsed date before precision trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateMetadata {
    pub has_year: bool,
    pub has_month: bool,
    pub has_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
}

impl DateMetadata {
    pub fn check(&self) -> Result<(), String> {
        if !self.has_year && !self.has_month && !self.has_day {
            return Err("no date component is enabled".to_string());
        }
        if let (Some(min), Some(max)) = (self.min_date, self.max_date) {
            if min > max {
                return Err(format!("minDate {} is after maxDate {}", min, max));
            }
        }
        Ok(())
    }
}

/// Validates an editor payload and produces canonical date metadata.
pub fn generate(payload: &Value) -> Result<DateMetadata, AppError> {
    let metadata: DateMetadata = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
    metadata.check().map_err(AppError::MetadataValidate)?;
    Ok(metadata)
}
