// src/metadata/scale.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::question::QuestionType;

/// Rating icons shipped with the build.
const BUNDLED_ICONS: &str = include_str!("../../resources/rating_icons.txt");

/// Immutable rating-icon whitelist.
///
/// Built once at startup and passed into the constructors that need it, so
/// tests can substitute a smaller set.
#[derive(Debug, Clone)]
pub struct IconSet {
    icons: BTreeSet<String>,
}

impl IconSet {
    /// Loads the whitelist bundled with the binary.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_ICONS.lines().map(str::trim).filter(|l| !l.is_empty()))
    }

    pub fn new<I, S>(icons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IconSet {
            icons: icons.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, icon: &str) -> bool {
        self.icons.contains(icon)
    }
}

/// Metadata of linear scale and rating questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleMetadata {
    pub min_val: i64,
    pub max_val: i64,
    #[serde(default)]
    pub min_value_label: String,
    #[serde(default)]
    pub max_value_label: String,
    /// Rating only; checked against the icon whitelist when the variant is
    /// constructed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ScaleMetadata {
    /// Stored-metadata invariant: the range must be non-empty.
    pub fn check(&self) -> Result<(), String> {
        if self.min_val >= self.max_val {
            return Err(format!(
                "minVal {} is not below maxVal {}",
                self.min_val, self.max_val
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScaleMetadataRequest {
    min_val: i64,
    max_val: i64,
    #[serde(default)]
    min_value_label: String,
    #[serde(default)]
    max_value_label: String,
    icon: Option<String>,
}

/// Validates an editor payload and produces canonical scale metadata.
///
/// Both bounds are clamped into `[1, 10]`. A rating question must name an
/// icon from the whitelist; a linear scale must not carry one.
pub fn generate(
    question_type: QuestionType,
    payload: &Value,
    icons: &IconSet,
) -> Result<ScaleMetadata, AppError> {
    let request: ScaleMetadataRequest = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;

    let min_val = request.min_val.clamp(1, 10);
    let max_val = request.max_val.clamp(1, 10);
    if min_val >= max_val {
        return Err(AppError::MetadataValidate(format!(
            "minVal {} must be below maxVal {}",
            min_val, max_val
        )));
    }

    let icon = match question_type {
        QuestionType::Rating => {
            let icon = request.icon.ok_or_else(|| {
                AppError::MetadataValidate("rating requires an icon".to_string())
            })?;
            if !icons.contains(&icon) {
                return Err(AppError::MetadataValidate(format!(
                    "unknown rating icon {:?}",
                    icon
                )));
            }
            Some(icon)
        }
        _ => {
            if request.icon.is_some() {
                return Err(AppError::MetadataValidate(
                    "only rating questions carry an icon".to_string(),
                ));
            }
            None
        }
    };

    Ok(ScaleMetadata {
        min_val,
        max_val,
        min_value_label: request.min_value_label.trim().to_string(),
        max_value_label: request.max_value_label.trim().to_string(),
        icon,
    })
}
