// src/metadata/oauth.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::answer::OAuthProvider;

/// Metadata of oauth-connect questions: the provider accounts may be linked
/// against. An unknown or blank provider string fails the envelope parse,
/// which the loader reports as metadata corruption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConnectMetadata {
    pub provider: OAuthProvider,
}

#[derive(Debug, Deserialize)]
struct OAuthMetadataRequest {
    provider: String,
}

/// Validates an editor payload and produces canonical oauth metadata.
pub fn generate(payload: &Value) -> Result<OAuthConnectMetadata, AppError> {
    let request: OAuthMetadataRequest = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::MetadataValidate(e.to_string()))?;
    let provider = match request.provider.as_str() {
        "google" => OAuthProvider::Google,
        "github" => OAuthProvider::Github,
        other => {
            return Err(AppError::MetadataValidate(format!(
                "unsupported oauth provider {:?}",
                other
            )));
        }
    };
    Ok(OAuthConnectMetadata { provider })
}
