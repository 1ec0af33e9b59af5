use resource_api_sdk::ResourceId;
use serde::{Deserialize, Serialize};

/// `{"success": {...}}` or `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Success(SuccessBody),
    Errors(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
}

impl Envelope {
    #[must_use]
    pub fn success(message: impl Into<String>, id: Option<ResourceId>) -> Self {
        Self::Success(SuccessBody {
            message: message.into(),
            id,
        })
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Errors(vec![message.into()])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
