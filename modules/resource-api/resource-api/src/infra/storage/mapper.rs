use anyhow::Context;
use resource_api_sdk::{FieldMap, Resource, ResourceId};

use super::entity;

impl TryFrom<entity::Model> for Resource {
    type Error = anyhow::Error;

    fn try_from(row: entity::Model) -> Result<Self, Self::Error> {
        let attributes = decode_attributes(&row.attributes)
            .with_context(|| format!("corrupt attributes in resource {}", row.id))?;
        Ok(Resource::new(ResourceId::from(row.id), attributes))
    }
}

/// Serialized form of an attribute map.
///
/// # Errors
/// Fails only if a value cannot be represented as JSON.
pub fn encode_attributes(attributes: &FieldMap) -> anyhow::Result<String> {
    serde_json::to_string(attributes).context("failed to encode attributes")
}

/// # Errors
/// Fails when the stored text is not a JSON object.
pub fn decode_attributes(raw: &str) -> anyhow::Result<FieldMap> {
    Ok(serde_json::from_str(raw)?)
}
