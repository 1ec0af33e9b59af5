use resource_api_sdk::{FieldMap, ResourceModelError, attribute_text};

use crate::config::FieldRule;

/// Check `data` against `rules`, collecting every violation in rule order.
///
/// # Errors
/// `ResourceModelError::Validation` with one message per violated rule.
pub fn validate(rules: &[FieldRule], data: &FieldMap) -> Result<(), ResourceModelError> {
    let mut messages = Vec::new();

    for rule in rules {
        let value = data.get(&rule.name).map_or_else(String::new, attribute_text);
        let value = value.trim();

        if rule.required && value.is_empty() {
            messages.push(format!("The {} field is required.", rule.label()));
            continue;
        }

        if let Some(max) = rule.max_length
            && value.chars().count() > max
        {
            messages.push(format!(
                "The {} field can not exceed {max} characters in length.",
                rule.label()
            ));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ResourceModelError::validation(messages))
    }
}

/// Drop the key field from submitted data; keys are owned by the store.
#[must_use]
pub fn strip_key(mut data: FieldMap) -> FieldMap {
    data.remove("id");
    data
}
