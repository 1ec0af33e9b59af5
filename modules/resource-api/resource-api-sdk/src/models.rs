use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Arbitrary field/value pairs of a resource. The controller never looks inside.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Panel used in permission checks unless configured otherwise.
pub const DEFAULT_PANEL: &str = "admin";

/// Identifier of a stored resource.
///
/// Keys are kept in their textual form. Keys in canonical decimal form
/// serialize as JSON numbers; anything else, `"007"` included, stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form of the key, if it has one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_u64().filter(|n| n.to_string() == self.0) {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self::new(s),
        })
    }
}

/// A stored resource: its key plus whatever attributes the model keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(flatten)]
    pub attributes: FieldMap,
}

impl Resource {
    #[must_use]
    pub fn new(id: ResourceId, mut attributes: FieldMap) -> Self {
        attributes.remove("id");
        Self { id, attributes }
    }
}

/// Textual form of an attribute value, used for filter matching.
#[must_use]
pub fn attribute_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Exact-match filter criteria derived from query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria(BTreeMap<String, String>);

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, expected: impl Into<String>) {
        self.0.insert(field.into(), expected.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every criterion must match; a missing attribute matches only an empty expectation.
    #[must_use]
    pub fn matches(&self, attributes: &FieldMap) -> bool {
        self.0.iter().all(|(field, expected)| {
            attributes
                .get(field)
                .map_or(expected.is_empty(), |v| attribute_text(v) == *expected)
        })
    }
}

impl FromIterator<(String, String)> for FilterCriteria {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parameters of a collection read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: FilterCriteria,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ListQuery {
    /// Apply `offset`/`limit` to an already filtered, ordered sequence.
    pub fn paginate<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// HTTP verbs the resource controller serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiVerb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }

    #[must_use]
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for ApiVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource-type name used as the unit of access control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(String);

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `products_model` -> `products`. Names without the suffix are kept as is.
    #[must_use]
    pub fn from_model_name(model_name: &str) -> Self {
        let name = model_name.strip_suffix("_model").unwrap_or(model_name);
        Self(name.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interface language code, always lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-derived inputs for language resolution, in priority order.
#[derive(Debug, Clone, Default)]
pub struct LanguageHints {
    pub path_segment: Option<String>,
    pub query: Option<String>,
    pub accept_language: Option<String>,
}

/// Email/password pair supplied by a client.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_owned(),
            password: SecretString::from(password.into()),
        }
    }

    /// Both parts present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.expose_secret().is_empty()
    }
}

/// Authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub groups: Vec<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_strips_model_suffix() {
        assert_eq!(Section::from_model_name("products_model").as_str(), "products");
        assert_eq!(Section::from_model_name("orders").as_str(), "orders");
    }

    #[test]
    fn numeric_id_serializes_as_number() {
        let id = ResourceId::from(42_u64);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(42));

        let id = ResourceId::from("sku-7");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("sku-7"));
    }

    #[test]
    fn leading_zero_id_keeps_its_text() {
        let id = ResourceId::from("007");
        let wire = serde_json::to_value(&id).unwrap();
        assert_eq!(wire, json!("007"));

        let back: ResourceId = serde_json::from_value(wire).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn id_deserializes_from_number_or_text() {
        let id: ResourceId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id.as_str(), "7");
        let id: ResourceId = serde_json::from_value(json!(" abc ")).unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn resource_flattens_attributes() {
        let mut attrs = FieldMap::new();
        attrs.insert("name".to_owned(), json!("Kettle"));
        attrs.insert("id".to_owned(), json!(99));

        let resource = Resource::new(ResourceId::from(3_u64), attrs);
        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(value, json!({"id": 3, "name": "Kettle"}));
    }

    #[test]
    fn filter_matches_textual_values() {
        let mut attrs = FieldMap::new();
        attrs.insert("price".to_owned(), json!(10));
        attrs.insert("color".to_owned(), json!("red"));

        let filter: FilterCriteria = [
            ("price".to_owned(), "10".to_owned()),
            ("color".to_owned(), "red".to_owned()),
        ]
        .into_iter()
        .collect();
        assert!(filter.matches(&attrs));

        let mut other = FilterCriteria::new();
        other.insert("color", "blue");
        assert!(!other.matches(&attrs));

        let mut missing = FilterCriteria::new();
        missing.insert("size", "");
        assert!(missing.matches(&attrs));
    }

    #[test]
    fn paginate_applies_offset_then_limit() {
        let query = ListQuery {
            limit: Some(2),
            offset: 1,
            ..ListQuery::default()
        };
        assert_eq!(query.paginate(1..=5), vec![2, 3]);
        assert_eq!(ListQuery::default().paginate(1..=3), vec![1, 2, 3]);
    }

    #[test]
    fn credentials_completeness() {
        assert!(Credentials::new("a@b.c", "pw").is_complete());
        assert!(!Credentials::new("  ", "pw").is_complete());
        assert!(!Credentials::new("a@b.c", "").is_complete());
    }

    #[test]
    fn verbs_render_lowercase() {
        assert_eq!(ApiVerb::Delete.to_string(), "delete");
        assert!(ApiVerb::Put.is_mutating());
        assert!(!ApiVerb::Get.is_mutating());
    }
}
