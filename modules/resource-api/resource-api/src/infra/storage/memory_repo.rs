use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use resource_api_sdk::{
    FieldMap, ListQuery, Resource, ResourceId, ResourceModel, ResourceModelError, Section,
};
use tracing::debug;

use crate::config::FieldRule;

use super::rules;

#[derive(Default)]
struct Store {
    next_id: u64,
    items: BTreeMap<u64, FieldMap>,
}

/// Process-local resource model with numeric, monotonically increasing keys.
pub struct InMemoryResourceModel {
    section: Section,
    rules: Vec<FieldRule>,
    store: RwLock<Store>,
}

impl InMemoryResourceModel {
    #[must_use]
    pub fn new(section: Section, rules: Vec<FieldRule>) -> Self {
        Self {
            section,
            rules,
            store: RwLock::new(Store {
                next_id: 1,
                items: BTreeMap::new(),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.read().items.is_empty()
    }
}

#[async_trait]
impl ResourceModel for InMemoryResourceModel {
    async fn get_one_by_id(&self, id: &ResourceId) -> Result<Option<Resource>, ResourceModelError> {
        let Some(key) = id.as_u64() else {
            return Ok(None);
        };
        let store = self.store.read();
        Ok(store
            .items
            .get(&key)
            .map(|attrs| Resource::new(id.clone(), attrs.clone())))
    }

    async fn get(&self, query: &ListQuery) -> Result<Vec<Resource>, ResourceModelError> {
        let store = self.store.read();
        let matching = store
            .items
            .iter()
            .filter(|(_, attrs)| query.filter.matches(attrs))
            .map(|(key, attrs)| Resource::new(ResourceId::from(*key), attrs.clone()));
        Ok(query.paginate(matching))
    }

    async fn store_form(
        &self,
        data: FieldMap,
        id: Option<&ResourceId>,
    ) -> Result<ResourceId, ResourceModelError> {
        let data = rules::strip_key(data);

        let mut store = self.store.write();
        if let Some(id) = id {
            let slot = id.as_u64().and_then(|key| store.items.get_mut(&key));
            let Some(slot) = slot else {
                return Err(ResourceModelError::not_found(id.clone()));
            };
            rules::validate(&self.rules, &data)?;
            *slot = data;
            debug!(section = %self.section, %id, "record replaced");
            return Ok(id.clone());
        }

        rules::validate(&self.rules, &data)?;
        let key = store.next_id;
        store.next_id += 1;
        store.items.insert(key, data);
        debug!(section = %self.section, id = key, "record inserted");
        Ok(ResourceId::from(key))
    }

    async fn exists_id(&self, id: &ResourceId) -> Result<bool, ResourceModelError> {
        Ok(id
            .as_u64()
            .is_some_and(|key| self.store.read().items.contains_key(&key)))
    }

    async fn delete_id(&self, id: &ResourceId) -> Result<(), ResourceModelError> {
        if let Some(key) = id.as_u64() {
            self.store.write().items.remove(&key);
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> InMemoryResourceModel {
        InMemoryResourceModel::new(
            Section::new("products"),
            vec![FieldRule {
                name: "title".to_owned(),
                label: None,
                required: true,
                max_length: None,
            }],
        )
    }

    fn data(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let model = model();
        let a = model.store_form(data(json!({"title": "a"})), None).await.unwrap();
        let b = model.store_form(data(json!({"title": "b"})), None).await.unwrap();

        assert_eq!(a.as_str(), "1");
        assert_eq!(b.as_str(), "2");
        assert_eq!(model.len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let model = model();
        let a = model.store_form(data(json!({"title": "a"})), None).await.unwrap();
        model.delete_id(&a).await.unwrap();
        let b = model.store_form(data(json!({"title": "b"})), None).await.unwrap();

        assert_eq!(b.as_str(), "2");
        assert!(!model.exists_id(&a).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_attributes() {
        let model = model();
        let id = model
            .store_form(data(json!({"title": "a", "color": "red"})), None)
            .await
            .unwrap();
        model
            .store_form(data(json!({"title": "b", "id": 99})), Some(&id))
            .await
            .unwrap();

        let item = model.get_one_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.attributes, data(json!({"title": "b"})));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let model = model();
        let err = model
            .store_form(data(json!({"title": "b"})), Some(&ResourceId::from("abc")))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceModelError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_id_wins_over_invalid_data() {
        let model = model();
        let err = model
            .store_form(data(json!({"title": ""})), Some(&ResourceId::from("999")))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceModelError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_storing() {
        let model = model();
        let err = model
            .store_form(data(json!({"color": "red"})), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceModelError::Validation(ref m) if m.len() == 1));
        assert!(model.is_empty());
    }

    #[tokio::test]
    async fn test_get_filters_and_paginates() {
        let model = model();
        for (title, color) in [("a", "red"), ("b", "blue"), ("c", "red"), ("d", "red")] {
            model
                .store_form(data(json!({"title": title, "color": color})), None)
                .await
                .unwrap();
        }

        let mut query = ListQuery {
            limit: Some(2),
            offset: 1,
            ..ListQuery::default()
        };
        query.filter.insert("color", "red");
        let items = model.get(&query).await.unwrap();

        let titles: Vec<_> = items.iter().map(|r| r.attributes["title"].clone()).collect();
        assert_eq!(titles, vec![json!("c"), json!("d")]);
    }
}
