use anyhow::Context;
use async_trait::async_trait;
use resource_api_sdk::{
    FieldMap, ListQuery, Resource, ResourceId, ResourceModel, ResourceModelError, Section,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::FieldRule;

use super::entity::{self, Entity as ResourceEntity};
use super::mapper::encode_attributes;
use super::migrations::Migrator;
use super::rules;

/// Open the database behind `dsn` and bring its schema up to date.
///
/// # Errors
/// Connection or migration failures.
pub async fn connect(dsn: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    options.sqlx_logging(false);
    // Every pooled connection to an in-memory SQLite database sees its own empty database.
    if dsn.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to {dsn}"))?;

    info!("Running resource storage migrations");
    Migrator::up(&db, None)
        .await
        .context("resource storage migration failed")?;

    Ok(db)
}

/// Resource model over a shared `resources` table, scoped to one section.
pub struct SeaOrmResourceModel {
    db: DatabaseConnection,
    section: Section,
    rules: Vec<FieldRule>,
}

impl SeaOrmResourceModel {
    #[must_use]
    pub fn new(db: DatabaseConnection, section: Section, rules: Vec<FieldRule>) -> Self {
        Self { db, section, rules }
    }

    async fn find_row(&self, id: &ResourceId) -> anyhow::Result<Option<entity::Model>> {
        let Some(key) = row_key(id) else {
            return Ok(None);
        };

        ResourceEntity::find_by_id(key)
            .filter(entity::Column::Section.eq(self.section.as_str()))
            .one(&self.db)
            .await
            .with_context(|| format!("failed to load {} {id}", self.section))
    }
}

fn row_key(id: &ResourceId) -> Option<i64> {
    id.as_u64().and_then(|k| i64::try_from(k).ok())
}

#[async_trait]
impl ResourceModel for SeaOrmResourceModel {
    async fn get_one_by_id(&self, id: &ResourceId) -> Result<Option<Resource>, ResourceModelError> {
        let row = self.find_row(id).await?;
        Ok(row.map(Resource::try_from).transpose()?)
    }

    async fn get(&self, query: &ListQuery) -> Result<Vec<Resource>, ResourceModelError> {
        let rows = ResourceEntity::find()
            .filter(entity::Column::Section.eq(self.section.as_str()))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .with_context(|| format!("failed to list {}", self.section))?;

        let mut matching = Vec::with_capacity(rows.len());
        for row in rows {
            let resource = Resource::try_from(row)?;
            if query.filter.matches(&resource.attributes) {
                matching.push(resource);
            }
        }

        Ok(query.paginate(matching))
    }

    async fn store_form(
        &self,
        data: FieldMap,
        id: Option<&ResourceId>,
    ) -> Result<ResourceId, ResourceModelError> {
        let data = rules::strip_key(data);
        let existing = match id {
            Some(id) => match self.find_row(id).await? {
                Some(row) => Some((id, row)),
                None => return Err(ResourceModelError::not_found(id.clone())),
            },
            None => None,
        };

        rules::validate(&self.rules, &data)?;
        let encoded = encode_attributes(&data)?;

        if let Some((id, row)) = existing {
            let mut active: entity::ActiveModel = row.into();
            active.attributes = ActiveValue::Set(encoded);
            active
                .update(&self.db)
                .await
                .with_context(|| format!("failed to update {} {id}", self.section))?;
            debug!(section = %self.section, %id, "row updated");
            return Ok(id.clone());
        }

        let active = entity::ActiveModel {
            id: ActiveValue::NotSet,
            section: ActiveValue::Set(self.section.as_str().to_owned()),
            attributes: ActiveValue::Set(encoded),
        };
        let row = active
            .insert(&self.db)
            .await
            .with_context(|| format!("failed to insert into {}", self.section))?;
        debug!(section = %self.section, id = row.id, "row inserted");
        Ok(ResourceId::from(row.id))
    }

    async fn exists_id(&self, id: &ResourceId) -> Result<bool, ResourceModelError> {
        Ok(self.find_row(id).await?.is_some())
    }

    async fn delete_id(&self, id: &ResourceId) -> Result<(), ResourceModelError> {
        let Some(key) = row_key(id) else {
            return Ok(());
        };

        ResourceEntity::delete_many()
            .filter(entity::Column::Id.eq(key))
            .filter(entity::Column::Section.eq(self.section.as_str()))
            .exec(&self.db)
            .await
            .with_context(|| format!("failed to delete {} {id}", self.section))?;
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(section: &str, db: DatabaseConnection) -> SeaOrmResourceModel {
        SeaOrmResourceModel::new(
            db,
            Section::new(section),
            vec![FieldRule {
                name: "title".to_owned(),
                label: None,
                required: true,
                max_length: Some(20),
            }],
        )
    }

    fn data(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_crud_roundtrip_on_sqlite() {
        let db = connect("sqlite::memory:").await.unwrap();
        let products = model("products", db);

        let id = products
            .store_form(data(json!({"title": "Kettle", "price": 10})), None)
            .await
            .unwrap();
        let item = products.get_one_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.attributes["title"], "Kettle");

        products
            .store_form(data(json!({"title": "Teapot"})), Some(&id))
            .await
            .unwrap();
        let item = products.get_one_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.attributes, data(json!({"title": "Teapot"})));

        assert!(products.exists_id(&id).await.unwrap());
        products.delete_id(&id).await.unwrap();
        assert!(!products.exists_id(&id).await.unwrap());
        assert!(products.get_one_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sections_are_isolated() {
        let db = connect("sqlite::memory:").await.unwrap();
        let products = model("products", db.clone());
        let pages = model("pages", db);

        let id = products
            .store_form(data(json!({"title": "Kettle"})), None)
            .await
            .unwrap();

        assert!(pages.get_one_by_id(&id).await.unwrap().is_none());
        assert!(!pages.exists_id(&id).await.unwrap());
        assert!(pages.get(&ListQuery::default()).await.unwrap().is_empty());
        assert_eq!(products.get(&ListQuery::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_in_key_order() {
        let db = connect("sqlite::memory:").await.unwrap();
        let products = model("products", db);
        for (title, color) in [("a", "red"), ("b", "blue"), ("c", "red")] {
            products
                .store_form(data(json!({"title": title, "color": color})), None)
                .await
                .unwrap();
        }

        let mut query = ListQuery::default();
        query.filter.insert("color", "red");
        let items = products.get(&query).await.unwrap();

        let titles: Vec<_> = items.iter().map(|r| r.attributes["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("c")]);
    }

    #[tokio::test]
    async fn test_validation_and_missing_rows() {
        let db = connect("sqlite::memory:").await.unwrap();
        let products = model("products", db);

        let err = products
            .store_form(data(json!({"title": ""})), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceModelError::Validation(_)));

        let err = products
            .store_form(data(json!({"title": "x"})), Some(&ResourceId::from("404")))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceModelError::NotFound { .. }));

        let err = products
            .store_form(data(json!({"title": ""})), Some(&ResourceId::from("999")))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceModelError::NotFound { .. }));
    }
}
