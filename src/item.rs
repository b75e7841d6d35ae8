use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    Set,
};
use serde::Serialize;

use crate::db::Store;
use crate::entities::item;
use crate::error::AppError;
use crate::model::{Category, DEFAULT_PRIORITY};

/// One wish-list entry. `id` stays `None` until the item is saved.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Item {
    pub id: Option<i64>,
    pub title: String,
    pub deadline: Option<String>,
    pub category: String,
    pub priority: i64,
}

impl From<item::Model> for Item {
    fn from(model: item::Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            deadline: model.deadline,
            category: model.category,
            priority: model.priority,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ItemCount {
    total: i64,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            deadline: None,
            category: Category::General.as_str().to_string(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        ensure_non_empty("title", &self.title)
    }

    /// Inserts a new row and records the generated id on `self`.
    pub async fn save(&mut self, store: &Store) -> Result<i64, AppError> {
        let session = store.open().await?;
        let active = item::ActiveModel {
            title: Set(self.title.clone()),
            deadline: Set(self.deadline.clone()),
            category: Set(self.category.clone()),
            priority: Set(self.priority),
            ..Default::default()
        };
        let statement = item::Entity::insert(active).build(session.backend());
        let result = session.execute(statement).await;
        let inserted = session.finish(result).await?;

        let id = inserted.last_insert_id() as i64;
        self.id = Some(id);
        tracing::debug!(id, title = %self.title, "item saved");
        Ok(id)
    }

    /// All items, highest priority first; equal priorities newest first.
    pub async fn list_all(store: &Store) -> Result<Vec<Item>, AppError> {
        let session = store.open().await?;
        let statement = item::Entity::find()
            .order_by_desc(item::Column::Priority)
            .order_by_desc(item::Column::Id)
            .build(session.backend());
        let result = session.fetch_all::<item::Model>(statement).await;
        let rows = session.finish(result).await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    pub async fn count(store: &Store) -> Result<u64, AppError> {
        let session = store.open().await?;
        let statement = item::Entity::find()
            .select_only()
            .column_as(Expr::col(item::Column::Id).count(), "total")
            .build(session.backend());
        let result = session.fetch_one::<ItemCount>(statement).await;
        let count = session.finish(result).await?;
        Ok(count.map(|row| row.total as u64).unwrap_or(0))
    }

    pub async fn find_by_id(store: &Store, id: i64) -> Result<Item, AppError> {
        let session = store.open().await?;
        let statement = item::Entity::find_by_id(id).build(session.backend());
        let result = session.fetch_one::<item::Model>(statement).await;
        session
            .finish(result)
            .await?
            .map(Item::from)
            .ok_or_else(|| AppError::NotFound(format!("item id {id}")))
    }

    /// Overwrites every field of the row with this item's id. A missing row
    /// is not an error; the returned count is 0.
    pub async fn update(&self, store: &Store) -> Result<u64, AppError> {
        let id = self.persisted_id()?;
        let session = store.open().await?;
        let statement = item::Entity::update_many()
            .col_expr(item::Column::Title, Expr::value(self.title.clone()))
            .col_expr(item::Column::Deadline, Expr::value(self.deadline.clone()))
            .col_expr(item::Column::Category, Expr::value(self.category.clone()))
            .col_expr(item::Column::Priority, Expr::value(self.priority))
            .filter(item::Column::Id.eq(id))
            .build(session.backend());
        let result = session.execute(statement).await;
        let updated = session.finish(result).await?;
        Ok(updated.rows_affected())
    }

    /// Removes the row with this item's id. Same zero-row behavior as
    /// [`Item::update`].
    pub async fn delete(&self, store: &Store) -> Result<u64, AppError> {
        let id = self.persisted_id()?;
        let session = store.open().await?;
        let statement = item::Entity::delete_many()
            .filter(item::Column::Id.eq(id))
            .build(session.backend());
        let result = session.execute(statement).await;
        let deleted = session.finish(result).await?;
        Ok(deleted.rows_affected())
    }

    fn persisted_id(&self) -> Result<i64, AppError> {
        self.id.ok_or_else(|| {
            AppError::InvalidInput(format!("item \"{}\" has not been saved", self.title))
        })
    }
}

fn ensure_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty")));
    }
    Ok(())
}
