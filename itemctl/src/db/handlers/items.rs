//! Database repository for items.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::items::{ItemCreateDBRequest, ItemDBResponse},
};
use crate::types::{ItemId, UserId};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;
use tracing::instrument;

const ITEM_COLUMNS: &str = "id, title, description, owner_id";

/// Filter for listing items
#[derive(Debug, Clone)]
pub struct ItemFilter {
    pub skip: i64,
    pub limit: i64,
}

impl ItemFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: UserId,
}

impl From<Item> for ItemDBResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
        }
    }
}

pub struct Items<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Items<'c> {
    type CreateRequest = ItemCreateDBRequest;
    type Response = ItemDBResponse;
    type Id = ItemId;
    type Filter = ItemFilter;

    /// The owner is not checked: an item can be created for a user id that doesn't exist.
    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (title, description, owner_id) VALUES (?, ?, ?) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.owner_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(ItemDBResponse::from(item))
    }

    #[instrument(skip(self), fields(item_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let item = sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(item.map(ItemDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let items = sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC LIMIT ? OFFSET ?"))
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(items.into_iter().map(ItemDBResponse::from).collect())
    }
}

impl<'c> Items<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Fetch the items of several owners in one query, grouped by owner id.
    ///
    /// Each owner's items are ordered by id. Owners without items are absent from the map.
    #[instrument(skip(self, owner_ids), fields(count = owner_ids.len()), err)]
    pub async fn list_by_owners(&mut self, owner_ids: &[UserId]) -> Result<HashMap<UserId, Vec<ItemDBResponse>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE owner_id IN ("));
        let mut separated = query.separated(", ");
        for owner_id in owner_ids {
            separated.push_bind(*owner_id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let items = query.build_query_as::<Item>().fetch_all(&mut *self.db).await?;

        let mut result: HashMap<UserId, Vec<ItemDBResponse>> = HashMap::new();
        for item in items {
            result.entry(item.owner_id).or_default().push(ItemDBResponse::from(item));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::api::models::items::ItemCreate;
    use crate::db::handlers::Users;
    use crate::db::models::users::UserCreateDBRequest;
    use sqlx::SqlitePool;

    fn item_request(owner_id: UserId, title: &str) -> ItemCreateDBRequest {
        ItemCreateDBRequest::new(
            owner_id,
            ItemCreate {
                title: title.to_string(),
                description: None,
            },
        )
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_item(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = Users::new(&mut conn)
            .create(&UserCreateDBRequest::new("owner@example.com".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let mut repo = Items::new(&mut conn);
        let request = ItemCreateDBRequest::new(
            owner.id,
            ItemCreate {
                title: "Groceries".to_string(),
                description: Some("milk, eggs".to_string()),
            },
        );
        let item = repo.create(&request).await.unwrap();

        assert_eq!(item.id, 1);
        assert_eq!(item.title, "Groceries");
        assert_eq!(item.description.as_deref(), Some("milk, eggs"));
        assert_eq!(item.owner_id, owner.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_item_for_missing_owner(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Items::new(&mut conn);

        // Owner 404 was never created
        let item = repo.create(&item_request(404, "orphan")).await.unwrap();
        assert_eq!(item.owner_id, 404);
        assert_eq!(repo.get_by_id(item.id).await.unwrap(), Some(item));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_items_with_pagination(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Items::new(&mut conn);

        for i in 0..4 {
            repo.create(&item_request(1 + i % 2, &format!("item {i}"))).await.unwrap();
        }

        let page = repo.list(&ItemFilter::new(1, 2)).await.unwrap();
        let titles: Vec<&str> = page.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["item 1", "item 2"]);

        assert!(repo.list(&ItemFilter::new(0, 0)).await.unwrap().is_empty());
        assert_eq!(repo.list(&ItemFilter::new(0, 100)).await.unwrap().len(), 4);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_by_owners(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Items::new(&mut conn);

        let a1 = repo.create(&item_request(1, "a1")).await.unwrap();
        let b1 = repo.create(&item_request(2, "b1")).await.unwrap();
        let a2 = repo.create(&item_request(1, "a2")).await.unwrap();
        repo.create(&item_request(3, "c1")).await.unwrap();

        let by_owner = repo.list_by_owners(&[1, 2, 5]).await.unwrap();

        assert_eq!(by_owner.len(), 2);
        assert_eq!(by_owner[&1], vec![a1, a2]);
        assert_eq!(by_owner[&2], vec![b1]);
        assert!(!by_owner.contains_key(&5));

        assert!(repo.list_by_owners(&[]).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_items_survive_owner_deletion(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = Users::new(&mut conn)
            .create(&UserCreateDBRequest::new("leaving@example.com".to_string(), "hash".to_string()))
            .await
            .unwrap();
        let item = Items::new(&mut conn).create(&item_request(owner.id, "left behind")).await.unwrap();

        assert!(Users::new(&mut conn).delete(owner.id).await.unwrap());

        let remaining = Items::new(&mut conn).get_by_id(item.id).await.unwrap();
        assert_eq!(remaining, Some(item));
    }
}
