use crate::api::models::items::{ItemCreate, ItemResponse};
use crate::api::models::pagination::Pagination;
use crate::db::handlers::{Items, Repository, items::ItemFilter};
use crate::db::models::items::ItemCreateDBRequest;
use crate::db::pools;
use crate::errors::{Error, ErrorBody, Result};
use crate::{AppState, types::UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
};

#[utoipa::path(
    post,
    path = "/users/{user_id}/items/",
    tag = "items",
    summary = "Create item for user",
    description = "The owner is not checked, so an item can be created for a user id that doesn't exist.",
    request_body = ItemCreate,
    params(
        ("user_id" = i64, Path, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Item created", body = ItemResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn create_item_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(create): Json<ItemCreate>,
) -> Result<Json<ItemResponse>> {
    let mut tx = pools::begin_write(&state.db).await.map_err(|e| Error::Database(e.into()))?;

    let item = Items::new(&mut tx).create(&ItemCreateDBRequest::new(user_id, create)).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/items/",
    tag = "items",
    summary = "List items",
    params(Pagination),
    responses(
        (status = 200, description = "Items ordered by id", body = Vec<ItemResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_items(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Result<Json<Vec<ItemResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let (skip, limit) = pagination.params();

    let items = Items::new(&mut pool_conn).list(&ItemFilter::new(skip, limit)).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}
