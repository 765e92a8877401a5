use crate::api::models::items::ItemResponse;
use crate::api::models::pagination::Pagination;
use crate::api::models::users::{MessageResponse, UserCreate, UserResponse, UserUpdate};
use crate::db::handlers::{Items, Repository, Users, users::UserFilter};
use crate::db::models::users::{UserCreateDBRequest, UserUpdateDBRequest};
use crate::db::pools;
use crate::errors::{EMAIL_ALREADY_REGISTERED, Error, ErrorBody, Result};
use crate::password::{self, Argon2Params};
use crate::{AppState, types::UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
};

fn user_not_found(user_id: UserId) -> Error {
    Error::NotFound {
        resource: "User".to_string(),
        id: user_id.to_string(),
    }
}

#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    summary = "Create user",
    request_body = UserCreate,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(State(state): State<AppState>, Json(create): Json<UserCreate>) -> Result<Json<UserResponse>> {
    // Hash before taking the write lock so other writers aren't held up by Argon2
    let params = Argon2Params::from(&state.config.password);
    let plain = create.password;
    let hashed_password = tokio::task::spawn_blocking(move || password::hash_string_with_params(&plain, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut tx = pools::begin_write(&state.db).await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut tx);

    if repo.get_user_by_email(&create.email).await?.is_some() {
        return Err(Error::Conflict {
            message: EMAIL_ALREADY_REGISTERED.to_string(),
        });
    }

    let user = repo.create(&UserCreateDBRequest::new(create.email, hashed_password)).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    summary = "List users",
    params(Pagination),
    responses(
        (status = 200, description = "Users ordered by id, each with its items", body = Vec<UserResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Result<Json<Vec<UserResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let (skip, limit) = pagination.params();

    let users = Users::new(&mut pool_conn).list(&UserFilter::new(skip, limit)).await?;

    let user_ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
    let mut items_by_owner = Items::new(&mut pool_conn).list_by_owners(&user_ids).await?;

    let response = users
        .into_iter()
        .map(|user| {
            let items = items_by_owner
                .remove(&user.id)
                .unwrap_or_default()
                .into_iter()
                .map(ItemResponse::from)
                .collect();
            UserResponse::from(user).with_items(items)
        })
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Get user",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with its items", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Result<Json<UserResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut pool_conn)
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    let items = Items::new(&mut pool_conn)
        .list_by_owners(&[user_id])
        .await?
        .remove(&user_id)
        .unwrap_or_default()
        .into_iter()
        .map(ItemResponse::from)
        .collect();

    Ok(Json(UserResponse::from(user).with_items(items)))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Update user",
    request_body = UserUpdate,
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Email already registered", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<MessageResponse>> {
    let mut tx = pools::begin_write(&state.db).await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut tx);

    if repo.get_by_id(user_id).await?.is_none() {
        return Err(user_not_found(user_id));
    }

    if let Some(existing) = repo.get_user_by_email(&update.email).await?
        && existing.id != user_id
    {
        return Err(Error::Conflict {
            message: EMAIL_ALREADY_REGISTERED.to_string(),
        });
    }

    repo.update(user_id, &UserUpdateDBRequest::from(update)).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Delete user",
    description = "Removes the user. Items owned by the user are kept.",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user_id))]
pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Result<Json<MessageResponse>> {
    let mut tx = pools::begin_write(&state.db).await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut tx);

    if repo.get_by_id(user_id).await?.is_none() {
        return Err(user_not_found(user_id));
    }

    repo.delete(user_id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
