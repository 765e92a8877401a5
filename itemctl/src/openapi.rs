//! OpenAPI documentation for the users and items API.
//!
//! Served as JSON at `/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::{api, errors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "itemctl",
        description = "Users and the items they own."
    ),
    paths(
        api::handlers::users::create_user,
        api::handlers::users::list_users,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::items::create_item_for_user,
        api::handlers::items::list_items,
    ),
    components(
        schemas(
            api::models::users::UserCreate,
            api::models::users::UserUpdate,
            api::models::users::UserResponse,
            api::models::users::MessageResponse,
            api::models::items::ItemCreate,
            api::models::items::ItemResponse,
            errors::ErrorBody,
        )
    ),
    tags(
        (name = "users", description = "Create, read, update and delete users. Responses nest the items each user owns."),
        (name = "items", description = "Create items for a user and list all items."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/users/"));
        assert!(paths.contains(&"/users/{user_id}"));
        assert!(paths.contains(&"/users/{user_id}/items/"));
        assert!(paths.contains(&"/items/"));

        let user_by_id = &doc.paths.paths["/users/{user_id}"];
        assert!(user_by_id.get.is_some());
        assert!(user_by_id.put.is_some());
        assert!(user_by_id.delete.is_some());
    }

    #[test]
    fn test_document_has_schemas() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        for schema in ["UserCreate", "UserResponse", "ItemCreate", "ItemResponse", "MessageResponse", "ErrorBody"] {
            assert!(components.schemas.contains_key(schema), "missing schema {schema}");
        }
    }
}
