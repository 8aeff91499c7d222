//! Categories API handlers.
//!
//! Deleting a category that still has articles requires a `reassignTo`
//! query parameter naming the category that receives them; without one the
//! request fails with `409 has_dependents`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, CategoryId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for creating or renaming a category.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNameRequest {
    pub name: String,
}

/// Query parameters for `DELETE /api/v1/categories/{id}`.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryQuery {
    /// Category name that receives the deleted category's articles.
    #[serde(default)]
    pub reassign_to: Option<String>,
}

/// List every category. Public; drives the reader navigation.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "Categories", body = [Category])),
    tags = ["categories"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Category>>> {
    let categories = state.taxonomy.list().await?;
    Ok(web::Json(categories))
}

/// Create a category. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryNameRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid or duplicate name", body = Error),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryNameRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let category = state.taxonomy.create(&actor, &payload.name).await?;
    Ok(HttpResponse::Created().json(category))
}

/// Rename a category, cascading over referencing articles. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    request_body = CategoryNameRequest,
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category renamed", body = Category),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown category", body = Error),
        (status = 503, description = "Cascade incomplete", body = Error),
    ),
    tags = ["categories"],
    operation_id = "renameCategory"
)]
#[put("/categories/{id}")]
pub async fn rename_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<CategoryNameRequest>,
) -> ApiResult<web::Json<Category>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = CategoryId::from(path.into_inner());
    let category = state.taxonomy.rename(&actor, &id, &payload.name).await?;
    Ok(web::Json(category))
}

/// Delete a category, reassigning dependents first. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id"),
        DeleteCategoryQuery,
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown category", body = Error),
        (status = 409, description = "Articles still reference the category", body = Error),
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    query: web::Query<DeleteCategoryQuery>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let id = CategoryId::from(path.into_inner());
    state
        .taxonomy
        .delete(&actor, &id, query.reassign_to.as_deref())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        ADMIN_EMAIL, CONTRIBUTOR_EMAIL, login_as, seeded_state, test_app,
    };

    async fn create_category(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: actix_web::cookie::Cookie<'static>,
        name: &str,
    ) -> Value {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .set_json(json!({ "name": name }))
            .to_request();
        actix_test::call_and_read_body_json(app, req).await
    }

    #[actix_web::test]
    async fn management_is_admin_only() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let contributor = login_as(&app, CONTRIBUTOR_EMAIL).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(contributor)
            .set_json(json!({ "name": "Opinion" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn delete_with_dependents_needs_a_target() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let admin = login_as(&app, ADMIN_EMAIL).await;

        let sport = create_category(&app, admin.clone(), "Sport").await;
        let sport_id = sport["id"].as_str().expect("id present").to_owned();
        create_category(&app, admin.clone(), "Culture").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(admin.clone())
            .set_json(json!({
                "title": "Derby report",
                "content": "body",
                "category": "Sport",
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/categories/{sport_id}"))
            .cookie(admin.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["code"], "has_dependents");

        let req = actix_test::TestRequest::delete()
            .uri(&format!(
                "/api/v1/categories/{sport_id}?reassignTo=Culture"
            ))
            .cookie(admin.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        // The article now reports the target category.
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/articles")
            .cookie(admin)
            .to_request();
        let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
        let categories: Vec<&str> = listed
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|a| a["category"].as_str())
            .collect();
        assert_eq!(categories, vec!["Culture"]);
    }

    #[actix_web::test]
    async fn rename_cascades_to_listed_articles() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let admin = login_as(&app, ADMIN_EMAIL).await;

        let sport = create_category(&app, admin.clone(), "Sport").await;
        let sport_id = sport["id"].as_str().expect("id present").to_owned();

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(admin.clone())
            .set_json(json!({
                "title": "Derby report",
                "content": "body",
                "category": "Sport",
                "status": "published",
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/categories/{sport_id}"))
            .cookie(admin)
            .set_json(json!({ "name": "World Sport" }))
            .to_request();
        let renamed: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(renamed["slug"], "world-sport");

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/articles")
            .to_request();
        let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed[0]["category"], "World Sport");
    }
}
