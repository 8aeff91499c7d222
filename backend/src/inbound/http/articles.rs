//! Articles API handlers: CRUD plus the workflow verbs.
//!
//! ```text
//! GET  /api/v1/articles             public, published only when anonymous
//! POST /api/v1/articles             draft creation
//! POST /api/v1/articles/{id}/submit
//! POST /api/v1/articles/{id}/publish
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Article, ArticleChanges, ArticleId, ArticleStatus, Error, NewArticle, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/articles`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    pub category: String,
    /// Plain URL or inline `data:` payload; inline payloads are uploaded
    /// opportunistically.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
}

/// Request body for `PUT /api/v1/articles/{id}`. Absent fields stay
/// unchanged.
#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
}

async fn viewer(state: &HttpState, session: &SessionContext) -> Result<Option<User>, Error> {
    session.current_user(&state.accounts).await
}

/// List articles. Anonymous readers see published articles only.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    responses((status = 200, description = "Articles", body = [Article])),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Article>>> {
    let viewer = viewer(&state, &session).await?;
    let articles = state.editorial.list(viewer.as_ref()).await?;
    Ok(web::Json(articles))
}

/// Fetch a single article.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 404, description = "Unknown or unpublished article", body = Error),
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let viewer = viewer(&state, &session).await?;
    let id = ArticleId::from(path.into_inner());
    let article = state.editorial.get(viewer.as_ref(), &id).await?;
    Ok(web::Json(article))
}

/// Create an article. Every role may draft; requested statuses are coerced
/// by capability.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let CreateArticleRequest {
        title,
        excerpt,
        content,
        category,
        image_url,
        video_url,
        status,
    } = payload.into_inner();
    let new = NewArticle {
        title,
        excerpt,
        content,
        category,
        image_url,
        video_url,
        status,
    };
    let article = state.editorial.create_draft(&actor, new).await?;
    Ok(HttpResponse::Created().json(article))
}

/// Update an article.
#[utoipa::path(
    put,
    path = "/api/v1/articles/{id}",
    request_body = UpdateArticleRequest,
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 403, description = "Not the author or an admin", body = Error),
        (status = 423, description = "Locked for the contributor", body = Error),
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[put("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = ArticleId::from(path.into_inner());
    let UpdateArticleRequest {
        title,
        excerpt,
        content,
        category,
        image_url,
        video_url,
        status,
    } = payload.into_inner();
    let changes = ArticleChanges {
        title,
        excerpt,
        content,
        category,
        image_url,
        video_url,
        status,
    };
    let article = state.editorial.update(&actor, &id, changes).await?;
    Ok(web::Json(article))
}

/// Hand a draft over for review.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/submit",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article submitted", body = Article),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["articles"],
    operation_id = "submitArticle"
)]
#[post("/articles/{id}/submit")]
pub async fn submit_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = ArticleId::from(path.into_inner());
    let article = state.editorial.submit(&actor, &id).await?;
    Ok(web::Json(article))
}

/// Publish an article.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/publish",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article published", body = Article),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["articles"],
    operation_id = "publishArticle"
)]
#[post("/articles/{id}/publish")]
pub async fn publish_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = ArticleId::from(path.into_inner());
    let article = state.editorial.publish(&actor, &id).await?;
    Ok(web::Json(article))
}

/// Withdraw a published article back to draft.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/unpublish",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article withdrawn", body = Article),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["articles"],
    operation_id = "unpublishArticle"
)]
#[post("/articles/{id}/unpublish")]
pub async fn unpublish_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = ArticleId::from(path.into_inner());
    let article = state.editorial.unpublish(&actor, &id).await?;
    Ok(web::Json(article))
}

/// Permanently delete an article. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown article", body = Error),
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let id = ArticleId::from(path.into_inner());
    state.editorial.delete(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        ADMIN_EMAIL, CONTRIBUTOR_EMAIL, EDITOR_EMAIL, login_as, seeded_state, test_app,
    };

    fn draft_payload() -> Value {
        json!({
            "title": "Council approves new tramline",
            "excerpt": "The vote passed late on Tuesday.",
            "content": "Full report body.",
            "category": "Local",
        })
    }

    #[actix_web::test]
    async fn creation_requires_a_session() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .set_json(draft_payload())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn workflow_runs_end_to_end_over_http() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let contributor = login_as(&app, CONTRIBUTOR_EMAIL).await;
        let editor = login_as(&app, EDITOR_EMAIL).await;
        let admin = login_as(&app, ADMIN_EMAIL).await;

        // Contributor drafts.
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(contributor.clone())
            .set_json(draft_payload())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "draft");
        let id = body["id"].as_str().expect("id present").to_owned();

        // Anonymous readers cannot see the draft.
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/articles")
            .to_request();
        let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(0));

        // Contributor cannot publish.
        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/articles/{id}/publish"))
            .cookie(contributor.clone())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Submit, publish, verify the public listing, then withdraw.
        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/articles/{id}/submit"))
            .cookie(contributor.clone())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "submitted");

        // A submitted article is locked for its contributor.
        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/articles/{id}"))
            .cookie(contributor.clone())
            .set_json(json!({ "title": "Rewritten" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::LOCKED);

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/articles/{id}/publish"))
            .cookie(editor)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "published");

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/articles")
            .to_request();
        let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/articles/{id}/unpublish"))
            .cookie(admin)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "draft");

        // Back in draft, the contributor may edit again.
        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/articles/{id}"))
            .cookie(contributor)
            .set_json(json!({ "title": "Second draft" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Second draft");
    }

    #[actix_web::test]
    async fn contributor_published_requests_store_submitted() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let contributor = login_as(&app, CONTRIBUTOR_EMAIL).await;

        let mut payload = draft_payload();
        payload["status"] = json!("published");
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(contributor)
            .set_json(payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "submitted");
    }

    #[actix_web::test]
    async fn deletion_is_admin_only() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let editor = login_as(&app, EDITOR_EMAIL).await;
        let admin = login_as(&app, ADMIN_EMAIL).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(editor.clone())
            .set_json(draft_payload())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        let id = body["id"].as_str().expect("id present").to_owned();

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/articles/{id}"))
            .cookie(editor)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/articles/{id}"))
            .cookie(admin)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
