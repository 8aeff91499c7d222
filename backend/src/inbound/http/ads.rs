//! Ads API handlers.
//!
//! The public listing only returns active ads; the full inventory and all
//! mutations sit behind the `ManageAds` capability.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Ad, AdChanges, AdFormat, AdId, AdPlacement, Error, NewAd};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/ads`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    pub title: String,
    pub placement: AdPlacement,
    pub format: AdFormat,
    pub content: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for `PUT /api/v1/ads/{id}`. Absent fields stay unchanged.
#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub placement: Option<AdPlacement>,
    #[serde(default)]
    pub format: Option<AdFormat>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Query parameters for `GET /api/v1/ads`.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListAdsQuery {
    /// Include inactive ads; requires the `ManageAds` capability.
    #[serde(default)]
    pub include_inactive: bool,
}

/// List ads: active ones publicly, the full inventory for admins.
#[utoipa::path(
    get,
    path = "/api/v1/ads",
    params(ListAdsQuery),
    responses(
        (status = 200, description = "Ads", body = [Ad]),
        (status = 403, description = "Inventory requested without ManageAds", body = Error),
    ),
    tags = ["ads"],
    operation_id = "listAds",
    security([])
)]
#[get("/ads")]
pub async fn list_ads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListAdsQuery>,
) -> ApiResult<web::Json<Vec<Ad>>> {
    let ads = if query.include_inactive {
        let actor = session.require_user(&state.accounts).await?;
        state.ads.list_all(&actor).await?
    } else {
        state.ads.list_active().await?
    };
    Ok(web::Json(ads))
}

/// Create an ad. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/ads",
    request_body = CreateAdRequest,
    responses(
        (status = 201, description = "Ad created", body = Ad),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["ads"],
    operation_id = "createAd"
)]
#[post("/ads")]
pub async fn create_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAdRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let CreateAdRequest {
        title,
        placement,
        format,
        content,
        link_url,
        active,
    } = payload.into_inner();
    let new = NewAd {
        title,
        placement,
        format,
        content,
        link_url,
        active,
    };
    let ad = state.ads.create(&actor, new).await?;
    Ok(HttpResponse::Created().json(ad))
}

/// Update an ad. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/ads/{id}",
    request_body = UpdateAdRequest,
    params(("id" = Uuid, Path, description = "Ad id")),
    responses(
        (status = 200, description = "Ad updated", body = Ad),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown ad", body = Error),
    ),
    tags = ["ads"],
    operation_id = "updateAd"
)]
#[put("/ads/{id}")]
pub async fn update_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateAdRequest>,
) -> ApiResult<web::Json<Ad>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = AdId::from(path.into_inner());
    let UpdateAdRequest {
        title,
        placement,
        format,
        content,
        link_url,
        active,
    } = payload.into_inner();
    let changes = AdChanges {
        title,
        placement,
        format,
        content,
        link_url,
        active,
    };
    let ad = state.ads.update(&actor, &id, changes).await?;
    Ok(web::Json(ad))
}

/// Delete an ad. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/ads/{id}",
    params(("id" = Uuid, Path, description = "Ad id")),
    responses(
        (status = 204, description = "Ad deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown ad", body = Error),
    ),
    tags = ["ads"],
    operation_id = "deleteAd"
)]
#[delete("/ads/{id}")]
pub async fn delete_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let id = AdId::from(path.into_inner());
    state.ads.delete(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{
        ADMIN_EMAIL, EDITOR_EMAIL, login_as, seeded_state, test_app,
    };

    #[actix_web::test]
    async fn inactive_ads_are_hidden_from_the_public_listing() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let admin = login_as(&app, ADMIN_EMAIL).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/ads")
            .cookie(admin.clone())
            .set_json(json!({
                "title": "Spring sale",
                "placement": "sidebar_square",
                "format": "image",
                "content": "https://cdn.example.com/banner.png",
                "active": false,
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = actix_test::TestRequest::get().uri("/api/v1/ads").to_request();
        let public: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(public.as_array().map(Vec::len), Some(0));

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/ads?includeInactive=true")
            .cookie(admin)
            .to_request();
        let inventory: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(inventory.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn inventory_listing_requires_manage_ads() {
        let state = seeded_state().await;
        let app = actix_test::init_service(test_app(state)).await;
        let editor = login_as(&app, EDITOR_EMAIL).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/ads?includeInactive=true")
            .cookie(editor)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
