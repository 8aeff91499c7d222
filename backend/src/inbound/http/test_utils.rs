//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::domain::ports::{CategoryRepository, MediaStore, NullMediaStore, UserRepository};
use crate::domain::{
    AccountService, AdService, Category, EditorialService, Role, TaxonomyService, User,
};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::MemoryStore;

pub(crate) const ADMIN_EMAIL: &str = "ada@example.com";
pub(crate) const EDITOR_EMAIL: &str = "eve@example.com";
pub(crate) const CONTRIBUTOR_EMAIL: &str = "cleo@example.com";
pub(crate) const PASSWORD: &str = "pw";

/// Build an [`HttpState`] over a fresh memory store seeded with one user
/// per role and a "Local" category.
pub(crate) async fn seeded_state() -> web::Data<HttpState> {
    let store = Arc::new(MemoryStore::new());
    for (name, email, role) in [
        ("Ada", ADMIN_EMAIL, Role::Admin),
        ("Eve", EDITOR_EMAIL, Role::Editor),
        ("Cleo", CONTRIBUTOR_EMAIL, Role::Contributor),
    ] {
        let user = User::try_new(name, email, PASSWORD, role, None).expect("valid user");
        UserRepository::save(store.as_ref(), &user)
            .await
            .expect("user saves");
    }
    CategoryRepository::save(
        store.as_ref(),
        &Category::try_new("Local").expect("valid category"),
    )
    .await
    .expect("category saves");

    let media: Arc<dyn MediaStore> = Arc::new(NullMediaStore);
    web::Data::new(HttpState {
        editorial: EditorialService::new(store.clone(), store.clone(), media.clone()),
        taxonomy: TaxonomyService::new(store.clone(), store.clone()),
        accounts: AccountService::new(store.clone()),
        ads: AdService::new(store, media.clone()),
        media,
        media_files: None,
    })
}

/// Session middleware with an ephemeral key and lax cookies for tests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .build()
}

/// The full API surface under test, mirroring the server wiring.
pub(crate) fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .service(api_scope(web::scope("/api/v1")).wrap(test_session_middleware()))
}

/// Log in as a seeded user and return the session cookie.
pub(crate) async fn login_as(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = actix_test::call_service(app, req).await;
    assert!(resp.status().is_success(), "login failed for {email}");
    resp.response()
        .cookies()
        .next()
        .expect("session cookie issued")
        .into_owned()
}
