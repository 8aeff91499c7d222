//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    AdRepository, ArticleRepository, CategoryRepository, MediaStore, NullMediaStore,
    UserRepository,
};
use crate::domain::{AccountService, AdService, EditorialService, TaxonomyService};
use crate::inbound::http::api_scope;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::RequestId;
use crate::outbound::media::DirMediaStore;
use crate::outbound::persistence::{JsonStore, MemoryStore};
use crate::seed::seed_if_empty;

/// One handle per persistence port; both store adapters implement all of
/// them, so the bundle is four views of a single store.
struct Stores {
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
    ads: Arc<dyn AdRepository>,
}

fn build_stores(config: &ServerConfig) -> std::io::Result<Stores> {
    match &config.data_dir {
        Some(dir) => {
            let store = Arc::new(JsonStore::open(dir).map_err(|error| {
                std::io::Error::other(format!("cannot open data store: {error}"))
            })?);
            info!(path = %dir.display(), "using the JSON file store");
            Ok(Stores {
                articles: store.clone(),
                categories: store.clone(),
                users: store.clone(),
                ads: store,
            })
        }
        None => {
            warn!("no data directory configured; state is lost on restart");
            let store = Arc::new(MemoryStore::new());
            Ok(Stores {
                articles: store.clone(),
                categories: store.clone(),
                users: store.clone(),
                ads: store,
            })
        }
    }
}

fn build_media(
    config: &ServerConfig,
) -> std::io::Result<(Arc<dyn MediaStore>, Option<Arc<DirMediaStore>>)> {
    match &config.media_dir {
        Some(dir) => {
            let store = Arc::new(DirMediaStore::open(dir).map_err(|error| {
                std::io::Error::other(format!("cannot open media store: {error}"))
            })?);
            Ok((store.clone(), Some(store)))
        }
        None => {
            warn!("no media directory configured; uploads degrade to inline content");
            Ok((Arc::new(NullMediaStore), None))
        }
    }
}

/// Build the stores, run startup seeding, and serve the API until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let stores = build_stores(&config)?;
    if config.seed_bootstrap_data {
        seed_if_empty(stores.users.as_ref(), stores.categories.as_ref())
            .await
            .map_err(|error| std::io::Error::other(format!("startup seeding failed: {error}")))?;
    }
    let (media, media_files) = build_media(&config)?;

    let http_state = web::Data::new(HttpState {
        editorial: EditorialService::new(
            stores.articles.clone(),
            stores.categories.clone(),
            media.clone(),
        ),
        taxonomy: TaxonomyService::new(stores.categories.clone(), stores.articles.clone()),
        accounts: AccountService::new(stores.users.clone()),
        ads: AdService::new(stores.ads.clone(), media.clone()),
        media,
        media_files,
    });

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = api_scope(web::scope("/api/v1")).wrap(session);

        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(RequestId)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
