//! HTTP inbound adapter exposing REST endpoints.

pub mod ads;
pub mod articles;
pub mod categories;
pub mod error;
pub mod health;
pub mod media;
pub mod session;
pub mod state;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;

use actix_web::Scope;

/// Register every `/api/v1` endpoint on the given scope.
///
/// Shared between the server wiring and handler tests so the two cannot
/// drift apart.
pub fn api_scope(scope: Scope) -> Scope {
    scope
        .service(users::login)
        .service(users::logout)
        .service(users::me)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(articles::list_articles)
        .service(articles::create_article)
        .service(articles::submit_article)
        .service(articles::publish_article)
        .service(articles::unpublish_article)
        .service(articles::get_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::rename_category)
        .service(categories::delete_category)
        .service(ads::list_ads)
        .service(ads::create_ad)
        .service(ads::update_ad)
        .service(ads::delete_ad)
        .service(media::upload_media)
        .service(media::serve_media)
}
