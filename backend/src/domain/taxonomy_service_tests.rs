//! Tests for the category taxonomy service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    ArticleRepository, MockArticleRepository, MockCategoryRepository, NullMediaStore,
};
use crate::domain::{ArticleStatus, ErrorCode, NewArticle, Role};
use crate::outbound::persistence::MemoryStore;

fn user(name: &str, role: Role) -> User {
    User::try_new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        "pw",
        role,
        None,
    )
    .expect("valid user")
}

fn service(store: &Arc<MemoryStore>) -> TaxonomyService {
    TaxonomyService::new(store.clone(), store.clone())
}

/// Seed `count` published articles tagged with `category` through the
/// editorial service so the fixtures stay realistic.
async fn seed_articles(store: &Arc<MemoryStore>, category: &str, count: usize) {
    let editorial = crate::domain::EditorialService::new(
        store.clone(),
        store.clone(),
        Arc::new(NullMediaStore),
    );
    let admin = user("Ada", Role::Admin);
    for index in 0..count {
        editorial
            .create_draft(
                &admin,
                NewArticle {
                    title: format!("Match report {index}"),
                    excerpt: String::new(),
                    content: "body".to_owned(),
                    category: category.to_owned(),
                    image_url: String::new(),
                    video_url: None,
                    status: Some(ArticleStatus::Published),
                },
            )
            .await
            .expect("article created");
    }
}

#[tokio::test]
async fn create_is_admin_only_and_refuses_duplicates() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    for actor in [user("Eve", Role::Editor), user("Cleo", Role::Contributor)] {
        let err = service
            .create(&actor, "Sport")
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    let category = service.create(&admin, "Sport").await.expect("created");
    assert_eq!(category.slug, "sport");

    let err = service
        .create(&admin, "Sport")
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn rename_cascades_over_every_referencing_article() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    service.create(&admin, "Politics").await.expect("created");
    seed_articles(&store, "Sport", 3).await;
    seed_articles(&store, "Politics", 1).await;
    let before = ArticleRepository::list(store.as_ref())
        .await
        .expect("lists")
        .len();

    let renamed = service
        .rename(&admin, &sport.id, "World Sport")
        .await
        .expect("renamed");
    assert_eq!(renamed.id, sport.id);
    assert_eq!(renamed.slug, "world-sport");

    let articles = ArticleRepository::list(store.as_ref()).await.expect("lists");
    assert_eq!(articles.len(), before, "no article duplicated or lost");
    assert_eq!(
        articles
            .iter()
            .filter(|a| a.category == "World Sport")
            .count(),
        3
    );
    assert!(articles.iter().all(|a| a.category != "Sport"));
}

#[tokio::test]
async fn rename_refuses_existing_names_and_unknown_ids() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    service.create(&admin, "Politics").await.expect("created");

    let err = service
        .rename(&admin, &sport.id, "Politics")
        .await
        .expect_err("duplicate name");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let err = service
        .rename(&admin, &CategoryId::random(), "Culture")
        .await
        .expect_err("unknown id");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_with_dependents_requires_a_reassignment_target() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    seed_articles(&store, "Sport", 3).await;

    let err = service
        .delete(&admin, &sport.id, None)
        .await
        .expect_err("dependents block deletion");
    assert_eq!(err.code(), ErrorCode::HasDependents);
    let details = err.details().expect("details present");
    assert_eq!(details["articleCount"], 3);

    // Category and articles are untouched by the refusal.
    let categories = service.list().await.expect("lists");
    assert!(categories.iter().any(|c| c.name == "Sport"));
    assert_eq!(
        store.count_by_category("Sport").await.expect("counts"),
        3
    );
}

#[tokio::test]
async fn delete_with_a_target_reassigns_then_removes() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    service.create(&admin, "Culture").await.expect("created");
    seed_articles(&store, "Sport", 2).await;

    service
        .delete(&admin, &sport.id, Some("Culture"))
        .await
        .expect("deletes with reassignment");

    assert_eq!(store.count_by_category("Sport").await.expect("counts"), 0);
    assert_eq!(
        store.count_by_category("Culture").await.expect("counts"),
        2
    );
    let categories = service.list().await.expect("lists");
    assert!(categories.iter().all(|c| c.name != "Sport"));
}

#[tokio::test]
async fn delete_without_dependents_removes_immediately() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    service
        .delete(&admin, &sport.id, None)
        .await
        .expect("no dependents");
    assert!(service.list().await.expect("lists").is_empty());
}

#[tokio::test]
async fn delete_rejects_unknown_or_self_reassignment_targets() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let admin = user("Ada", Role::Admin);

    let sport = service.create(&admin, "Sport").await.expect("created");
    seed_articles(&store, "Sport", 1).await;

    let err = service
        .delete(&admin, &sport.id, Some("Sport"))
        .await
        .expect_err("self target");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let err = service
        .delete(&admin, &sport.id, Some("Nowhere"))
        .await
        .expect_err("unknown target");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn failed_cascade_is_reported_with_the_incomplete_phase() {
    let mut categories = MockCategoryRepository::new();
    let sport = Category::try_new("Sport").expect("valid category");
    let sport_id = sport.id;
    let fetched = sport.clone();
    categories
        .expect_find_by_id()
        .returning(move |_| Ok(Some(fetched.clone())));
    categories.expect_find_by_name().returning(|_| Ok(None));
    categories.expect_save().returning(|_| Ok(()));

    let mut articles = MockArticleRepository::new();
    articles
        .expect_reassign_category()
        .returning(|_, _| Err(StorageError::query("write timed out")));

    let service = TaxonomyService::new(Arc::new(categories), Arc::new(articles));
    let admin = user("Ada", Role::Admin);

    let err = service
        .rename(&admin, &sport_id, "World Sport")
        .await
        .expect_err("cascade failed");
    assert_eq!(err.code(), ErrorCode::StorageFailure);
    let details = err.details().expect("details present");
    assert_eq!(details["phase"], "articleReassignment");
    assert_eq!(details["oldName"], "Sport");
    assert_eq!(details["newName"], "World Sport");
}
