//! In-memory store adapter.
//!
//! Serves two purposes: the default store for local development when no
//! data directory is configured, and the fixture most service tests run
//! against. Ordering is deterministic — articles newest first, everything
//! else by name/title — so listings behave like the file-backed adapter.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{
    AdRepository, ArticleRepository, CategoryRepository, StorageError, UserRepository,
};
use crate::domain::{Ad, AdId, Article, ArticleId, Category, CategoryId, User, UserId};

/// Stateful in-memory implementation of every persistence port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: RwLock<HashMap<ArticleId, Article>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    users: RwLock<HashMap<UserId, User>>,
    ads: RwLock<HashMap<AdId, Ad>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::connection("store lock poisoned")
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Article>, StorageError> {
        let guard = self.articles.read().map_err(|_| poisoned())?;
        let mut articles: Vec<Article> = guard.values().cloned().collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StorageError> {
        let guard = self.articles.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    async fn save(&self, article: &Article) -> Result<(), StorageError> {
        let mut guard = self.articles.write().map_err(|_| poisoned())?;
        guard.insert(article.id, article.clone());
        Ok(())
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, StorageError> {
        let mut guard = self.articles.write().map_err(|_| poisoned())?;
        Ok(guard.remove(id).is_some())
    }

    async fn count_by_category(&self, category_name: &str) -> Result<u64, StorageError> {
        let guard = self.articles.read().map_err(|_| poisoned())?;
        Ok(guard
            .values()
            .filter(|article| article.category == category_name)
            .count() as u64)
    }

    async fn reassign_category(&self, from: &str, to: &str) -> Result<u64, StorageError> {
        let mut guard = self.articles.write().map_err(|_| poisoned())?;
        let mut updated = 0;
        for article in guard.values_mut() {
            if article.category == from {
                article.category = to.to_owned();
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, StorageError> {
        let guard = self.categories.read().map_err(|_| poisoned())?;
        let mut categories: Vec<Category> = guard.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, StorageError> {
        let guard = self.categories.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        let guard = self.categories.read().map_err(|_| poisoned())?;
        Ok(guard.values().find(|category| category.name == name).cloned())
    }

    async fn save(&self, category: &Category) -> Result<(), StorageError> {
        let mut guard = self.categories.write().map_err(|_| poisoned())?;
        guard.insert(category.id, category.clone());
        Ok(())
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, StorageError> {
        let mut guard = self.categories.write().map_err(|_| poisoned())?;
        Ok(guard.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, StorageError> {
        let guard = self.users.read().map_err(|_| poisoned())?;
        let mut users: Vec<User> = guard.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let guard = self.users.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let guard = self.users.read().map_err(|_| poisoned())?;
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self.users.write().map_err(|_| poisoned())?;
        guard.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, StorageError> {
        let mut guard = self.users.write().map_err(|_| poisoned())?;
        Ok(guard.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let guard = self.users.read().map_err(|_| poisoned())?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl AdRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Ad>, StorageError> {
        let guard = self.ads.read().map_err(|_| poisoned())?;
        let mut ads: Vec<Ad> = guard.values().cloned().collect();
        ads.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(ads)
    }

    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, StorageError> {
        let guard = self.ads.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    async fn save(&self, ad: &Ad) -> Result<(), StorageError> {
        let mut guard = self.ads.write().map_err(|_| poisoned())?;
        guard.insert(ad.id, ad.clone());
        Ok(())
    }

    async fn delete(&self, id: &AdId) -> Result<bool, StorageError> {
        let mut guard = self.ads.write().map_err(|_| poisoned())?;
        Ok(guard.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;
    use crate::domain::{ArticleStatus, Role};

    fn article(title: &str, category: &str) -> Article {
        let now = Utc::now();
        Article {
            id: ArticleId::random(),
            title: title.to_owned(),
            excerpt: String::new(),
            content: "body".to_owned(),
            category: category.to_owned(),
            image_url: String::new(),
            video_url: None,
            author_id: UserId::random(),
            author_name: "Ada".to_owned(),
            author_avatar: None,
            status: ArticleStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn reassign_rewrites_only_matching_articles() {
        let store = MemoryStore::new();
        for title in ["one", "two"] {
            ArticleRepository::save(&store, &article(title, "Sport"))
                .await
                .expect("saves");
        }
        ArticleRepository::save(&store, &article("three", "Politics"))
            .await
            .expect("saves");

        let updated = store
            .reassign_category("Sport", "World Sport")
            .await
            .expect("reassigns");
        assert_eq!(updated, 2);
        assert_eq!(store.count_by_category("Sport").await.expect("counts"), 0);
        assert_eq!(
            store
                .count_by_category("World Sport")
                .await
                .expect("counts"),
            2
        );
        assert_eq!(store.count_by_category("Politics").await.expect("counts"), 1);
    }

    #[tokio::test]
    async fn delete_reports_missing_records() {
        let store = MemoryStore::new();
        let stored = article("one", "Sport");
        ArticleRepository::save(&store, &stored).await.expect("saves");
        assert!(ArticleRepository::delete(&store, &stored.id)
            .await
            .expect("deletes"));
        assert!(!ArticleRepository::delete(&store, &stored.id)
            .await
            .expect("deletes"));
    }

    #[tokio::test]
    async fn email_lookup_finds_saved_users() {
        let store = MemoryStore::new();
        let user = User::try_new("Ada", "ada@example.com", "pw", Role::Editor, None)
            .expect("valid user");
        UserRepository::save(&store, &user).await.expect("saves");
        let found = store
            .find_by_email("ada@example.com")
            .await
            .expect("queries")
            .expect("present");
        assert_eq!(found.id, user.id);
        assert_eq!(UserRepository::count(&store).await.expect("counts"), 1);
    }
}
