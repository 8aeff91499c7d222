//! JSON-file store adapter.
//!
//! Persists the whole data set as a single JSON document inside a
//! capability-scoped directory. Every mutation rewrites the document
//! atomically (hidden temp file, then rename) before the in-memory state is
//! committed, so a failed write never leaves the file or the running
//! process half-updated. Snapshot files are small; writes stay on the
//! worker thread.

use std::io::Write;
use std::path::Path;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    AdRepository, ArticleRepository, CategoryRepository, StorageError, UserRepository,
};
use crate::domain::{Ad, AdId, Article, ArticleId, Category, CategoryId, User, UserId};

const STORE_FILE: &str = "store.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snapshot {
    articles: Vec<Article>,
    categories: Vec<Category>,
    users: Vec<User>,
    ads: Vec<Ad>,
}

/// File-backed implementation of every persistence port.
pub struct JsonStore {
    dir: Dir,
    state: RwLock<Snapshot>,
}

impl JsonStore {
    /// Open (or initialise) a store rooted at `path`.
    ///
    /// The directory must already exist; a missing `store.json` inside it
    /// starts the store empty.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| {
            StorageError::connection(format!("cannot open data directory {}: {error}", path.display()))
        })?;
        let state = match dir.read_to_string(STORE_FILE) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|error| {
                StorageError::serialization(format!("cannot parse {STORE_FILE}: {error}"))
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(error) => {
                return Err(StorageError::connection(format!(
                    "cannot read {STORE_FILE}: {error}"
                )));
            }
        };
        Ok(Self {
            dir,
            state: RwLock::new(state),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Result<T, StorageError> {
        let guard = self.state.read().map_err(|_| poisoned())?;
        Ok(f(&guard))
    }

    /// Run a mutation against a copy of the snapshot and persist it; the
    /// in-memory state only advances once the file write succeeded.
    fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> Result<T, StorageError> {
        let mut guard = self.state.write().map_err(|_| poisoned())?;
        let mut next = guard.clone();
        let out = f(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(snapshot).map_err(|error| {
            StorageError::serialization(format!("cannot encode {STORE_FILE}: {error}"))
        })?;
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{STORE_FILE}.tmp.{}.{counter}", std::process::id());
        let write = |tmp: &str| -> std::io::Result<()> {
            let mut file = self.dir.create(tmp)?;
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            self.dir.rename(tmp, &self.dir, STORE_FILE)
        };
        write(&tmp_name).map_err(|error| {
            let _ = self.dir.remove_file(&tmp_name);
            StorageError::query(format!("cannot write {STORE_FILE}: {error}"))
        })
    }
}

fn poisoned() -> StorageError {
    StorageError::connection("store lock poisoned")
}

#[async_trait]
impl ArticleRepository for JsonStore {
    async fn list(&self) -> Result<Vec<Article>, StorageError> {
        self.read(|state| {
            let mut articles = state.articles.clone();
            articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            articles
        })
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StorageError> {
        self.read(|state| state.articles.iter().find(|a| a.id == *id).cloned())
    }

    async fn save(&self, article: &Article) -> Result<(), StorageError> {
        self.mutate(|state| {
            match state.articles.iter_mut().find(|a| a.id == article.id) {
                Some(existing) => *existing = article.clone(),
                None => state.articles.push(article.clone()),
            }
        })
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, StorageError> {
        self.mutate(|state| {
            let before = state.articles.len();
            state.articles.retain(|a| a.id != *id);
            state.articles.len() < before
        })
    }

    async fn count_by_category(&self, category_name: &str) -> Result<u64, StorageError> {
        self.read(|state| {
            state
                .articles
                .iter()
                .filter(|a| a.category == category_name)
                .count() as u64
        })
    }

    async fn reassign_category(&self, from: &str, to: &str) -> Result<u64, StorageError> {
        self.mutate(|state| {
            let mut updated = 0;
            for article in &mut state.articles {
                if article.category == from {
                    article.category = to.to_owned();
                    updated += 1;
                }
            }
            updated
        })
    }
}

#[async_trait]
impl CategoryRepository for JsonStore {
    async fn list(&self) -> Result<Vec<Category>, StorageError> {
        self.read(|state| {
            let mut categories = state.categories.clone();
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            categories
        })
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, StorageError> {
        self.read(|state| state.categories.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        self.read(|state| state.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn save(&self, category: &Category) -> Result<(), StorageError> {
        self.mutate(|state| {
            match state.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => *existing = category.clone(),
                None => state.categories.push(category.clone()),
            }
        })
    }

    async fn delete(&self, id: &CategoryId) -> Result<bool, StorageError> {
        self.mutate(|state| {
            let before = state.categories.len();
            state.categories.retain(|c| c.id != *id);
            state.categories.len() < before
        })
    }
}

#[async_trait]
impl UserRepository for JsonStore {
    async fn list(&self) -> Result<Vec<User>, StorageError> {
        self.read(|state| {
            let mut users = state.users.clone();
            users.sort_by(|a, b| a.name.cmp(&b.name));
            users
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.read(|state| state.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.read(|state| state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), StorageError> {
        self.mutate(|state| {
            match state.users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user.clone(),
                None => state.users.push(user.clone()),
            }
        })
    }

    async fn delete(&self, id: &UserId) -> Result<bool, StorageError> {
        self.mutate(|state| {
            let before = state.users.len();
            state.users.retain(|u| u.id != *id);
            state.users.len() < before
        })
    }

    async fn count(&self) -> Result<u64, StorageError> {
        self.read(|state| state.users.len() as u64)
    }
}

#[async_trait]
impl AdRepository for JsonStore {
    async fn list(&self) -> Result<Vec<Ad>, StorageError> {
        self.read(|state| {
            let mut ads = state.ads.clone();
            ads.sort_by(|a, b| a.title.cmp(&b.title));
            ads
        })
    }

    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, StorageError> {
        self.read(|state| state.ads.iter().find(|a| a.id == *id).cloned())
    }

    async fn save(&self, ad: &Ad) -> Result<(), StorageError> {
        self.mutate(|state| {
            match state.ads.iter_mut().find(|a| a.id == ad.id) {
                Some(existing) => *existing = ad.clone(),
                None => state.ads.push(ad.clone()),
            }
        })
    }

    async fn delete(&self, id: &AdId) -> Result<bool, StorageError> {
        self.mutate(|state| {
            let before = state.ads.len();
            state.ads.retain(|a| a.id != *id);
            state.ads.len() < before
        })
    }
}
