//! Editorial workflow service.
//!
//! Implements the article state machine (draft, submitted, published) and
//! every role-gated transition over it. All capability decisions go through
//! [`Role::has_capability`]; handlers never re-derive permissions.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::article::{validate_category_name, validate_content, validate_title};
use crate::domain::media::resolve_inline;
use crate::domain::ports::{ArticleRepository, CategoryRepository, MediaStore, StorageError};
use crate::domain::{
    Article, ArticleId, ArticleStatus, ArticleValidationError, Capability, Error, Role, User,
};

/// Fields supplied when creating a draft.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub video_url: Option<String>,
    /// Requested initial status; coerced by the same rule as saves.
    pub status: Option<ArticleStatus>,
}

/// Partial update merged into a stored article.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Requested status; subject to capability coercion.
    pub status: Option<ArticleStatus>,
}

/// Article workflow use-cases over the persistence and media ports.
#[derive(Clone)]
pub struct EditorialService {
    articles: Arc<dyn ArticleRepository>,
    categories: Arc<dyn CategoryRepository>,
    media: Arc<dyn MediaStore>,
}

impl EditorialService {
    /// Create a new service over the given collaborators.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        categories: Arc<dyn CategoryRepository>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            articles,
            categories,
            media,
        }
    }

    /// List articles visible to `viewer`.
    ///
    /// Anonymous readers see published articles only; any authenticated
    /// user sees the full workflow (the dashboard view).
    pub async fn list(&self, viewer: Option<&User>) -> Result<Vec<Article>, Error> {
        let mut articles = self.articles.list().await.map_err(map_storage_error)?;
        if viewer.is_none() {
            articles.retain(|article| article.status == ArticleStatus::Published);
        }
        Ok(articles)
    }

    /// Fetch a single article visible to `viewer`.
    pub async fn get(&self, viewer: Option<&User>, id: &ArticleId) -> Result<Article, Error> {
        let article = self.fetch(id).await?;
        if viewer.is_none() && article.status != ArticleStatus::Published {
            return Err(Error::not_found(format!("no article with id {id}")));
        }
        Ok(article)
    }

    /// Create a draft authored by `actor`.
    ///
    /// Every role may draft. Author name and avatar are snapshotted here
    /// and not live-synced afterwards.
    pub async fn create_draft(&self, actor: &User, new: NewArticle) -> Result<Article, Error> {
        validate_title(&new.title).map_err(map_validation_error)?;
        validate_content(&new.content).map_err(map_validation_error)?;
        validate_category_name(&new.category).map_err(map_validation_error)?;
        self.ensure_category_exists(&new.category).await?;

        let image_url = resolve_inline(self.media.as_ref(), new.image_url).await;
        let status = new
            .status
            .map_or(ArticleStatus::Draft, |requested| {
                coerce_status(actor.role, requested)
            });
        let now = Utc::now();
        let article = Article {
            id: ArticleId::random(),
            title: new.title,
            excerpt: new.excerpt,
            content: new.content,
            category: new.category,
            image_url,
            video_url: new.video_url,
            author_id: actor.id,
            author_name: actor.name.clone(),
            author_avatar: actor.avatar_url.clone(),
            status,
            created_at: now,
            updated_at: now,
        };
        self.articles
            .save(&article)
            .await
            .map_err(map_storage_error)?;
        Ok(article)
    }

    /// Merge `changes` into an existing article.
    ///
    /// Admins may edit anything; everyone else only their own articles. A
    /// contributor is locked out once the article leaves `Draft`.
    pub async fn update(
        &self,
        actor: &User,
        id: &ArticleId,
        changes: ArticleChanges,
    ) -> Result<Article, Error> {
        let mut article = self.fetch(id).await?;
        ensure_can_edit(actor, &article)?;

        if let Some(category) = &changes.category {
            validate_category_name(category).map_err(map_validation_error)?;
            self.ensure_category_exists(category).await?;
            article.category = category.clone();
        }
        if let Some(title) = changes.title {
            validate_title(&title).map_err(map_validation_error)?;
            article.title = title;
        }
        if let Some(content) = changes.content {
            validate_content(&content).map_err(map_validation_error)?;
            article.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            article.excerpt = excerpt;
        }
        if let Some(image_url) = changes.image_url {
            article.image_url = resolve_inline(self.media.as_ref(), image_url).await;
        }
        if let Some(video_url) = changes.video_url {
            article.video_url = Some(video_url);
        }
        if let Some(requested) = changes.status {
            article.status = coerce_status(actor.role, requested);
        }
        article.updated_at = Utc::now();
        self.articles
            .save(&article)
            .await
            .map_err(map_storage_error)?;
        Ok(article)
    }

    /// Hand a draft over for editorial review.
    pub async fn submit(&self, actor: &User, id: &ArticleId) -> Result<Article, Error> {
        require_capability(actor, Capability::SubmitForReview)?;
        let mut article = self.fetch(id).await?;
        if actor.id != article.author_id {
            return Err(Error::forbidden(
                "only the author may submit an article for review",
            ));
        }
        if article.status != ArticleStatus::Draft {
            return Err(invalid_transition(&article, "submitted"));
        }
        article.status = ArticleStatus::Submitted;
        article.updated_at = Utc::now();
        self.articles
            .save(&article)
            .await
            .map_err(map_storage_error)?;
        Ok(article)
    }

    /// Publish a draft or submitted article.
    pub async fn publish(&self, actor: &User, id: &ArticleId) -> Result<Article, Error> {
        require_capability(actor, Capability::Publish)?;
        let mut article = self.fetch(id).await?;
        if article.status == ArticleStatus::Published {
            return Err(invalid_transition(&article, "published"));
        }
        article.status = ArticleStatus::Published;
        article.updated_at = Utc::now();
        self.articles
            .save(&article)
            .await
            .map_err(map_storage_error)?;
        Ok(article)
    }

    /// Withdraw a published article back to draft.
    pub async fn unpublish(&self, actor: &User, id: &ArticleId) -> Result<Article, Error> {
        require_capability(actor, Capability::Publish)?;
        let mut article = self.fetch(id).await?;
        if article.status != ArticleStatus::Published {
            return Err(invalid_transition(&article, "unpublished"));
        }
        article.status = ArticleStatus::Draft;
        article.updated_at = Utc::now();
        self.articles
            .save(&article)
            .await
            .map_err(map_storage_error)?;
        Ok(article)
    }

    /// Permanently delete an article. No soft delete.
    pub async fn delete(&self, actor: &User, id: &ArticleId) -> Result<(), Error> {
        require_capability(actor, Capability::DeleteArticle)?;
        let removed = self
            .articles
            .delete(id)
            .await
            .map_err(map_storage_error)?;
        if !removed {
            return Err(Error::not_found(format!("no article with id {id}")));
        }
        Ok(())
    }

    async fn fetch(&self, id: &ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_storage_error)?
            .ok_or_else(|| Error::not_found(format!("no article with id {id}")))
    }

    async fn ensure_category_exists(&self, name: &str) -> Result<(), Error> {
        let found = self
            .categories
            .find_by_name(name)
            .await
            .map_err(map_storage_error)?;
        if found.is_none() {
            return Err(Error::invalid_request(format!("unknown category: {name}"))
                .with_details(json!({ "field": "category", "code": "unknown_category" })));
        }
        Ok(())
    }
}

/// Apply the capability coercion rule to a requested status.
///
/// An actor without the `Publish` capability can never store `Published`;
/// the request is downgraded to `Submitted` rather than refused, matching
/// the save-time behaviour contributors expect.
fn coerce_status(role: Role, requested: ArticleStatus) -> ArticleStatus {
    if requested == ArticleStatus::Published && !role.has_capability(Capability::Publish) {
        return ArticleStatus::Submitted;
    }
    requested
}

fn ensure_can_edit(actor: &User, article: &Article) -> Result<(), Error> {
    if actor.role != Role::Admin && actor.id != article.author_id {
        return Err(Error::forbidden(
            "only the author or an admin may edit this article",
        ));
    }
    if actor.role == Role::Contributor && article.status != ArticleStatus::Draft {
        return Err(Error::locked(format!(
            "article is {} and can no longer be edited by its contributor",
            article.status
        )));
    }
    Ok(())
}

fn require_capability(actor: &User, capability: Capability) -> Result<(), Error> {
    if actor.role.has_capability(capability) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "role {} lacks the required capability",
        actor.role
    )))
}

fn invalid_transition(article: &Article, action: &str) -> Error {
    Error::invalid_request(format!(
        "a {} article cannot be {action}",
        article.status
    ))
    .with_details(json!({ "status": article.status.as_str() }))
}

fn map_storage_error(error: StorageError) -> Error {
    Error::storage(error.to_string())
}

fn map_validation_error(error: ArticleValidationError) -> Error {
    let field = match error {
        ArticleValidationError::EmptyTitle => "title",
        ArticleValidationError::EmptyContent => "content",
        ArticleValidationError::EmptyCategory => "category",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

#[cfg(test)]
#[path = "editorial_service_tests.rs"]
mod tests;
