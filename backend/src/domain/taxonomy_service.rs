//! Category taxonomy service.
//!
//! Articles reference categories by denormalized name, so renames and
//! deletions must cascade explicitly over the article store. The ordering
//! contract: a delete only removes the category row after every dependent
//! article has been reassigned, and a rename reports a failed bulk step
//! instead of hiding the partial state.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::ports::{ArticleRepository, CategoryRepository, StorageError};
use crate::domain::{
    Capability, Category, CategoryId, CategoryValidationError, Error, User,
};

/// Category management use-cases over the persistence ports.
#[derive(Clone)]
pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
    articles: Arc<dyn ArticleRepository>,
}

impl TaxonomyService {
    /// Create a new service over the given repositories.
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        articles: Arc<dyn ArticleRepository>,
    ) -> Self {
        Self {
            categories,
            articles,
        }
    }

    /// List every category. Public; the reader navigation consumes this.
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        self.categories.list().await.map_err(map_storage_error)
    }

    /// Create a category with a derived slug.
    pub async fn create(&self, actor: &User, name: &str) -> Result<Category, Error> {
        require_manage(actor)?;
        let category = Category::try_new(name).map_err(map_validation_error)?;
        self.ensure_name_free(&category.name, None).await?;
        self.categories
            .save(&category)
            .await
            .map_err(map_storage_error)?;
        Ok(category)
    }

    /// Rename a category and cascade the new name over every referencing
    /// article.
    ///
    /// The category row is updated first; if the bulk reassignment then
    /// fails, the partial state is reported as a storage failure whose
    /// details name the incomplete phase so the caller can retry or
    /// reconcile.
    pub async fn rename(
        &self,
        actor: &User,
        id: &CategoryId,
        new_name: &str,
    ) -> Result<Category, Error> {
        require_manage(actor)?;
        let mut category = self.fetch(id).await?;
        let old_name = category.name.clone();
        if old_name == new_name {
            return Ok(category);
        }
        self.ensure_name_free(new_name, Some(id)).await?;
        category.rename(new_name).map_err(map_validation_error)?;
        self.categories
            .save(&category)
            .await
            .map_err(map_storage_error)?;

        let reassigned = self
            .articles
            .reassign_category(&old_name, &category.name)
            .await
            .map_err(|error| cascade_failure(error, &category, &old_name))?;
        info!(
            category = %category.name,
            previous = %old_name,
            reassigned,
            "category rename cascaded"
        );
        Ok(category)
    }

    /// Delete a category.
    ///
    /// Refused with `HasDependents` while articles still reference the
    /// category's name and no `reassign_to` target is given. With a target,
    /// every dependent article is reassigned before the row is removed.
    pub async fn delete(
        &self,
        actor: &User,
        id: &CategoryId,
        reassign_to: Option<&str>,
    ) -> Result<(), Error> {
        require_manage(actor)?;
        let category = self.fetch(id).await?;
        let dependents = self
            .articles
            .count_by_category(&category.name)
            .await
            .map_err(map_storage_error)?;

        if dependents > 0 {
            let Some(target) = reassign_to else {
                return Err(Error::has_dependents(format!(
                    "{dependents} article(s) still reference category {}",
                    category.name
                ))
                .with_details(json!({ "articleCount": dependents })));
            };
            self.ensure_reassign_target(&category, target).await?;
            let reassigned = self
                .articles
                .reassign_category(&category.name, target)
                .await
                .map_err(map_storage_error)?;
            info!(
                category = %category.name,
                target,
                reassigned,
                "dependent articles reassigned before category delete"
            );
        }

        let removed = self
            .categories
            .delete(id)
            .await
            .map_err(map_storage_error)?;
        if !removed {
            return Err(Error::not_found(format!("no category with id {id}")));
        }
        Ok(())
    }

    async fn fetch(&self, id: &CategoryId) -> Result<Category, Error> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(map_storage_error)?
            .ok_or_else(|| Error::not_found(format!("no category with id {id}")))
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        renaming: Option<&CategoryId>,
    ) -> Result<(), Error> {
        let existing = self
            .categories
            .find_by_name(name)
            .await
            .map_err(map_storage_error)?;
        match existing {
            Some(category) if Some(&category.id) != renaming => {
                Err(Error::invalid_request(format!(
                    "a category named {name} already exists"
                ))
                .with_details(json!({ "field": "name", "code": "duplicate_name" })))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_reassign_target(
        &self,
        category: &Category,
        target: &str,
    ) -> Result<(), Error> {
        if target == category.name {
            return Err(Error::invalid_request(
                "articles cannot be reassigned to the category being deleted",
            ));
        }
        let found = self
            .categories
            .find_by_name(target)
            .await
            .map_err(map_storage_error)?;
        if found.is_none() {
            return Err(Error::invalid_request(format!(
                "unknown reassignment target: {target}"
            ))
            .with_details(json!({ "field": "reassignTo", "code": "unknown_category" })));
        }
        Ok(())
    }
}

fn require_manage(actor: &User) -> Result<(), Error> {
    if actor.role.has_capability(Capability::ManageCategories) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "role {} may not manage categories",
        actor.role
    )))
}

fn cascade_failure(error: StorageError, category: &Category, old_name: &str) -> Error {
    Error::storage(format!(
        "category row renamed but article reassignment failed: {error}"
    ))
    .with_details(json!({
        "phase": "articleReassignment",
        "categoryId": category.id,
        "oldName": old_name,
        "newName": category.name,
    }))
}

fn map_storage_error(error: StorageError) -> Error {
    Error::storage(error.to_string())
}

fn map_validation_error(error: CategoryValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": "name" }))
}

#[cfg(test)]
#[path = "taxonomy_service_tests.rs"]
mod tests;
