//! Ad management service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::ad::validate_ad_fields;
use crate::domain::media::resolve_inline;
use crate::domain::ports::{AdRepository, MediaStore, StorageError};
use crate::domain::{
    Ad, AdFormat, AdId, AdPlacement, AdValidationError, Capability, Error, User,
};

/// Fields supplied when creating an ad.
#[derive(Debug, Clone)]
pub struct NewAd {
    pub title: String,
    pub placement: AdPlacement,
    pub format: AdFormat,
    pub content: String,
    pub link_url: Option<String>,
    pub active: bool,
}

/// Partial update merged into a stored ad.
#[derive(Debug, Clone, Default)]
pub struct AdChanges {
    pub title: Option<String>,
    pub placement: Option<AdPlacement>,
    pub format: Option<AdFormat>,
    pub content: Option<String>,
    pub link_url: Option<String>,
    pub active: Option<bool>,
}

/// Ad inventory use-cases over the persistence and media ports.
#[derive(Clone)]
pub struct AdService {
    ads: Arc<dyn AdRepository>,
    media: Arc<dyn MediaStore>,
}

impl AdService {
    /// Create a new service over the given collaborators.
    pub fn new(ads: Arc<dyn AdRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { ads, media }
    }

    /// List ads currently eligible for display. Public.
    pub async fn list_active(&self) -> Result<Vec<Ad>, Error> {
        let mut ads = self.ads.list().await.map_err(map_storage_error)?;
        ads.retain(|ad| ad.active);
        Ok(ads)
    }

    /// List the full inventory. Management surface only.
    pub async fn list_all(&self, actor: &User) -> Result<Vec<Ad>, Error> {
        require_manage(actor)?;
        self.ads.list().await.map_err(map_storage_error)
    }

    /// Create an ad.
    pub async fn create(&self, actor: &User, new: NewAd) -> Result<Ad, Error> {
        require_manage(actor)?;
        validate_ad_fields(&new.title, &new.content).map_err(map_validation_error)?;
        let content = self.resolve_content(new.format, new.content).await;
        let ad = Ad {
            id: AdId::random(),
            title: new.title,
            placement: new.placement,
            format: new.format,
            content,
            link_url: new.link_url,
            active: new.active,
        };
        self.ads.save(&ad).await.map_err(map_storage_error)?;
        Ok(ad)
    }

    /// Merge `changes` into an existing ad.
    pub async fn update(&self, actor: &User, id: &AdId, changes: AdChanges) -> Result<Ad, Error> {
        require_manage(actor)?;
        let mut ad = self
            .ads
            .find_by_id(id)
            .await
            .map_err(map_storage_error)?
            .ok_or_else(|| Error::not_found(format!("no ad with id {id}")))?;
        if let Some(placement) = changes.placement {
            ad.placement = placement;
        }
        if let Some(format) = changes.format {
            ad.format = format;
        }
        if let Some(title) = changes.title {
            ad.title = title;
        }
        if let Some(content) = changes.content {
            ad.content = self.resolve_content(ad.format, content).await;
        }
        if let Some(link_url) = changes.link_url {
            ad.link_url = Some(link_url);
        }
        if let Some(active) = changes.active {
            ad.active = active;
        }
        validate_ad_fields(&ad.title, &ad.content).map_err(map_validation_error)?;
        self.ads.save(&ad).await.map_err(map_storage_error)?;
        Ok(ad)
    }

    /// Delete an ad.
    pub async fn delete(&self, actor: &User, id: &AdId) -> Result<(), Error> {
        require_manage(actor)?;
        let removed = self.ads.delete(id).await.map_err(map_storage_error)?;
        if !removed {
            return Err(Error::not_found(format!("no ad with id {id}")));
        }
        Ok(())
    }

    /// Image and video content may arrive inline; script markup is stored
    /// verbatim.
    async fn resolve_content(&self, format: AdFormat, content: String) -> String {
        match format {
            AdFormat::Image | AdFormat::Video => {
                resolve_inline(self.media.as_ref(), content).await
            }
            AdFormat::Script => content,
        }
    }
}

fn require_manage(actor: &User) -> Result<(), Error> {
    if actor.role.has_capability(Capability::ManageAds) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "role {} may not manage ads",
        actor.role
    )))
}

fn map_storage_error(error: StorageError) -> Error {
    Error::storage(error.to_string())
}

fn map_validation_error(error: AdValidationError) -> Error {
    let field = match error {
        AdValidationError::EmptyTitle => "title",
        AdValidationError::EmptyContent => "content",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}
