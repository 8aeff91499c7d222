//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::MediaStore;
use crate::domain::{AccountService, AdService, EditorialService, TaxonomyService};
use crate::outbound::media::DirMediaStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub editorial: EditorialService,
    pub taxonomy: TaxonomyService,
    pub accounts: AccountService,
    pub ads: AdService,
    /// Upload target shared with the domain services.
    pub media: Arc<dyn MediaStore>,
    /// Directory store for serving uploads back; absent when uploads are
    /// degraded to inline storage.
    pub media_files: Option<Arc<DirMediaStore>>,
}
