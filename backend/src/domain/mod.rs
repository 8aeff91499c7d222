//! Domain entities, the capability matrix, and the editorial services.
//!
//! Purpose: keep the workflow rules (who may do what, which status
//! transitions are legal, how category renames cascade) in one place,
//! expressed over ports rather than concrete stores. Inbound adapters map
//! requests into these services; outbound adapters implement the ports.

pub mod ports;

mod account_service;
mod ad;
mod ad_service;
mod article;
mod category;
mod editorial_service;
mod error;
mod media;
mod role;
mod slug;
mod taxonomy_service;
mod user;

pub use self::account_service::{AccountService, NewUser, UserChanges};
pub use self::ad::{Ad, AdFormat, AdId, AdPlacement, AdValidationError};
pub use self::ad_service::{AdChanges, AdService, NewAd};
pub use self::article::{Article, ArticleId, ArticleStatus, ArticleValidationError};
pub use self::category::{Category, CategoryId, CategoryValidationError};
pub use self::editorial_service::{ArticleChanges, EditorialService, NewArticle};
pub use self::error::{Error, ErrorCode};
pub use self::media::InlineMedia;
pub use self::role::{Capability, Role};
pub use self::taxonomy_service::TaxonomyService;
pub use self::user::{PasswordDigest, User, UserId, UserValidationError};
