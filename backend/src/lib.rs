//! Masthead backend library modules.
//!
//! A newsroom publishing backend: the editorial workflow and
//! role-permission core lives in [`domain`], persistence and media
//! adapters in [`outbound`], and the HTTP surface in [`inbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seed;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::RequestId;
