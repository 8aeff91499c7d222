//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) media_dir: Option<PathBuf>,
    pub(crate) seed_bootstrap_data: bool,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            data_dir: None,
            media_dir: None,
            seed_bootstrap_data: false,
        }
    }

    /// Persist data as a JSON document under this directory.
    ///
    /// Without a data directory the server runs on the in-memory store and
    /// loses state on restart.
    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    /// Store uploaded media under this directory.
    ///
    /// Without a media directory uploads fail fast and callers fall back to
    /// inline content.
    #[must_use]
    pub fn with_media_dir(mut self, dir: PathBuf) -> Self {
        self.media_dir = Some(dir);
        self
    }

    /// Seed a bootstrap admin and starter categories into an empty store.
    #[must_use]
    pub fn with_bootstrap_seed(mut self) -> Self {
        self.seed_bootstrap_data = true;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
