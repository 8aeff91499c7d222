//! Backend entry-point: reads environment configuration and starts the
//! HTTP server.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::server::{ServerConfig, run};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = match env::var("BIND_ADDR") {
        Ok(raw) => raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))?,
        Err(_) => SocketAddr::from(([0, 0, 0, 0], 8080)),
    };

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Ok(dir) = env::var("DATA_DIR") {
        config = config.with_data_dir(PathBuf::from(dir));
    }
    if let Ok(dir) = env::var("MEDIA_DIR") {
        config = config.with_media_dir(PathBuf::from(dir));
    }
    if env::var("SEED_BOOTSTRAP_DATA").ok().as_deref() == Some("1") {
        config = config.with_bootstrap_seed();
    }

    run(config).await
}
