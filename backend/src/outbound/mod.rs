//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing
//! concrete implementations of domain port traits:
//!
//! - **persistence**: in-memory and JSON-file stores behind the repository
//!   ports
//! - **media**: directory-backed media uploads behind the media store port

pub mod media;
pub mod persistence;
