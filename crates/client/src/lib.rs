//! Upstream HTTP clients for wikilink.
//!
//! This crate provides the MediaWiki search/random client, the path-finding
//! service client and the Vault secrets broker used by the server.

mod http;
pub mod path;
pub mod vault;
pub mod wiki;

pub use path::{PathClient, PathConfig};
pub use vault::{VaultAuth, VaultBroker, VaultConfig};
pub use wiki::{WikiClient, WikiConfig};
