// FamilyBook - Core Library
// Family networks, reciprocal relationships and shortest relationship chains.
// Exposes all modules for use in the CLI, the API server, and tests.

pub mod relationship;
pub mod member;
pub mod graph;
pub mod chain;
pub mod network;
pub mod store;
pub mod db;
pub mod service;
pub mod import;
pub mod config;
pub mod error;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use relationship::RelationshipType;
pub use member::{Member, MemberAttributes};
pub use graph::{Edge, RelationshipGraph};
pub use chain::{ChainLink, ChainResolver, RelationshipChain};
pub use network::{FamilyNetwork, NetworkSummary, CREATOR_ROLE};
pub use store::{InMemoryStore, NetworkStore};
pub use db::{setup_database, verify_count, SqliteStore};
pub use service::FamilyService;
pub use import::{import_relationships, ImportSummary, RelationshipRow};
pub use config::{AppConfig, ConfigError, StorageKind};
pub use error::{FamilyError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by both binaries.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
