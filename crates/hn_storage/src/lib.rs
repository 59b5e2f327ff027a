use std::sync::Arc;

use hn_core::{MetadataStore, Result};

pub mod backends;
pub mod preferences;

pub use backends::*;
pub use preferences::{Theme, ThemeStore};

/// Build a metadata store by backend name.
pub fn create_store(kind: &str) -> Result<Arc<dyn MetadataStore>> {
    match kind {
        "memory" => Ok(Arc::new(InMemoryMetadataStore::new())),
        other => Err(hn_core::Error::Storage(format!(
            "Unknown metadata store backend: {}",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::preferences::{Theme, ThemeStore};
}
