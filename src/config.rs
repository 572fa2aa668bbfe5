use std::env;

use crate::domain::pagination::DEFAULT_PAGE_LIMIT;

/// Largest page a client may request unless configured otherwise.
pub const DEFAULT_MAX_PAGE_LIMIT: usize = 100;

/// Paging settings shared by every catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Page size used when a request does not specify one.
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Read `CATALOG_DEFAULT_LIMIT` and `CATALOG_MAX_LIMIT`, falling back to
    /// the defaults for missing or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_limit = read_usize("CATALOG_DEFAULT_LIMIT").unwrap_or(defaults.default_limit);
        let max_limit = read_usize("CATALOG_MAX_LIMIT").unwrap_or(defaults.max_limit);

        Self {
            default_limit: default_limit.min(max_limit),
            max_limit,
        }
    }
}

fn read_usize(key: &str) -> Option<usize> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid {key} value `{raw}`");
            None
        }
    }
}
