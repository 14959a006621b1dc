//! Runtime configuration
//!
//! Paths and engine tuning resolved from the environment.

use std::path::{Path, PathBuf};

use crate::engine::EngineConfig;

pub const DATABASE_PATH_ENV: &str = "MACROMENU_DATABASE_PATH";
pub const CATALOG_PATH_ENV: &str = "MACROMENU_CATALOG_PATH";

/// Settings shared by the server and the command-line tools
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// Catalog file; the built-in catalog when `None`
    pub catalog_path: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            catalog_path: std::env::var(CATALOG_PATH_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            engine: EngineConfig::from_env(),
        }
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }
}

/// Get the database path from environment or use default
fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

/// `<project>/data/macromenu.db`, found relative to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("macromenu.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_shape() {
        let path = default_database_path();
        assert!(path.ends_with("data/macromenu.db"));
    }
}
