//! Application configuration and initial view selection

use std::path::PathBuf;

use beadchain_ipc::ViewMode;
use bevy::prelude::*;

/// Environment variable selecting the view the editor opens in
pub const VIEW_ENV: &str = "BEADCHAIN_VIEW";

/// Environment variable naming a JSON catalog file loaded at startup
pub const CATALOG_ENV: &str = "BEADCHAIN_CATALOG";

/// Parse a view name, case-insensitively
pub fn parse_view_mode(value: &str) -> Option<ViewMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "flat" => Some(ViewMode::Flat),
        "hanging" => Some(ViewMode::Hanging),
        _ => None,
    }
}

/// Application configuration resource
#[derive(Resource, Debug, Clone, Default)]
pub struct BeadchainConfig {
    pub initial_view: ViewMode,
    pub catalog_path: Option<PathBuf>,
}

impl BeadchainConfig {
    /// Read overrides from the environment
    pub fn from_env() -> Self {
        let initial_view = match std::env::var(VIEW_ENV) {
            Ok(value) => parse_view_mode(&value).unwrap_or_else(|| {
                warn!("Ignoring unknown {} value {:?}", VIEW_ENV, value);
                ViewMode::default()
            }),
            Err(_) => ViewMode::default(),
        };
        let catalog_path = std::env::var_os(CATALOG_ENV).map(PathBuf::from);
        Self {
            initial_view,
            catalog_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_mode() {
        assert_eq!(parse_view_mode("flat"), Some(ViewMode::Flat));
        assert_eq!(parse_view_mode(" Hanging "), Some(ViewMode::Hanging));
        assert_eq!(parse_view_mode("sideways"), None);
    }

    #[test]
    fn test_default_view_is_flat() {
        let config = BeadchainConfig::default();
        assert_eq!(config.initial_view, ViewMode::Flat);
        assert!(config.catalog_path.is_none());
    }
}
