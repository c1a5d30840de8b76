//! Editor configuration (`blockdoc.config.json`)

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::EditorError;
use crate::pagination::{PageLimits, SplitPolicy};

pub const DEFAULT_CONFIG_NAME: &str = "blockdoc.config.json";

/// How the document surface is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Fixed-height pages with automatic overflow splitting
    #[default]
    Paginated,

    /// One unbounded page, no splitting
    Continuous,
}

/// Engine tuning, every field optional in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub view_mode: ViewMode,

    /// Content height of a page in pixels
    pub page_content_height: f32,

    /// Height reserved for the title on the first page
    pub title_height: f32,

    /// Height assumed for blocks that have not been measured yet
    pub default_block_height: f32,

    /// Minimum space left on a page for a split to happen
    pub min_split_space: f32,

    /// Chars each half of a split must exceed
    pub split_margin_chars: usize,

    /// Height changes below this are ignored
    pub height_epsilon: f32,

    /// Blocks listed in the drag preview
    pub drag_preview_limit: usize,

    /// Maximum history snapshots, 0 for unlimited
    pub history_limit: usize,

    /// Seed for generated block ids
    pub id_seed: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Paginated,
            page_content_height: 950.0,
            title_height: 150.0,
            default_block_height: 24.0,
            min_split_space: 50.0,
            split_margin_chars: 5,
            height_epsilon: 2.0,
            drag_preview_limit: 3,
            history_limit: 0,
            id_seed: "blockdoc".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, or defaults when there is no config file
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config = serde_json::from_str(&content).map_err(|source| EditorError::Config {
            path: config_path.clone(),
            source,
        })?;

        info!(path = %config_path.display(), "Loaded editor config");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Page budgets for the configured view mode
    pub fn page_limits(&self) -> PageLimits {
        match self.view_mode {
            ViewMode::Paginated => PageLimits::with_title(self.page_content_height, self.title_height),
            ViewMode::Continuous => PageLimits::unbounded(),
        }
    }

    pub fn split_policy(&self) -> SplitPolicy {
        SplitPolicy {
            min_split_space: self.min_split_space,
            margin_chars: self.split_margin_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = EditorConfig::from_json(
            r#"{
                "viewMode": "continuous",
                "pageContentHeight": 800,
                "historyLimit": 50
            }"#,
        )
        .unwrap();

        assert_eq!(config.view_mode, ViewMode::Continuous);
        assert_eq!(config.page_content_height, 800.0);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.title_height, 150.0);
        assert_eq!(config.id_seed, "blockdoc");
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.page_limits(), PageLimits::new(950.0, 800.0));
        assert_eq!(config.split_policy(), SplitPolicy::default());
        assert_eq!(config.drag_preview_limit, 3);
    }

    #[test]
    fn test_continuous_mode_is_unbounded() {
        let config = EditorConfig {
            view_mode: ViewMode::Continuous,
            ..EditorConfig::default()
        };
        assert!(config.page_limits().is_unbounded());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            EditorConfig::from_json("{ nope"),
            Err(EditorError::ConfigJson(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("blockdoc-config-test-missing");
        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
