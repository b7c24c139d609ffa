use aloc::LayerFilter;
use anyhow::Context;
use std::env;

/// Subdirectory next to a scenario JSON that holds its `.aloc` files
pub const DEFAULT_ALOC_DIR_NAME: &str = "aloc";

/// Configuration for the aloctool binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Layers whose records never count as collidable.
    pub excluded_layers: LayerFilter,
    /// Name of the `.aloc` directory resolved against the scenario's directory.
    pub aloc_dir_name: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            excluded_layers: LayerFilter::default(),
            aloc_dir_name: DEFAULT_ALOC_DIR_NAME.to_string(),
        }
    }
}

impl ToolConfig {
    /// Builds a configuration from `ALOC_EXCLUDED_LAYERS` and `ALOC_DIR_NAME`,
    /// falling back to no exclusions and `aloc`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let excluded_layers = match lookup("ALOC_EXCLUDED_LAYERS") {
            Some(list) => list
                .parse()
                .with_context(|| format!("invalid ALOC_EXCLUDED_LAYERS value {list:?}"))?,
            None => LayerFilter::default(),
        };
        let aloc_dir_name = lookup("ALOC_DIR_NAME")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_ALOC_DIR_NAME.to_string());

        Ok(Self {
            excluded_layers,
            aloc_dir_name,
        })
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(mut self, excluded_layers: Option<LayerFilter>) -> Self {
        if let Some(filter) = excluded_layers {
            self.excluded_layers = filter;
        }
        self
    }
}
