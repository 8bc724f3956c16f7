use std::path::Path;

use anyhow::Context;
use torusflight_shared::SceneConfig;

/// Load a scene configuration, or the defaults when no path is given.
/// Missing sections and fields fall back to their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    let config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str::<SceneConfig>(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => SceneConfig::default(),
    };
    config.validate().context("Invalid scene configuration")?;
    Ok(config)
}

/// Load a configuration and apply the command-line seed override.
pub fn load_with_seed(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<SceneConfig> {
    let mut config = load_config(path)?;
    if let Some(seed) = seed {
        config.stars.seed = seed;
    }
    Ok(config)
}
