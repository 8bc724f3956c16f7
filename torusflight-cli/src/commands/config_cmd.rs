use std::path::Path;

use anyhow::Context;

use crate::config::load_config;

pub fn run(config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let text = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    print!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use torusflight_shared::SceneConfig;

    #[test]
    fn test_printed_config_reloads() {
        let text = toml::to_string_pretty(&SceneConfig::default()).unwrap();
        assert!(text.contains("[torus]"));
        let parsed: SceneConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, SceneConfig::default());
    }
}
