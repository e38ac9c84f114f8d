use crate::domain::models::{Issue, Settings};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// `$ABOUT_CONFIG`, else `$HOME/.config/about/config.toml`.
pub fn settings_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ABOUT_CONFIG") {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/about/config.toml"))
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let Some(path) = settings_path() else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&raw)?;
    tracing::debug!(path = %path.display(), mapped = settings.mapping.len(), "settings loaded");
    Ok(settings)
}

/// The column mapping to apply when `--mapping` is given. Asking for it with
/// no `[mapping]` table configured is reported and falls back to no renaming.
pub fn requested_mapping(
    requested: bool,
    settings: &Settings,
) -> (Option<&BTreeMap<String, String>>, Vec<Issue>) {
    if !requested {
        return (None, vec![]);
    }
    if settings.mapping.is_empty() {
        let shown = settings_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the settings file".to_string());
        return (
            None,
            vec![Issue::warning(format!(
                "--mapping was given but no [mapping] table is configured in {}",
                shown
            ))],
        );
    }
    (Some(&settings.mapping), vec![])
}
