use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use anyhow::Context;
use content_client::DEFAULT_API_URL;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "sitegen.toml";
pub const DEFAULT_PUBLIC_URL: &str = "https://mayaadrenaline.com.mx";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Where content is fetched from during the build.
    pub api_url: String,
    /// Public origin of the site, used for fallback asset URLs.
    pub public_url: String,
    pub out_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            public_url: DEFAULT_PUBLIC_URL.into(),
            out_dir: PathBuf::from("./out"),
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the optional config file, then environment variables.
///
/// `WP_BUILD_URL` beats `NEXT_PUBLIC_API_URL` for fetching, while the public
/// URL only follows `NEXT_PUBLIC_API_URL`. `APP__*` variables override both.
/// Empty values are ignored at every layer.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            let file_value = |key: &str| file_cfg.get(key).filter(|v| !v.trim().is_empty());
            if let Some(v) = file_value("api_url") {
                settings.api_url = v.clone();
            }
            if let Some(v) = file_value("public_url") {
                settings.public_url = v.clone();
            }
            if let Some(v) = file_value("out_dir") {
                settings.out_dir = PathBuf::from(v);
            }
            if let Some(v) = file_value("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("NEXT_PUBLIC_API_URL") {
        settings.api_url = v.clone();
        settings.public_url = v;
    }
    if let Some(v) = env("WP_BUILD_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__PUBLIC_URL") {
        settings.public_url = v;
    }
    if let Some(v) = env("APP__OUT_DIR") {
        settings.out_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__LOG") {
        settings.log_filter = v;
    }

    settings
}

/// Creates the export directory (and parents) if needed.
pub fn prepare_out_dir(out_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| {
        format!(
            "failed to create export directory '{}'",
            out_dir.display()
        )
    })?;
    Ok(out_dir.to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
