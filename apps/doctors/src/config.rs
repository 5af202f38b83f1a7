use std::{fs, path::Path};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "doctors.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: Option<String>,
    pub cache_url: String,
    pub viewport_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            cache_url: "sqlite://./data/doctors_cache.db".into(),
            viewport_width: 1280,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    cache_url: Option<String>,
    viewport_width: Option<u32>,
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(Path::new(SETTINGS_FILE)).ok();
    layered_settings(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then the environment. Later layers win.
fn layered_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = Some(v);
                }
                if let Some(v) = file_cfg.cache_url {
                    settings.cache_url = v;
                }
                if let Some(v) = file_cfg.viewport_width {
                    settings.viewport_width = v;
                }
            }
            Err(err) => warn!("ignoring malformed {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("DOCTORS_SERVER_URL") {
        settings.server_url = Some(v);
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = Some(v);
    }

    if let Some(v) = env("DOCTORS_CACHE_URL") {
        settings.cache_url = v;
    }
    if let Some(v) = env("APP__CACHE_URL") {
        settings.cache_url = v;
    }

    if let Some(v) = env("APP__VIEWPORT_WIDTH") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.viewport_width = parsed,
            Err(_) => warn!("ignoring non-numeric APP__VIEWPORT_WIDTH '{v}'"),
        }
    }

    settings.server_url = settings
        .server_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    settings
}

/// Turns a bare path or `sqlite:` shorthand into a URL sqlx accepts.
pub fn normalize_cache_url(raw_cache_url: &str) -> String {
    let raw_cache_url = raw_cache_url.trim();

    if raw_cache_url.is_empty() {
        return Settings::default().cache_url;
    }

    if raw_cache_url.starts_with("sqlite::memory:") || raw_cache_url.contains("://") {
        return raw_cache_url.to_string();
    }

    if let Some(path) = raw_cache_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_cache_url.replace('\\', "/"))
}
