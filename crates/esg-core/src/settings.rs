use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::EsgError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: String::new(),
            api_key: String::new(),
            model: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    /// Layer environment overrides on top of file settings.
    ///
    /// `GEMINI_API_KEY` alone is enough to switch the service to the Google
    /// backend.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = env("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.provider = "google".to_string();
            self.api_key = key;
            if self.model.is_empty() {
                self.model = DEFAULT_GEMINI_MODEL.to_string();
            }
        }
        if let Some(provider) = env("ESG_AI_PROVIDER").filter(|p| !p.is_empty()) {
            self.provider = provider;
        }
        if let Some(model) = env("ESG_AI_MODEL").filter(|m| !m.is_empty()) {
            self.model = model;
        }
        if let Some(secs) = env("ESG_AI_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        self
    }
}

/// Resolve the settings directory (~/.esg-report/).
fn settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".esg-report")
}

fn settings_path() -> PathBuf {
    settings_dir().join("settings.json")
}

/// Read AI settings from disk, then apply environment overrides.
/// A missing or unreadable file falls back to defaults.
pub fn read_settings() -> AiSettings {
    let path = settings_path();
    let from_file = if path.exists() {
        fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    } else {
        AiSettings::default()
    };
    from_file.with_env(|k| std::env::var(k).ok())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

// --- Server Settings ---

/// Store directory from `ESG_DATA_DIR`, defaulting to `./data`.
pub fn data_dir_from_env(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env("ESG_DATA_DIR")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Listen address from `ESG_BIND_ADDR`, defaulting to `127.0.0.1:3000`.
pub fn bind_addr_from_env(env: impl Fn(&str) -> Option<String>) -> Result<SocketAddr, EsgError> {
    let bind = env("ESG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    bind.parse()
        .map_err(|_| EsgError::validation("ESG_BIND_ADDR", format!("invalid address: {bind}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn gemini_key_enables_google_backend() {
        let settings = AiSettings::default().with_env(env_of(&[("GEMINI_API_KEY", "secret")]));
        assert_eq!(settings.provider, "google");
        assert_eq!(settings.model, DEFAULT_GEMINI_MODEL);
        assert!(ai_configured(&settings));
    }

    #[test]
    fn no_env_means_template_mode() {
        let settings = AiSettings::default().with_env(env_of(&[]));
        assert!(!ai_configured(&settings));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn ollama_needs_no_key() {
        let settings = AiSettings::default().with_env(env_of(&[
            ("ESG_AI_PROVIDER", "ollama"),
            ("ESG_AI_MODEL", "llama3"),
            ("ESG_AI_TIMEOUT_SECS", "5"),
        ]));
        assert!(ai_configured(&settings));
        assert_eq!(settings.timeout_secs, 5);
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let settings: AiSettings =
            serde_json::from_str(r#"{"provider":"openai","model":"gpt-4o-mini"}"#).unwrap();
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!ai_configured(&settings));
    }

    #[test]
    fn server_env_defaults_and_overrides() {
        assert_eq!(data_dir_from_env(env_of(&[])), PathBuf::from("data"));
        assert_eq!(bind_addr_from_env(env_of(&[])).unwrap().port(), 3000);

        let custom = env_of(&[
            ("ESG_DATA_DIR", "/var/lib/esg"),
            ("ESG_BIND_ADDR", "0.0.0.0:8080"),
        ]);
        assert_eq!(data_dir_from_env(&custom), PathBuf::from("/var/lib/esg"));
        assert_eq!(bind_addr_from_env(&custom).unwrap().port(), 8080);
    }

    #[test]
    fn bad_bind_addr_does_not_affect_data_dir() {
        let env = env_of(&[("ESG_DATA_DIR", "/srv/esg"), ("ESG_BIND_ADDR", "nowhere")]);
        assert!(bind_addr_from_env(&env).unwrap_err().is_validation());
        assert_eq!(data_dir_from_env(&env), PathBuf::from("/srv/esg"));
    }
}
