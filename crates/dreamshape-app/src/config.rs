use std::path::{Path, PathBuf};

use dreamshape_core::models::workout::DEFAULT_REST_SECONDS;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const APP_DIR: &str = "dreamshape";

pub const ENV_DATA_DIR: &str = "DREAMSHAPE_DATA_DIR";
pub const ENV_REMOTE_URL: &str = "DREAMSHAPE_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "DREAMSHAPE_REMOTE_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    /// Shared code required to create an account.
    #[serde(default)]
    pub invite_code: String,
    /// Added in v1.
    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,
    pub created_at: jiff::Timestamp,
}

/// Hosted backend endpoint. The key is the public anon key, not a secret
/// per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
}

fn default_rest_seconds() -> u32 {
    DEFAULT_REST_SECONDS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            data_dir: None,
            remote: None,
            invite_code: String::new(),
            default_rest_seconds: DEFAULT_REST_SECONDS,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl AppConfig {
    /// Apply `DREAMSHAPE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `var`.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        match (var(ENV_REMOTE_URL), var(ENV_REMOTE_KEY)) {
            (Some(url), Some(api_key)) => self.remote = Some(RemoteConfig { url, api_key }),
            (Some(url), None) => {
                if let Some(remote) = &mut self.remote {
                    remote.url = url;
                } else {
                    tracing::warn!("{ENV_REMOTE_URL} set without {ENV_REMOTE_KEY}; ignoring");
                }
            }
            (None, Some(api_key)) => {
                if let Some(remote) = &mut self.remote {
                    remote.api_key = api_key;
                }
            }
            (None, None) => {}
        }
        self
    }

    /// Where the local store lives.
    pub fn data_dir(&self) -> eyre::Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
        Ok(base.join(APP_DIR))
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load from the default location, or defaults when no file exists yet.
pub fn load_or_default() -> eyre::Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AppConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update dreamshape."
        ));
    }

    // v0 → v1: add default_rest_seconds
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("default_rest_seconds")
            .or_insert(serde_json::Value::Number(DEFAULT_REST_SECONDS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added default_rest_seconds)");
    }

    Ok(json)
}

pub fn save_config(config: &AppConfig) -> eyre::Result<PathBuf> {
    save_config_to(&config_dir()?, config)
}

pub fn save_config_to(dir: &Path, config: &AppConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}
