use std::path::PathBuf;

use dreamshape_app::config::{self, AppConfig, ENV_DATA_DIR, ENV_REMOTE_KEY, ENV_REMOTE_URL};
use serde_json::json;

#[test]
fn v0_config_gains_default_rest() {
    let migrated = config::migrate(
        json!({ "invite_code": "LIFT", "created_at": "2025-01-01T00:00:00Z" }),
        0,
    )
    .unwrap();
    assert_eq!(migrated["default_rest_seconds"], 90);
    assert_eq!(migrated["config_version"], 1);

    let parsed: AppConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(parsed.invite_code, "LIFT");
    assert!(parsed.remote.is_none());
}

#[test]
fn newer_config_is_refused() {
    assert!(config::migrate(json!({}), 99).is_err());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig {
        invite_code: "LIFT".to_string(),
        default_rest_seconds: 120,
        ..AppConfig::default()
    };

    let path = config::save_config_to(dir.path(), &cfg).unwrap();
    assert!(!dir.path().join("config.json.tmp").exists());
    let loaded = config::load_config_from(&path).unwrap();
    assert_eq!(loaded, cfg);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn overrides_replace_remote_and_data_dir() {
    let cfg = AppConfig::default().with_overrides(|key| match key {
        ENV_DATA_DIR => Some("/tmp/ds".to_string()),
        ENV_REMOTE_URL => Some("https://example.supabase.co".to_string()),
        ENV_REMOTE_KEY => Some("anon".to_string()),
        _ => None,
    });

    assert_eq!(cfg.data_dir().unwrap(), PathBuf::from("/tmp/ds"));
    let remote = cfg.remote.unwrap();
    assert_eq!(remote.url, "https://example.supabase.co");
    assert_eq!(remote.api_key, "anon");
}

#[test]
fn url_without_key_needs_an_existing_remote() {
    let cfg = AppConfig::default()
        .with_overrides(|key| (key == ENV_REMOTE_URL).then(|| "https://x".to_string()));
    assert!(cfg.remote.is_none());
}
