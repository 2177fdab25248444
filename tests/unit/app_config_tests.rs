/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;
use podenhance::app_config::{ApiConfig, Config, CredentialsConfig, LogLevel};

fn valid_config() -> Config {
    Config {
        api: ApiConfig::new("https://aristote.example.org/api", "v1"),
        credentials: CredentialsConfig::new("pod", "secret"),
        disciplines: vec!["Mathematics".to_string()],
        log_level: LogLevel::Info,
    }
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.api.api_version, "v1");
    assert_eq!(config.api.timeout_secs, None);
    assert!(config.api.timeout().is_none());
    assert!(config.api.refresh_on_unauthorized);
    assert_eq!(config.api.token_expiry_margin(), Duration::from_secs(30));
    assert!(config.disciplines.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = valid_config();
    assert!(config.validate().is_ok());

    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.api.base_url = "ftp://aristote.example.org".to_string();
    assert!(config.validate().is_err());
    config.api.base_url = "https://aristote.example.org/api".to_string();

    config.api.api_version = " ".to_string();
    assert!(config.validate().is_err());
    config.api.api_version = "/".to_string();
    assert!(config.validate().is_err());
    config.api.api_version = "api/v2".to_string();
    assert!(config.validate().is_ok());
    config.api.api_version = "v1".to_string();

    config.credentials.client_id.clear();
    assert!(config.validate().is_err());
    config.credentials.client_id = "pod".to_string();

    config.credentials.client_secret.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_default_config_withoutCredentials_shouldFailValidation() {
    assert!(Config::default().validate().is_err());
}

#[test]
fn test_apiConfig_builders_shouldOverrideDefaults() {
    let api = ApiConfig::new("http://localhost:9000/", "v2")
        .with_timeout_secs(7)
        .with_refresh_on_unauthorized(false);

    assert_eq!(api.timeout(), Some(Duration::from_secs(7)));
    assert!(!api.refresh_on_unauthorized);
    assert_eq!(api.trimmed_base_url(), "http://localhost:9000");
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "api": { "base_url": "https://aristote.example.org/api" },
        "credentials": { "client_id": "pod", "client_secret": "s" },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.api.api_version, "v1");
    assert!(config.api.refresh_on_unauthorized);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.api.api_version, "v1");
}

#[test]
fn test_loadOrCreate_existingFile_shouldReadIt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    valid_config().save(&path).unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.api.base_url, "https://aristote.example.org/api");
    assert_eq!(config.credentials.client_id, "pod");
    assert_eq!(config.disciplines, vec!["Mathematics".to_string()]);
}

#[test]
fn test_loadOrCreate_invalidJson_shouldFail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    let error = Config::load_or_create(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_logLevel_intoLevelFilter_shouldMapEachLevel() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Error), log::LevelFilter::Error);
    assert_eq!(log::LevelFilter::from(&LogLevel::Trace), log::LevelFilter::Trace);
}
