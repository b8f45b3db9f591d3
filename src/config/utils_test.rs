use crate::config::{
    StorageConfig,
    constants::{
        BIND_ADDRESS, DEFAULT_AVATAR, MAX_BODY_BYTES, MAX_SESSION_TTL_SECS, SESSION_TTL_SECS,
        TIMESTAMP_FORMAT,
    },
};

use super::*;

#[test]
fn test_load_configuration() {
    unsafe {
        std::env::set_var("TRANSCRIPTS_TEST_SECRET", "from-env");
    }
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    let server = &config.server;
    assert_eq!(server.bind, "127.0.0.1:8080");
    assert_eq!(server.max_body_bytes, 1024 * 1024);
    assert_eq!(server.cors, false);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(
        log_filters[0].module.as_deref(),
        Some("transcripts::storage")
    );
    assert_eq!(log_filters[0].level.as_deref(), Some("debug"));

    let log_file = log.file.as_ref().unwrap();
    assert_eq!(log_file.path, "/var/log/transcripts/server.log");
    assert_eq!(log_file.append, true);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(
                sqlite.path.as_deref(),
                Some("/var/lib/transcripts/database.db")
            );
            assert_eq!(sqlite.schema_errors_fatal, false);
        }
    }

    let auth = &config.auth;
    assert_eq!(auth.api_secret, "from-env");
    assert_eq!(auth.admin_username, "admin");
    assert_eq!(auth.admin_password, "hunter2");
    assert_eq!(auth.session_ttl_secs, 600);

    let render = &config.render;
    assert_eq!(
        render.template_path.as_deref(),
        Some("/etc/transcripts/ticket.html")
    );
    assert_eq!(render.default_avatar, "https://example.com/avatar.png");
    assert_eq!(render.timestamp_format, "%Y-%m-%d %H:%M");
    assert_eq!(render.utc_offset_minutes, 120);
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    assert_eq!(config.log.level.as_deref(), Some("debug"));
    assert!(config.log.file.is_none());

    assert_eq!(config.server.bind, BIND_ADDRESS);
    assert_eq!(config.server.max_body_bytes, MAX_BODY_BYTES);
    assert_eq!(config.server.cors, true);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(sqlite.path, None);
            assert_eq!(sqlite.schema_errors_fatal, true);
        }
    }

    assert_eq!(config.auth.api_secret, "plain-secret");
    assert_eq!(config.auth.admin_username, "");
    assert_eq!(config.auth.session_ttl_secs, SESSION_TTL_SECS);

    assert_eq!(config.render.template_path, None);
    assert_eq!(config.render.default_avatar, DEFAULT_AVATAR);
    assert_eq!(config.render.timestamp_format, TIMESTAMP_FORMAT);
    assert_eq!(config.render.utc_offset_minutes, 0);
}

#[test]
fn test_auth_config_debug_redacts_secrets() {
    let mut config = Configuration::default();
    config.auth.api_secret = "top-secret".to_string();
    config.auth.admin_password = "hunter2".to_string();

    let debug = format!("{:?}", config.auth);
    assert!(!debug.contains("top-secret"));
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_expand_env() {
    unsafe {
        std::env::set_var("EXPAND_ENV_TEST_VALUE", "abc");
    }
    assert_eq!(expand_env("plain"), "plain");
    assert_eq!(expand_env("$EXPAND_ENV_TEST_VALUE"), "abc");
    assert_eq!(expand_env("x-${EXPAND_ENV_TEST_VALUE}-y"), "x-abc-y");
    assert_eq!(expand_env("${EXPAND_ENV_TEST_UNSET}"), "");
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, "//config.toml");

    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("TEST_PATH", dir);
        std::env::set_var("USER_PATH", user_path);
    }
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}

fn write_config(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn test_credentials_keep_literal_dollar() {
    unsafe {
        std::env::set_var("TRANSCRIPTS_TEST_ADMIN", "root");
        std::env::set_var("ecret", "leaked");
    }
    let (_dir, path) = write_config(
        r#"
[auth]
api_secret = "Key$ecret!"
admin_username = "${TRANSCRIPTS_TEST_ADMIN}"
admin_password = "pa$$word"
"#,
    );
    let config = load_configuration(&path).expect("failed to load config");

    assert_eq!(config.auth.api_secret, "Key$ecret!");
    assert_eq!(config.auth.admin_username, "root");
    assert_eq!(config.auth.admin_password, "pa$$word");
}

#[test]
fn test_expand_env_reference() {
    unsafe {
        std::env::set_var("EXPAND_ENV_REFERENCE_TEST", "abc");
    }
    assert_eq!(expand_env_reference("${EXPAND_ENV_REFERENCE_TEST}"), "abc");
    assert_eq!(expand_env_reference("${EXPAND_ENV_REFERENCE_UNSET}"), "");
    assert_eq!(
        expand_env_reference("$EXPAND_ENV_REFERENCE_TEST"),
        "$EXPAND_ENV_REFERENCE_TEST"
    );
    assert_eq!(
        expand_env_reference("x-${EXPAND_ENV_REFERENCE_TEST}"),
        "x-${EXPAND_ENV_REFERENCE_TEST}"
    );
}

#[test]
fn test_session_ttl_out_of_range() {
    let (_dir, path) = write_config("[auth]\nsession_ttl_secs = 10_000_000_000_000\n");
    assert!(load_configuration(&path).is_err());

    for session_ttl_secs in [0, MAX_SESSION_TTL_SECS + 1, u64::MAX] {
        let mut config = Configuration::default();
        config.auth.session_ttl_secs = session_ttl_secs;
        assert!(config.resolve().is_err(), "{session_ttl_secs}");
    }

    let mut config = Configuration::default();
    config.auth.session_ttl_secs = MAX_SESSION_TTL_SECS;
    assert!(config.resolve().is_ok());
}
