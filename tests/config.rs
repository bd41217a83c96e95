use campus::{ClientConfig, ConfigError};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 6] = [
    "CAMPUS_ENDPOINT",
    "CAMPUS_PROJECT_ID",
    "CAMPUS_DATABASE_ID",
    "CAMPUS_API_KEY",
    "CAMPUS_LOG",
    "CAMPUS_LOG_DIR",
];

fn clear_env() {
    for name in ENV_VARS {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write config");
    file
}

#[test]
#[serial]
fn test_load_full_file() {
    clear_env();
    let file = write_config(
        r#"
        [backend]
        endpoint = "https://cloud.example.com/v1"
        project_id = "campus-app"
        database_id = "main"
        api_key = "secret"
        timeout_secs = 10

        [collections]
        communities = "6561a9c2"
        community_members = "6561a9d7"

        [log]
        filter = "campus=debug"
        "#,
    );

    let config = ClientConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.collections.communities, "6561a9c2");
    assert_eq!(config.collections.users, "users");
    assert_eq!(config.log.filter, "campus=debug");

    let rest = config.rest_config().unwrap();
    assert_eq!(rest.endpoint.as_str(), "https://cloud.example.com/v1");
    assert_eq!(rest.project_id, "campus-app");
    assert_eq!(rest.database_id, "main");
    assert_eq!(rest.api_key.as_deref(), Some("secret"));
    assert_eq!(rest.timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let file = write_config(
        r#"
        [backend]
        endpoint = "https://cloud.example.com/v1"
        project_id = "campus-app"
        database_id = "main"
        "#,
    );
    std::env::set_var("CAMPUS_ENDPOINT", "http://localhost:8080/v1");
    std::env::set_var("CAMPUS_DATABASE_ID", "staging");

    let config = ClientConfig::load(Some(file.path()));
    clear_env();
    let config = config.unwrap();

    let rest = config.rest_config().unwrap();
    assert_eq!(rest.endpoint.as_str(), "http://localhost:8080/v1");
    assert_eq!(rest.project_id, "campus-app");
    assert_eq!(rest.database_id, "staging");
}

#[test]
#[serial]
fn test_unsupported_scheme_is_rejected() {
    clear_env();
    let file = write_config(
        r#"
        [backend]
        endpoint = "ftp://cloud.example.com/v1"
        "#,
    );

    let err = ClientConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "backend.endpoint", .. }));
}

#[test]
fn test_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ClientConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_file() {
    let file = write_config("[backend\nendpoint = ");

    let err = ClientConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
