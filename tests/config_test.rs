//! Config loading and defaults integration tests

use std::io::Write;

use skillboard::config::Config;

#[test]
fn test_default_config_values() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.http_port, 5000);
    assert!(config.store.seed_demo_data);
    assert!(config.scoring.allow_self_endorsement);
    assert_eq!(config.leaderboard.default_limit, 10);
    assert_eq!(config.leaderboard.max_limit, 100);
}

#[test]
fn test_config_with_all_fields() {
    let toml_str = r#"
[server]
host = "127.0.0.1"
http_port = 8088

[store]
seed_demo_data = false

[scoring]
allow_self_endorsement = false

[leaderboard]
default_limit = 5
max_limit = 20
"#;

    let config: Config = toml::from_str(toml_str).expect("valid TOML");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.http_port, 8088);
    assert!(!config.store.seed_demo_data);
    assert!(!config.scoring.allow_self_endorsement);
    assert_eq!(config.leaderboard.resolve_limit(None), 5);
    assert_eq!(config.leaderboard.resolve_limit(Some(50)), 20);
}

#[test]
fn test_partial_sections_keep_defaults() {
    let toml_str = r#"
[server]
http_port = 9000

[leaderboard]
max_limit = 3
"#;

    let config: Config = toml::from_str(toml_str).expect("valid TOML");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.http_port, 9000);
    assert!(config.store.seed_demo_data);
    // default_limit 10 is clamped by the smaller max
    assert_eq!(config.leaderboard.resolve_limit(None), 3);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nhttp_port = 7070\n\n[store]\nseed_demo_data = false").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.http_port, 7070);
    assert!(!config.store.seed_demo_data);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server.http_port, 5000);
    assert!(config.store.seed_demo_data);
}

#[test]
fn test_load_rejects_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nhttp_port = \"not a port\"").unwrap();
    assert!(Config::load(file.path()).is_err());
}
