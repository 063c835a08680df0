use clap::Parser;
use hashstore::cli::Cli;
use hashstore::config::{Config, ConfigError};
use hashstore::scanner::HashAlgorithm;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all HASHSTORE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("HASHSTORE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
parallelism = 4
extension = '^\.png$'
hash = "blake3"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.parallelism, 4);
    assert_eq!(config.extension, r"^\.png$");
    assert_eq!(config.hash, HashAlgorithm::Blake3);
    // Untouched keys keep their defaults
    assert_eq!(config.skip_dir, Config::default().skip_dir);
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "parallelism = 4\n").unwrap();

    std::env::set_var("HASHSTORE_PARALLELISM", "9");
    std::env::set_var("HASHSTORE_SKIP_DIR", "^tmp$");
    let config = Config::load(Some(&path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.parallelism, 9);
    assert_eq!(config.skip_dir, "^tmp$");
}

#[test]
fn test_cli_overrides_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "parallelism = 4\nhash = \"blake3\"\n").unwrap();

    std::env::set_var("HASHSTORE_PARALLELISM", "9");
    let loaded = Config::load(Some(&path));
    clear_env();

    let d = dir.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["hashstore", "-p", "2", "--hash", "sha256", d, d]).unwrap();
    let config = loaded.unwrap().apply_cli(&cli);

    assert_eq!(config.parallelism, 2);
    assert_eq!(config.hash, HashAlgorithm::Sha256);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = Config::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile(p) if p == missing));
}

#[test]
fn test_malformed_config_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "parallelism = \"lots\"\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert_eq!(err.to_string(), "invalid configuration");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "paralelism = 3\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.parallelism, Config::default().parallelism);
}
