use super::common::{config, store_contents, write};
use hashstore::config::{Config, ConfigError, PipelineConfig};
use hashstore::pipeline::{self, PipelineError};
use hashstore::store::PlaceError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_invalid_extension_pattern_rejected_before_work() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(&input.path().join("a.jpg"), b"a");

    let settings = Config {
        extension: "[".to_string(),
        ..Config::default()
    };
    let err = PipelineConfig::new(
        &settings,
        output.path().to_path_buf(),
        vec![input.path().to_path_buf()],
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidPattern {
            option: "extension",
            ..
        }
    ));
    assert!(store_contents(output.path()).is_empty());
}

#[test]
fn test_output_that_is_a_file_rejected() {
    let input = tempdir().unwrap();
    let file = input.path().join("out.jpg");
    write(&file, b"not a dir");

    let err = PipelineConfig::new(
        &Config::default(),
        file.clone(),
        vec![input.path().to_path_buf()],
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory(p) if p == file));
}

#[test]
#[cfg(unix)]
fn test_unwritable_store_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(&input.path().join("a.jpg"), b"a");
    write(&input.path().join("b.jpg"), b"b");

    let cfg = config(output.path(), &[input.path()], 2);
    fs::set_permissions(output.path(), fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores permission bits; nothing to assert in that case.
    let probe = output.path().join("probe");
    if fs::create_dir(&probe).is_ok() {
        fs::remove_dir(&probe).unwrap();
        fs::set_permissions(output.path(), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let err = pipeline::run(&cfg, None).unwrap_err();
    fs::set_permissions(output.path(), fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        err,
        PipelineError::Place(PlaceError::CreateShard { .. })
    ));
    assert!(err.to_string().contains("failed to create shard directory"));
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let locked = input.path().join("locked");
    write(&locked.join("a.jpg"), b"a");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = pipeline::run(&config(output.path(), &[input.path()], 2), None);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(PipelineError::Scan(_))));
}
