//! Shared helpers for integration tests.

use hashstore::config::{Config, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Build a run configuration with default filters.
pub fn config(output: &Path, inputs: &[&Path], parallelism: usize) -> PipelineConfig {
    config_with(
        Config {
            parallelism,
            ..Config::default()
        },
        output,
        inputs,
    )
}

/// Build a run configuration from explicit settings.
pub fn config_with(settings: Config, output: &Path, inputs: &[&Path]) -> PipelineConfig {
    PipelineConfig::new(
        &settings,
        output.to_path_buf(),
        inputs.iter().map(|p| p.to_path_buf()).collect(),
    )
    .unwrap()
}

/// All files in the store, relative to its root, sorted.
pub fn store_contents(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
