use super::common::{config, config_with, store_contents, write};
use hashstore::config::Config;
use hashstore::pipeline;
use tempfile::tempdir;

#[test]
fn test_skipped_dir_subtree_counted_once() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for i in 0..5 {
        write(&input.path().join(format!("derivatives/deep/{i}.jpg")), b"d");
    }
    write(&input.path().join("keep.jpg"), b"k");

    let summary = pipeline::run(&config(output.path(), &[input.path()], 2), None).unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(store_contents(output.path()).len(), 1);
}

#[test]
fn test_each_rejected_file_counted_once() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(&input.path().join("doc.pdf"), b"pdf");
    write(&input.path().join("noext"), b"raw");
    write(&input.path().join("IMG.jpg_face0.jpg"), b"crop");
    write(&input.path().join("ok.mpg"), b"mpeg");

    let summary = pipeline::run(&config(output.path(), &[input.path()], 2), None).unwrap();

    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.processed, 1);
    assert_eq!(store_contents(output.path()).len(), 1);
}

#[test]
fn test_custom_patterns() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(&input.path().join("a.txt"), b"a");
    write(&input.path().join("draft-b.txt"), b"b");
    write(&input.path().join("cache/c.txt"), b"c");
    write(&input.path().join("d.jpg"), b"d");

    let settings = Config {
        extension: r"^\.txt$".to_string(),
        skip_file: "^draft-".to_string(),
        skip_dir: "^cache$".to_string(),
        parallelism: 2,
        ..Config::default()
    };
    let summary =
        pipeline::run(&config_with(settings, output.path(), &[input.path()]), None).unwrap();

    // draft-b.txt, cache/, d.jpg
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.processed, 1);
    let contents = store_contents(output.path());
    assert_eq!(contents.len(), 1);
    assert!(contents[0].to_str().unwrap().ends_with(".txt"));
}

#[test]
#[cfg(unix)]
fn test_symlinks_are_skipped() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(&input.path().join("real.jpg"), b"real");
    std::os::unix::fs::symlink(input.path().join("real.jpg"), input.path().join("link.jpg"))
        .unwrap();

    let summary = pipeline::run(&config(output.path(), &[input.path()], 2), None).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.duplicates, 0);
}
