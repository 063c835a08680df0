use super::common::{config, store_contents, write};
use hashstore::pipeline;
use tempfile::{tempdir, TempDir};

fn populate() -> TempDir {
    let input = tempdir().unwrap();
    for i in 0..40 {
        let ext = ["jpg", "png", "mov", "txt"][i % 4];
        write(
            &input.path().join(format!("album{}/img{i}.{ext}", i % 5)),
            format!("content {}", i % 13).as_bytes(),
        );
    }
    write(&input.path().join("Previews/p.jpg"), b"preview");
    write(&input.path().join("x.jpg_face3.jpg"), b"face");
    input
}

#[test]
fn test_second_run_counts_everything_as_duplicate() {
    let input = populate();
    let output = tempdir().unwrap();
    let cfg = config(output.path(), &[input.path()], 8);

    let first = pipeline::run(&cfg, None).unwrap();
    let after_first = store_contents(output.path());

    let second = pipeline::run(&cfg, None).unwrap();
    let after_second = store_contents(output.path());

    assert_eq!(after_first, after_second);
    assert_eq!(second.processed, first.processed);
    assert_eq!(second.skipped, first.skipped);
    assert_eq!(second.duplicates, second.processed);
}

#[test]
fn test_totals_independent_of_parallelism() {
    let input = populate();

    let out1 = tempdir().unwrap();
    let serial = pipeline::run(&config(out1.path(), &[input.path()], 1), None).unwrap();

    let out64 = tempdir().unwrap();
    let parallel = pipeline::run(&config(out64.path(), &[input.path()], 64), None).unwrap();

    assert_eq!(serial, parallel);
    assert_eq!(store_contents(out1.path()), store_contents(out64.path()));
}

#[test]
fn test_store_paths_deterministic_across_runs() {
    let input = populate();
    let out_a = tempdir().unwrap();
    let out_b = tempdir().unwrap();

    pipeline::run(&config(out_a.path(), &[input.path()], 3), None).unwrap();
    pipeline::run(&config(out_b.path(), &[input.path()], 17), None).unwrap();

    assert_eq!(store_contents(out_a.path()), store_contents(out_b.path()));
}
