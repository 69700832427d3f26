use std::fs::File;
use std::io::Write;

use rstest::rstest;
use sorter_config::{CupSpec, load_cups_csv};
use tempfile::tempdir;

fn write_csv(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cups.csv");
    let mut f = File::create(&path).unwrap();
    for l in lines {
        writeln!(f, "{l}").unwrap();
    }
    (dir, path)
}

#[rstest]
fn loads_rows_in_cup_order() {
    let (_dir, path) = write_csv(&["min,max", "95.0,105.0", "4465, 4935"]);
    let cups = load_cups_csv(&path).unwrap();
    assert_eq!(
        cups,
        vec![
            CupSpec::Range {
                min: 95.0,
                max: 105.0,
                catch_all: false
            },
            CupSpec::Range {
                min: 4465.0,
                max: 4935.0,
                catch_all: false
            },
        ]
    );
}

#[rstest]
#[case(&["lo,hi", "1,2"], "must have headers 'min,max'")]
#[case(&["min,max", "5,1"], "invalid CSV row 2")]
#[case(&["min,max", "1,2", "abc,3"], "invalid CSV row 3")]
#[case(&["min,max"], "has no rows")]
fn rejects_bad_files(#[case] lines: &[&str], #[case] needle: &str) {
    let (_dir, path) = write_csv(lines);
    let err = load_cups_csv(&path).expect_err("should fail");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "expected {needle:?} in {msg:?}");
}

#[test]
fn missing_file_reports_path() {
    let err = load_cups_csv(std::path::Path::new("/nonexistent/cups.csv")).unwrap_err();
    assert!(format!("{err}").contains("open cup CSV"));
}
