//! Headless commands

use std::fs;

use brf_edit::cli::{run, Command};

fn run_to_string(command: Command) -> String {
    let mut out = Vec::new();
    run(command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_info_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.bzy");
    fs::write(
        &path,
        b"Chars Per Line:  10\nLines Per Page:  2\none\xB6\ntwo\nthree four five six\xB6\n",
    )
    .unwrap();

    let report = run_to_string(Command::Info { file: path });
    assert!(report.contains("lines:          3"), "{}", report);
    assert!(report.contains("pages:          2"), "{}", report);
    assert!(report.contains("paragraphs:     2"), "{}", report);
    assert!(report.contains("chars per line: 10"), "{}", report);
    assert!(report.contains("overlong lines: 1"), "{}", report);
}

#[test]
fn test_convert_brf_to_bzy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.brf");
    let output = dir.path().join("out.bzy");
    fs::write(&input, b"AB\nCD\n\x0cEF").unwrap();

    run_to_string(Command::Convert {
        input,
        output: output.clone(),
    });

    assert_eq!(
        fs::read(&output).unwrap(),
        b"Chars Per Line:  40\nLines Per Page:  2\nAB\nCD\nEF\n"
    );
}

#[test]
fn test_rewrap_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.brf");
    let output = dir.path().join("out.brf");
    fs::write(&input, b"aaaa bbbb cccc").unwrap();

    let report = run_to_string(Command::Rewrap {
        file: input.clone(),
        chars: Some(10),
        from_line: 1,
        output: Some(output.clone()),
    });

    assert!(report.ends_with("rewrapped\n"), "{}", report);
    assert_eq!(fs::read(&output).unwrap(), b"aaaa bbbb\ncccc");
    assert_eq!(fs::read(&input).unwrap(), b"aaaa bbbb cccc");
}

#[test]
fn test_rewrap_rejects_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.brf");
    fs::write(&input, b"abc").unwrap();

    let mut out = Vec::new();
    let err = run(
        Command::Rewrap {
            file: input,
            chars: None,
            from_line: 5,
            output: None,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("--from-line"));
}

#[test]
fn test_missing_input_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let err = run(
        Command::Info {
            file: dir.path().join("missing.brf"),
        },
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Failed to read"));
}
