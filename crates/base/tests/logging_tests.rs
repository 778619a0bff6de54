use base::{FileLogger, StdoutLogger, format_timestamp, format_today};
use log::Log;
use std::fs;

fn record_for<'a>(args: std::fmt::Arguments<'a>) -> log::Record<'a> {
    log::RecordBuilder::new()
        .level(log::Level::Error)
        .target("test")
        .file(Some("logging_tests.rs"))
        .line(Some(7))
        .args(args)
        .build()
}

#[test]
fn test_stdout_logger_accepts_records() {
    let logger = StdoutLogger;
    logger.log(&record_for(format_args!("stdout message")));
    logger.flush();
}

#[test]
fn test_file_logger_writes_dated_file() {
    let dir = std::env::temp_dir().join(format!("posecast-log-test-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir).expect("Failed to create FileLogger");
    logger.log(&record_for(format_args!("frame skipped")));
    logger.flush();

    let path = dir.join(format!("{}.log", format_today()));
    let contents = fs::read_to_string(&path).expect("log file missing");
    assert!(contents.contains("frame skipped"));
    assert!(contents.contains("[ERROR]"));
    assert!(contents.contains("logging_tests.rs:7"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_timestamp_format() {
    let ts = format_timestamp();
    assert_eq!(ts.len(), 19);
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], "T");
}
