use std::fs;

use geoagents::adapters::outbound::{init_run_logger, init_tracing};
use tempfile::tempdir;

// Both loggers are process-global, so this file holds a single test.
#[test]
fn run_file_receives_lines_after_tracing_is_installed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");
    let path_str = path.to_str().unwrap();

    assert!(init_tracing());
    let logger = init_run_logger(Some(path_str), "schelling-test");
    logger.info("run-line written");
    logger.warn("run-warning written");
    log::logger().flush();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[schelling-test] run-line written"), "run file: {}", content);
    assert!(content.contains("run-warning written"), "run file: {}", content);
}
