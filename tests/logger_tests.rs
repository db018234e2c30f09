use linelog::{Logger, LoggerError, MemoryDestination, Preset, Severity};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_file_logger_routes_by_severity() {
    let dir = tempdir().unwrap();
    let error_path = dir.path().join("error.log");
    let info_path = dir.path().join("info.log");

    let mut logger = Logger::file(&error_path, &info_path).unwrap();
    assert!(!logger.enabled(Severity::Debug), "Debug should start disabled");

    logger.error().int("code", 7).msg("bad");
    logger.warn().msg("odd");
    logger.info().msg("fine");
    logger.debug().msg("hidden");
    logger.close();

    let errors = fs::read_to_string(&error_path).unwrap();
    let infos = fs::read_to_string(&info_path).unwrap();
    let errors: Vec<_> = errors.lines().collect();
    let infos: Vec<_> = infos.lines().collect();

    assert_eq!(errors.len(), 2);
    assert!(errors[0].ends_with("[ERROR] bad code=7"), "unexpected {:?}", errors[0]);
    assert!(errors[1].ends_with("[WARN ] odd"), "unexpected {:?}", errors[1]);
    assert_eq!(infos.len(), 1);
    assert!(infos[0].ends_with("[INFO ] fine"), "unexpected {:?}", infos[0]);
}

#[test]
fn test_file_logger_appends() {
    let dir = tempdir().unwrap();
    let error_path = dir.path().join("error.log");
    let info_path = dir.path().join("info.log");
    fs::write(&info_path, "existing line\n").unwrap();

    let mut logger = Logger::file(&error_path, &info_path).unwrap();
    logger.info().msg("appended");
    logger.close();

    let infos = fs::read_to_string(&info_path).unwrap();
    assert!(infos.starts_with("existing line\n"));
    assert!(infos.trim_end().ends_with("[INFO ] appended"));
}

#[cfg(unix)]
#[test]
fn test_file_logger_creates_private_files() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let error_path = dir.path().join("error.log");
    let info_path = dir.path().join("info.log");
    let mut logger = Logger::file(&error_path, &info_path).unwrap();
    logger.close();

    for path in [&error_path, &info_path] {
        let mode = fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{:?} should be owner read/write only", path);
    }
}

#[test]
fn test_file_logger_open_failure() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("error.log");

    let err = Logger::file(&missing, dir.path().join("info.log")).unwrap_err();
    assert!(matches!(err, LoggerError::OpenErrorLog { .. }));
    assert!(err.to_string().starts_with("can't open error log"), "unexpected {}", err);

    let err = Logger::file(dir.path().join("error.log"), &missing).unwrap_err();
    assert!(matches!(err, LoggerError::OpenInfoLog { .. }));
}

#[test]
fn test_writes_after_close_are_dropped() {
    let dir = tempdir().unwrap();
    let info_path = dir.path().join("info.log");
    let mut logger = Logger::file(dir.path().join("error.log"), &info_path).unwrap();

    logger.info().msg("before");
    logger.close();
    logger.info().msg("after");
    logger.close();

    let infos = fs::read_to_string(&info_path).unwrap();
    assert_eq!(infos.lines().count(), 1);
}

#[test]
fn test_close_hook_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut logger = Logger::builder()
        .on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    logger.close();
    logger.close();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_lines_stay_whole() {
    const THREADS: usize = 8;
    const LINES: usize = 500;

    let out = MemoryDestination::new();
    let logger = Arc::new(Logger::builder().info(out.clone()).build().unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..LINES {
                    logger
                        .info()
                        .usize("t", t)
                        .usize("i", i)
                        .str("pad", "abcdefghijklmnopqrstuvwxyz")
                        .msg("worker");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = out.lines();
    assert_eq!(lines.len(), THREADS * LINES);

    let mut seen = vec![vec![false; LINES]; THREADS];
    for line in &lines {
        let rest = line
            .strip_prefix("[INFO ] worker t=")
            .unwrap_or_else(|| panic!("Line should be intact: {:?}", line));
        let (t, rest) = rest.split_once(" i=").unwrap();
        let (i, pad) = rest.split_once(' ').unwrap();
        assert_eq!(pad, "pad=abcdefghijklmnopqrstuvwxyz");
        seen[t.parse::<usize>().unwrap()][i.parse::<usize>().unwrap()] = true;
    }
    assert!(seen.iter().flatten().all(|seen| *seen), "Every line should arrive exactly once");
}

#[test]
fn test_runtime_debug_toggle() {
    let out = MemoryDestination::new();
    let mut logger = Logger::builder().info(out.clone()).build().unwrap();

    logger.debug().int("x", 6).int("y", 42).msg("Debug trace");
    assert!(out.is_empty());

    logger.set_destination(Severity::Debug, Some(Arc::new(out.clone())));
    logger.debug().int("x", 6).int("y", 42).msg("Debug trace attempt 2");
    assert_eq!(out.lines(), vec!["[DEBUG] Debug trace attempt 2 x=6 y=42"]);

    logger.set_destination(Severity::Debug, None);
    logger.debug().msg("off again");
    assert_eq!(out.lines().len(), 1);
}

#[test]
fn test_invalid_timestamp_format() {
    let err = Logger::builder().timestamp("%Y-%Q").build().unwrap_err();
    assert!(matches!(err, LoggerError::TimestampFormat { .. }));
}

#[test]
fn test_presets() {
    let cloud = Logger::from_preset(Preset::Cloud);
    assert!(cloud.timestamp_format().is_none());
    assert_eq!(cloud.tags().tag(Severity::Info), "[INFO ] ");

    let console = Logger::from_preset(Preset::Console);
    assert!(console.timestamp_format().is_some());
    assert!(console.tags().tag(Severity::Error).contains("\x1b[91m"));

    for logger in [Logger::pipe(), Logger::console(), Logger::cloud()] {
        assert!(logger.enabled(Severity::Error));
        assert!(logger.enabled(Severity::Warn));
        assert!(logger.enabled(Severity::Info));
        assert!(!logger.enabled(Severity::Debug));
    }
}
