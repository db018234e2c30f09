use linelog::{LinelogLayer, LogBridge, Logger, LoggerError, MemoryDestination};
use log::LevelFilter;

fn memory_logger(out: &MemoryDestination) -> Logger {
    Logger::builder()
        .error(out.clone())
        .warn(out.clone())
        .info(out.clone())
        .build()
        .unwrap()
}

#[test]
fn test_log_facade_bridge() {
    let out = MemoryDestination::new();
    LogBridge::new(memory_logger(&out))
        .install(LevelFilter::Trace)
        .unwrap();

    log::info!(target: "app", "listening on {}", 8080);
    log::debug!(target: "app", "no debug destination");
    log::error!(target: "app::db", "connection lost");

    assert_eq!(
        out.lines(),
        vec![
            "[INFO ] listening on 8080 @target=app",
            "[ERROR] connection lost @target=app::db",
        ]
    );

    let second = LogBridge::new(memory_logger(&out)).install(LevelFilter::Info);
    assert!(matches!(second, Err(LoggerError::LoggerAlreadySet(_))));
}

#[test]
fn test_tracing_global_subscriber() {
    let out = MemoryDestination::new();
    LinelogLayer::new(memory_logger(&out)).init().unwrap();

    tracing::warn!(target: "net", peer = "10.0.0.7", attempts = 3u64, "retrying");
    tracing::debug!(target: "net", "no debug destination");

    assert_eq!(out.lines(), vec!["[WARN ] retrying @target=net peer=10.0.0.7 attempts=3"]);

    let second = LinelogLayer::new(memory_logger(&out)).init();
    assert!(matches!(second, Err(LoggerError::SubscriberAlreadySet(_))));
}
