use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linelog::{Destination, FileDestination, Logger};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::io;
use std::sync::Once;
use std::time::Instant;
use tempfile::tempdir;

const ITERATIONS: usize = 100_000;

static LOGGER_INIT: Once = Once::new();

#[derive(Debug)]
struct TestEvent {
    id: i32,
    active: bool,
    large_number: u64,
    ratio: f64,
    description: String,
}

// Destination that drops every line - for measuring pure formatting cost
struct NullDestination;

impl Destination for NullDestination {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        black_box(line);
        Ok(())
    }
}

fn test_event() -> TestEvent {
    TestEvent {
        id: 42,
        active: true,
        large_number: u64::MAX,
        ratio: 0.875,
        description: "This is a longer description that includes special characters !@#$%^&*() \
                      and provides more context about the event. CPU: 95%, Memory: 2.5GB"
            .to_string(),
    }
}

fn log_event(logger: &Logger, i: usize, event: &TestEvent) {
    logger
        .info()
        .usize("iteration", i)
        .i32("id", event.id)
        .bool("active", event.active)
        .u64("large_number", event.large_number)
        .f64("ratio", event.ratio)
        .str("desc", &event.description)
        .msg("Test perf");
}

fn setup_log4rs(log_file: &str) {
    LOGGER_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} - {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn bench_in_memory(c: &mut Criterion) {
    let logger = Logger::builder()
        .info(NullDestination)
        .timestamp("%Y-%m-%d %H:%M:%S ")
        .build()
        .unwrap();
    let event = test_event();

    c.bench_function("linelog_null_destination", |b| {
        let mut i = 0;
        b.iter(|| {
            log_event(&logger, i, &event);
            i += 1;
        });
    });

    c.bench_function("linelog_disabled_severity", |b| {
        b.iter(|| {
            logger
                .debug()
                .i32("id", black_box(event.id))
                .str("desc", &event.description)
                .msg("never written");
        });
    });
}

fn bench_logging_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10); // Fewer samples due to I/O operations

    group.bench_function("linelog_vs_log4rs", |b| {
        b.iter(|| {
            let dir = tempdir().unwrap();
            let event = test_event();

            // linelog writing to a file
            let linelog_file = FileDestination::open(dir.path().join("linelog.log")).unwrap();
            let logger = Logger::builder()
                .info(linelog_file)
                .timestamp("%Y-%m-%d %H:%M:%S ")
                .build()
                .unwrap();

            let linelog_start = Instant::now();
            for i in 0..ITERATIONS {
                log_event(&logger, i, &event);
            }
            let linelog_duration = linelog_start.elapsed();

            // log4rs writing a comparable line to a file
            let log4rs_file = dir.path().join("log4rs.log").to_str().unwrap().to_string();
            setup_log4rs(&log4rs_file);

            let log4rs_start = Instant::now();
            for i in 0..ITERATIONS {
                info!(
                    "Test perf iteration={} id={} active={} large_number={} ratio={} desc={}",
                    i, event.id, event.active, event.large_number, event.ratio, event.description
                );
            }
            let log4rs_duration = log4rs_start.elapsed();

            println!("\nPerformance comparison ({} iterations):", ITERATIONS);
            println!("linelog: {:?}", linelog_duration);
            println!("log4rs: {:?}", log4rs_duration);
            let speedup = log4rs_duration.as_secs_f64() / linelog_duration.as_secs_f64();
            println!("Speedup: {:.2}x", speedup);

            black_box((linelog_duration, log4rs_duration))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_in_memory, bench_logging_comparison);
criterion_main!(benches);
