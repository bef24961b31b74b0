//! env_logger wrapped so tests can read back what they logged.
//!
//! Lines from blobctl crates are recorded per thread. Every `#[tokio::test]` runs on its own
//! thread with a current-thread runtime, so a test only sees its own lines.

use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct RecordingLogger {
    inner: env_logger::Logger,
    lines: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info || self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if record.level() <= Level::Info && record.target().starts_with("blobctl") {
            self.lines.lock().unwrap().push((
                thread::current().id(),
                record.level(),
                record.args().to_string(),
            ));
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: OnceLock<RecordingLogger> = OnceLock::new();

pub fn init() {
    let logger = LOGGER.get_or_init(|| RecordingLogger {
        inner: env_logger::builder().is_test(true).build(),
        lines: Mutex::default(),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.inner.filter().max(LevelFilter::Info));
    }
}

/// Lines logged at `level` by the current thread.
pub fn lines(level: Level) -> Vec<String> {
    let id = thread::current().id();
    LOGGER
        .get()
        .map(|logger| {
            logger
                .lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(thread, l, _)| *thread == id && *l == level)
                .map(|(_, _, line)| line.clone())
                .collect()
        })
        .unwrap_or_default()
}
