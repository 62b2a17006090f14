//! Logger for unit tests: records every log line on the calling thread

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata};

struct CaptureLogger;

thread_local! {
    static LINES: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        LINES.with(|lines| {
            lines
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Runs `f` and returns its result with the warnings it logged.
///
/// Each test runs on its own thread, so captures don't mix.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });

    LINES.with(|lines| lines.borrow_mut().clear());
    let result = f();
    let warnings = LINES.with(|lines| {
        lines
            .borrow_mut()
            .drain(..)
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    });
    (result, warnings)
}
