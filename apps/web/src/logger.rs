use log::{Level, LevelFilter, Metadata, Record};
use wasm_bindgen::JsValue;

/// Forwards log records to the browser console.
pub struct ConsoleLog;

static LOGGER: ConsoleLog = ConsoleLog;

impl ConsoleLog {
    /// Installs the logger once; later calls are ignored.
    pub fn init(debug: bool) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(if debug {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            });
        }
    }
}

pub fn format_line(record: &Record<'_>) -> String {
    let module_path = record.module_path().unwrap_or_else(|| record.target());
    format!("[{} {}] {}", record.level(), module_path, record.args())
}

impl log::Log for ConsoleLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from(format_line(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}
