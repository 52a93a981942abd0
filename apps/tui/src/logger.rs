use log::{Level, LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Writes log records to a file; stdout belongs to the terminal UI.
pub struct FileLog {
    start: Instant,
    log_file: Mutex<BufWriter<File>>,
}

impl FileLog {
    /// Installs the logger. `debug` lowers the max level from Info to Debug.
    pub fn init(path: &Path, debug: bool) -> color_eyre::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let logger = Box::new(Self {
            start: Instant::now(),
            log_file: Mutex::new(BufWriter::new(file)),
        });

        log::set_boxed_logger(logger)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to install logger: {e}"))?;
        log::set_max_level(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
        Ok(())
    }
}

pub fn format_line(elapsed_us: u128, record: &Record<'_>) -> String {
    let module_path = record.module_path().unwrap_or_else(|| record.target());
    format!(
        "[{:9} {:5} {}] {}",
        elapsed_us,
        record.level(),
        module_path,
        record.args()
    )
}

impl log::Log for FileLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        let level = metadata.level();
        let target = metadata.target();
        if target.starts_with("sqlx") || target.starts_with("hyper") || target.starts_with("rustls") {
            return level <= Level::Warn;
        }
        true
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(self.start.elapsed().as_micros(), record);
        if let Ok(mut writer) = self.log_file.lock() {
            let _ = writeln!(writer, "{line}");
            if record.level() <= Level::Warn {
                let _ = writer.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.log_file.lock() {
            let _ = writer.flush();
        }
    }
}
