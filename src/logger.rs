use std::io::Write;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    fn new(prefix: Option<String>, sink: Box<dyn Write + Send>) -> Self {
        Logger { prefix, sink: Mutex::new(sink) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        let Ok(mut sink) = self.sink.lock() else { return };

        // Write errors are dropped
        let _ = match self.prefix {
            Some(ref prefix) => writeln!(sink, "[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, message),
            None => writeln!(sink, "[{}][{}:{}] {}", timestamp, file_name, line, message),
        };
        let _ = sink.flush();
    }
}

/// Installs the process-wide logger. Only the first call has any effect.
pub fn init_logger(prefix: Option<String>, sink: Box<dyn Write + Send>) {
    LOGGER.get_or_init(|| Logger::new(prefix, sink));
}

/// Logging before `init_logger` is a no-op: stdout belongs to the game screen.
pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
