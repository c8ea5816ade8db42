use chrono::Local;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

// One log file per thread. The loader only ever runs on the main thread,
// so in practice this is a single file next to the working directory.
thread_local! {
    static LOG_FILE: RefCell<io::Result<File>> = RefCell::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(format!("loader-log-{:?}.txt", std::thread::current().id()))
    );
}

pub fn format_line(level: &str, file: &str, line: u32, message: &str) -> String {
    let formatted_time = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "{} [{}] {}:{} - {}\n",
        formatted_time, level, file, line, message
    )
}

#[inline]
pub fn log(level: &str, file: &str, line: u32, message: &str) {
    let log_message = format_line(level, file, line, message);
    LOG_FILE.with(|log_file| {
        if let Ok(writer) = &mut *log_file.borrow_mut() {
            let _ = writer.write_all(log_message.as_bytes());
            let _ = writer.flush();
        }
    });
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "log_error", feature = "log_warn", feature = "log_info", feature = "log_debug", feature = "log_trace"))]
        $crate::logger::log("ERROR", file!(), line!(), &format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "log_warn", feature = "log_info", feature = "log_debug", feature = "log_trace"))]
        $crate::logger::log("WARN ", file!(), line!(), &format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "log_info", feature = "log_debug", feature = "log_trace"))]
        $crate::logger::log("INFO ", file!(), line!(), &format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "log_debug", feature = "log_trace"))]
        $crate::logger::log("DEBUG", file!(), line!(), &format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log_trace")]
        $crate::logger::log("TRACE", file!(), line!(), &format!($($arg)*))
    }
}
