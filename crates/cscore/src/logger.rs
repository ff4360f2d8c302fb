// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{marshal::decode_lossy, Error};
use log::{Level, LevelFilter, Record};
use std::{
    fmt,
    os::raw::{c_char, c_uint},
    panic::{self, AssertUnwindSafe},
};

/// Target used for records coming from the engine.
pub const NATIVE_TARGET: &str = "cscore::native";

/// Engine log levels. Higher values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug4 = 6,
    Debug3 = 7,
    Debug2 = 8,
    Debug1 = 9,
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl LogLevel {
    pub fn raw(self) -> c_uint {
        self as c_uint
    }
}

impl From<LevelFilter> for LogLevel {
    /// The least severe engine level still enabled by `filter`.
    fn from(filter: LevelFilter) -> Self {
        match filter {
            LevelFilter::Off => LogLevel::Critical,
            LevelFilter::Error => LogLevel::Error,
            LevelFilter::Warn => LogLevel::Warning,
            LevelFilter::Info => LogLevel::Info,
            LevelFilter::Debug => LogLevel::Debug,
            LevelFilter::Trace => LogLevel::Debug4,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Debug1 => "debug1",
            LogLevel::Debug2 => "debug2",
            LogLevel::Debug3 => "debug3",
            LogLevel::Debug4 => "debug4",
        };
        f.write_str(name)
    }
}

fn level_for(raw: c_uint) -> Level {
    match raw {
        40..=c_uint::MAX => Level::Error,
        30..=39 => Level::Warn,
        20..=29 => Level::Info,
        10..=19 => Level::Debug,
        _ => Level::Trace,
    }
}

/// Route engine log messages at `min` or above into the `log` facade under
/// the [`NATIVE_TARGET`] target.
///
/// ```no_run
/// use cscore::logger::{forward_native_logs, LogLevel};
///
/// env_logger::init();
/// forward_native_logs(LogLevel::from(log::max_level()))?;
/// # Ok::<(), cscore::Error>(())
/// ```
pub fn forward_native_logs(min: LogLevel) -> Result<(), Error> {
    cs!(CS_SetLogger(Some(on_log), min.raw()));
    log::debug!("forwarding engine logs at {} and above", min);
    Ok(())
}

unsafe extern "C" fn on_log(level: c_uint, file: *const c_char, line: c_uint, msg: *const c_char) {
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        let level = level_for(level);
        if level > log::max_level() {
            return;
        }
        let file = unsafe { decode_lossy(file) };
        let msg = unsafe { decode_lossy(msg) };
        log::logger().log(
            &Record::builder()
                .level(level)
                .target(NATIVE_TARGET)
                .file(Some(file.as_str()))
                .line(Some(line))
                .args(format_args!("{}", msg.trim_end()))
                .build(),
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_for(LogLevel::Critical.raw()), Level::Error);
        assert_eq!(level_for(LogLevel::Error.raw()), Level::Error);
        assert_eq!(level_for(LogLevel::Warning.raw()), Level::Warn);
        assert_eq!(level_for(35), Level::Warn);
        assert_eq!(level_for(LogLevel::Info.raw()), Level::Info);
        assert_eq!(level_for(LogLevel::Debug.raw()), Level::Debug);
        assert_eq!(level_for(LogLevel::Debug1.raw()), Level::Trace);
        assert_eq!(level_for(LogLevel::Debug4.raw()), Level::Trace);
        assert_eq!(level_for(0), Level::Trace);
    }

    #[test]
    fn test_from_level_filter() {
        assert_eq!(LogLevel::from(LevelFilter::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::from(LevelFilter::Trace), LogLevel::Debug4);
        assert!(LogLevel::from(LevelFilter::Info) > LogLevel::Debug);
        assert_eq!(LogLevel::Debug2.to_string(), "debug2");
    }

    #[test]
    fn test_callback_tolerates_null_strings() {
        let _ = env_logger::builder().is_test(true).try_init();
        let msg = CString::new("opened device\n").unwrap();
        unsafe {
            on_log(20, std::ptr::null(), 0, msg.as_ptr());
            on_log(40, std::ptr::null(), 12, std::ptr::null());
        }
    }
}
