// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! cscore Library for Rust
//!
//! Safe Rust bindings for the cscore camera engine, which captures video from
//! USB and HTTP cameras, accepts frames from application code and serves
//! streams over MJPEG.
//!
//! The engine owns every resource. This crate holds only integer handles and
//! turns the engine's status-code convention into [`Error`] values:
//!
//! - sources and sinks are reference counted natively and released when the
//!   wrapper is dropped;
//! - every call zero-initializes a status slot and checks it through a single
//!   translation function;
//! - strings and arrays returned by the engine are copied and handed back to
//!   the engine's matching free function exactly once;
//! - event listeners are kept alive by a process-wide registry for as long as
//!   the engine may call them.
//!
//! # Quick Start
//!
//! ## Serving a USB camera
//!
//! ```no_run
//! use cscore::camera::UsbCamera;
//! use cscore::mjpeg::MjpegServer;
//! use cscore::mode::PixelFormat;
//!
//! let camera = UsbCamera::from_device("front", 0)?;
//! camera.set_video_mode_discrete(PixelFormat::Mjpeg, 640, 480, 30)?;
//! let server = MjpegServer::new("front-stream", "", 1181)?;
//! server.set_source(Some(&camera))?;
//! # Ok::<(), cscore::Error>(())
//! ```
//!
//! ## Watching events
//!
//! ```no_run
//! use cscore::event::EventMask;
//! use cscore::listener::VideoListener;
//!
//! let listener = VideoListener::new(EventMask::ALL, true, |event| {
//!     println!("{:?} {}", event.kind, event.name);
//! })?;
//! # drop(listener);
//! # Ok::<(), cscore::Error>(())
//! ```
//!
//! # Loading the engine
//!
//! The shared library is opened on first use. A `-cscore:<path>` process
//! argument or the `CSCORE_LIBRARY` environment variable selects a specific
//! file; otherwise the platform default name is searched along the system
//! library paths. Call [`shutdown`] before exiting to stop engine threads.

use std::{
    error,
    ffi::NulError,
    fmt,
    num::TryFromIntError,
    str,
};

pub use cscore_sys as ffi;

use crate::status::Status;

/// Error type for cscore library operations
#[derive(Debug)]
pub enum Error {
    /// The cscore library (libcscore.so) could not be loaded at runtime
    LibraryNotLoaded(ffi::libloading::Error),

    /// The loaded library does not export a required entry point
    SymbolNotFound(&'static str),

    /// The engine reported a non-zero status code
    Status(Status),

    /// UTF-8 conversion error when converting C strings to Rust strings
    Utf8(str::Utf8Error),

    /// CString creation error (null byte found in string)
    CString(NulError),

    /// Integer conversion error (try_from failed)
    TryFromInt(TryFromIntError),

    /// Null pointer returned from C library where valid pointer expected
    NullPointer,
}

impl Error {
    /// The engine status behind this error, if it came from a native call.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LibraryNotLoaded(err) => {
                write!(f, "cscore library could not be loaded: {}", err)
            }
            Error::SymbolNotFound(name) => {
                write!(f, "symbol {} not found in cscore library", name)
            }
            Error::Status(status) => write!(f, "{}", status),
            Error::Utf8(err) => write!(f, "UTF-8 conversion error: {}", err),
            Error::CString(err) => write!(f, "CString creation error: {}", err),
            Error::TryFromInt(err) => write!(f, "Integer conversion error: {}", err),
            Error::NullPointer => write!(f, "Null pointer returned from cscore library"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::LibraryNotLoaded(err) => Some(err),
            Error::Utf8(err) => Some(err),
            Error::CString(err) => Some(err),
            Error::TryFromInt(err) => Some(err),
            Error::SymbolNotFound(_) | Error::Status(_) | Error::NullPointer => None,
        }
    }
}

impl From<ffi::libloading::Error> for Error {
    fn from(err: ffi::libloading::Error) -> Self {
        Error::LibraryNotLoaded(err)
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Error::Status(status)
    }
}

impl From<str::Utf8Error> for Error {
    fn from(err: str::Utf8Error) -> Self {
        Error::Utf8(err)
    }
}

impl From<NulError> for Error {
    fn from(err: NulError) -> Self {
        Error::CString(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}

#[doc(hidden)]
pub fn __library() -> Result<&'static ffi::CsCoreLibrary, Error> {
    Ok(ffi::init()?)
}

/// Resolve an entry point of the loaded library as a plain function pointer.
/// Must be used in functions returning `Result<T, Error>`.
#[macro_export]
macro_rules! cs_fn {
    ($fn_name:ident) => {
        *$crate::__library()?
            .$fn_name
            .as_ref()
            .map_err(|_| $crate::Error::SymbolNotFound(stringify!($fn_name)))?
    };
}

/// Helper macro for modules to get library reference and call functions
/// All functions must return Result<T, Error> to use this macro
#[macro_export]
macro_rules! cs {
    ($fn_name:ident($($args:expr),* $(,)?)) => {
        {
            let f = $crate::cs_fn!($fn_name);
            #[allow(clippy::macro_metavars_in_unsafe)]
            let result = unsafe { f($($args),*) };
            result
        }
    };
}

// Call an entry point whose last argument is the status slot and translate
// the status before handing back the return value.
macro_rules! cs_status {
    ($fn_name:ident($($args:expr),* $(,)?)) => {
        {
            let mut status: ::std::os::raw::c_int = 0;
            let result = $crate::cs!($fn_name($($args,)* &mut status));
            $crate::status::check(status).map(|()| result)
        }
    };
}

// Same as cs_status! for entry points returning an engine-allocated string.
// The buffer is owned by a guard before the status is inspected.
macro_rules! cs_string {
    ($fn_name:ident($($args:expr),* $(,)?)) => {
        {
            let free = $crate::cs_fn!(CS_FreeString);
            let mut status: ::std::os::raw::c_int = 0;
            let ptr = $crate::cs!($fn_name($($args,)* &mut status));
            let owned = unsafe { $crate::marshal::NativeString::from_raw(ptr, free) };
            $crate::status::check(status)?;
            owned.into_string()
        }
    };
}

/// Translation of engine status codes into errors.
pub mod status;

/// Typed handles for sources, sinks, properties and listeners.
pub mod handle;

/// Ownership-transferring conversions for strings and arrays.
pub mod marshal;

/// Video modes and pixel formats.
pub mod mode;

/// Source and sink properties.
pub mod property;

/// The source module provides the common video source functionality.
pub mod source;

/// The sink module provides the common video sink functionality.
pub mod sink;

/// USB and HTTP cameras.
pub mod camera;

/// Sources fed and sinks drained by application code.
pub mod raw;

/// The mjpeg module provides the MJPEG-over-HTTP streaming server.
pub mod mjpeg;

/// Engine event records.
pub mod event;

/// Event listener registration.
pub mod listener;

/// Forwarding of engine log messages to the `log` facade.
pub mod logger;

/// Get the host name of the machine the engine runs on.
pub fn hostname() -> Result<String, Error> {
    let free = cs_fn!(CS_FreeString);
    let ptr = cs!(CS_GetHostname());
    unsafe { marshal::NativeString::from_raw(ptr, free) }.into_string()
}

/// List the IPv4 addresses of the active network interfaces.
pub fn network_interfaces() -> Result<Vec<String>, Error> {
    let free = cs_fn!(CS_FreeNetworkInterfaces);
    let mut count = 0;
    let ptr = cs!(CS_GetNetworkInterfaces(&mut count));
    let list = unsafe { marshal::Enumerated::from_raw(ptr, count, free) };
    list.to_strings()
}

/// Shut the engine down.
///
/// Stops the engine threads and drops every registered listener adapter.
/// Wrappers that are still alive afterwards release their handles as usual;
/// the engine reports those calls as invalid handles, which disposal only
/// logs. Returns true when this call stopped the engine.
pub fn shutdown() -> bool {
    let stopped = ffi::shutdown();
    listener::ListenerRegistry::global().clear();
    if stopped {
        log::debug!("cscore engine shut down");
    }
    stopped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_error_text() {
        let err = Error::from(Status::SourceIsDisconnected);
        assert_eq!(err.to_string(), "source is disconnected");
        assert_eq!(err.status(), Some(Status::SourceIsDisconnected));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_conversion_errors_keep_source() {
        let err = Error::from(std::ffi::CString::new("a\0b").unwrap_err());
        assert!(err.to_string().starts_with("CString creation error"));
        assert!(err.source().is_some());
        assert_eq!(err.status(), None);

        let err = Error::from(u8::try_from(300i32).unwrap_err());
        assert!(matches!(err, Error::TryFromInt(_)));
    }

    #[test]
    fn test_symbol_not_found_names_entry_point() {
        let err = Error::SymbolNotFound("CS_GetHostname");
        assert!(err.to_string().contains("CS_GetHostname"));
    }
}
