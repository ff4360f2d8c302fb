// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::type_complexity)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::too_many_arguments)]

include!("ffi.rs");

// Re-export libloading for error handling
pub use libloading;

use std::{
    ffi::OsStr,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock, PoisonError,
    },
};

/// Environment variable naming a custom path to the cscore library.
pub const LIBRARY_ENV: &str = "CSCORE_LIBRARY";

/// Prefix of a process argument naming a custom path to the cscore library,
/// for example `-cscore:/opt/frc/lib/libcscore.so`.
pub const LIBRARY_ARG_PREFIX: &str = "-cscore:";

static LIBRARY: OnceLock<CsCoreLibrary> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Platform file name of the cscore shared library.
pub fn default_library_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "cscore.dll"
    } else if cfg!(target_os = "macos") {
        "libcscore.dylib"
    } else {
        "libcscore.so"
    }
}

/// Returns true when `arg` is a `-cscore:<path>` override argument.
///
/// The prefix comparison ignores ASCII case.
pub fn is_library_override(arg: &str) -> bool {
    arg.len() >= LIBRARY_ARG_PREFIX.len()
        && arg.is_char_boundary(LIBRARY_ARG_PREFIX.len())
        && arg[..LIBRARY_ARG_PREFIX.len()].eq_ignore_ascii_case(LIBRARY_ARG_PREFIX)
}

/// Find the first `-cscore:<path>` argument whose path names an existing file.
///
/// Arguments that are not valid UTF-8 are never overrides and are skipped.
pub fn library_override_from_args<I, S>(args: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().find_map(|arg| {
        let arg = arg.as_ref().to_str()?;
        if !is_library_override(arg) {
            return None;
        }
        let path = &arg[LIBRARY_ARG_PREFIX.len()..];
        if !path.is_empty() && Path::new(path).is_file() {
            Some(path.to_string())
        } else {
            None
        }
    })
}

/// Resolve which library file `init()` will open.
///
/// A `-cscore:<path>` process argument wins, then the `CSCORE_LIBRARY`
/// environment variable, then the platform default name which is searched
/// along the system library paths.
pub fn library_path() -> String {
    library_override_from_args(std::env::args_os())
        .or_else(|| std::env::var(LIBRARY_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| default_library_name().to_string())
}

/// Initialize the cscore library by loading the shared object.
///
/// This must be called before using any other cscore functions. Returns an
/// error if the library cannot be loaded; the load is not retried
/// automatically, a later call will attempt it again.
pub fn init() -> Result<&'static CsCoreLibrary, libloading::Error> {
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }

    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    // Double-check after acquiring lock
    if let Some(lib) = LIBRARY.get() {
        return Ok(lib);
    }

    let lib_path = library_path();
    let lib = unsafe { CsCoreLibrary::new(lib_path.as_str())? };

    Ok(LIBRARY.get_or_init(|| lib))
}

/// Try to get a reference to the loaded library without panicking
pub fn try_library() -> Option<&'static CsCoreLibrary> {
    LIBRARY.get()
}

/// Stop all engine threads by calling `CS_Shutdown`.
///
/// Only the first call after a successful `init()` reaches the engine; later
/// calls and calls without a loaded library do nothing. The shared object
/// stays mapped so that outstanding handles never call into unmapped code.
/// Returns true when the engine was shut down by this call.
pub fn shutdown() -> bool {
    let Some(lib) = LIBRARY.get() else {
        return false;
    };
    if SHUTDOWN.swap(true, Ordering::SeqCst) {
        return false;
    }
    match lib.CS_Shutdown {
        Ok(f) => {
            unsafe { f() };
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_override_prefix_ignores_case() {
        assert!(is_library_override("-cscore:/tmp/lib.so"));
        assert!(is_library_override("-CSCORE:/tmp/lib.so"));
        assert!(is_library_override("-CsCore:"));
        assert!(!is_library_override("-ntcore:/tmp/lib.so"));
        assert!(!is_library_override("--cscore"));
        assert!(!is_library_override(""));
    }

    #[test]
    fn test_override_requires_existing_file() {
        let dir = std::env::temp_dir();
        let file = dir.join(format!("cscore-sys-test-{}.so", std::process::id()));
        std::fs::File::create(&file)
            .and_then(|mut f| f.write_all(b"\x7fELF"))
            .unwrap();
        let arg = format!("-CSCORE:{}", file.display());
        let missing = format!("-cscore:{}", dir.join("no-such-libcscore.so").display());

        assert_eq!(
            library_override_from_args([missing.as_str(), "serve", arg.as_str()]),
            Some(file.display().to_string())
        );
        assert_eq!(library_override_from_args([missing.as_str()]), None);
        assert_eq!(library_override_from_args(["-cscore:"]), None);
        assert_eq!(library_override_from_args(Vec::<String>::new()), None);

        std::fs::remove_file(&file).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_override_skips_non_utf8_arguments() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let args = [
            OsString::from_vec(b"/dev/vid\xffeo0".to_vec()),
            OsString::from_vec(b"-cscore:/tmp/\xff.so".to_vec()),
            OsString::from("-cscore:"),
        ];
        assert_eq!(library_override_from_args(&args), None);
    }

    #[test]
    fn test_try_library_does_not_load() {
        // Nothing in this crate's tests loads the engine.
        assert!(try_library().is_none());
        assert!(!shutdown());
    }

    #[test]
    fn test_default_library_name() {
        let name = default_library_name();
        assert!(name.contains("cscore"));
        #[cfg(target_os = "linux")]
        assert_eq!(name, "libcscore.so");
    }

    #[test]
    fn test_video_mode_layout() {
        assert_eq!(
            std::mem::size_of::<CS_VideoMode>(),
            4 * std::mem::size_of::<std::os::raw::c_int>()
        );
        assert_eq!(CS_VideoMode::default().pixelFormat, CS_PixelFormat_CS_PIXFMT_UNKNOWN);
    }

    #[test]
    fn test_raw_frame_default_is_empty() {
        let frame = CS_RawFrame::default();
        assert!(frame.data.is_null());
        assert_eq!(frame.totalData, 0);
    }
}
