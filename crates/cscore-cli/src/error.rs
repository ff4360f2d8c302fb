// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// Camera device not found or not openable
    CameraNotFound(String),
    /// The cscore shared library or one of its entry points is missing
    LibraryUnavailable(String),
    /// The engine rejected an operation
    Native(String),
    /// Any other failure
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::CameraNotFound(msg) => write!(f, "Camera not found: {}", msg),
            CliError::LibraryUnavailable(msg) => write!(f, "Library unavailable: {}", msg),
            CliError::Native(msg) => write!(f, "Engine error: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            CliError::InvalidArgs(_) => 2,
            CliError::CameraNotFound(_) => 3,
            CliError::LibraryUnavailable(_) => 4,
            CliError::Native(_) => 5,
            CliError::General(_) => 1,
        }
    }
}

/// Map cscore::Error to CliError with appropriate exit codes
impl From<cscore::Error> for CliError {
    fn from(err: cscore::Error) -> Self {
        use cscore::Error;

        match err {
            Error::LibraryNotLoaded(lib_err) => CliError::LibraryUnavailable(format!(
                "cscore library could not be loaded: {}",
                lib_err
            )),
            Error::SymbolNotFound(sym) => {
                CliError::LibraryUnavailable(format!("symbol not found: {}", sym))
            }

            Error::Status(status) => CliError::Native(status.to_string()),

            Error::Utf8(utf8_err) => CliError::General(format!("UTF-8 error: {}", utf8_err)),
            Error::CString(cstr_err) => CliError::InvalidArgs(format!("C string error: {}", cstr_err)),
            Error::TryFromInt(int_err) => {
                CliError::General(format!("Integer conversion error: {}", int_err))
            }
            Error::NullPointer => CliError::General("Unexpected null pointer".to_string()),
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}
