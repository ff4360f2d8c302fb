// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{ffi, Error};
use std::{fmt, os::raw::c_int};

/// Failure kinds reported by the engine through the status slot of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    PropertyWriteFailed,
    InvalidHandle,
    WrongHandleSubtype,
    InvalidProperty,
    WrongPropertyType,
    PropertyReadFailed,
    SourceIsDisconnected,
    EmptyValue,
    BadUrl,
    /// Any other non-zero code, carried verbatim.
    Unknown(i32),
}

impl Status {
    /// Map a raw status code. Returns `None` for success (zero).
    pub fn from_code(code: c_int) -> Option<Status> {
        let status = match code {
            ffi::CS_StatusValue_CS_OK => return None,
            ffi::CS_StatusValue_CS_PROPERTY_WRITE_FAILED => Status::PropertyWriteFailed,
            ffi::CS_StatusValue_CS_INVALID_HANDLE => Status::InvalidHandle,
            ffi::CS_StatusValue_CS_WRONG_HANDLE_SUBTYPE => Status::WrongHandleSubtype,
            ffi::CS_StatusValue_CS_INVALID_PROPERTY => Status::InvalidProperty,
            ffi::CS_StatusValue_CS_WRONG_PROPERTY_TYPE => Status::WrongPropertyType,
            ffi::CS_StatusValue_CS_READ_FAILED => Status::PropertyReadFailed,
            ffi::CS_StatusValue_CS_SOURCE_IS_DISCONNECTED => Status::SourceIsDisconnected,
            ffi::CS_StatusValue_CS_EMPTY_VALUE => Status::EmptyValue,
            ffi::CS_StatusValue_CS_BAD_URL => Status::BadUrl,
            other => Status::Unknown(other),
        };
        Some(status)
    }

    /// The raw code the engine uses for this status.
    pub fn code(self) -> c_int {
        match self {
            Status::PropertyWriteFailed => ffi::CS_StatusValue_CS_PROPERTY_WRITE_FAILED,
            Status::InvalidHandle => ffi::CS_StatusValue_CS_INVALID_HANDLE,
            Status::WrongHandleSubtype => ffi::CS_StatusValue_CS_WRONG_HANDLE_SUBTYPE,
            Status::InvalidProperty => ffi::CS_StatusValue_CS_INVALID_PROPERTY,
            Status::WrongPropertyType => ffi::CS_StatusValue_CS_WRONG_PROPERTY_TYPE,
            Status::PropertyReadFailed => ffi::CS_StatusValue_CS_READ_FAILED,
            Status::SourceIsDisconnected => ffi::CS_StatusValue_CS_SOURCE_IS_DISCONNECTED,
            Status::EmptyValue => ffi::CS_StatusValue_CS_EMPTY_VALUE,
            Status::BadUrl => ffi::CS_StatusValue_CS_BAD_URL,
            Status::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::PropertyWriteFailed => f.write_str("property write failed"),
            Status::InvalidHandle => f.write_str("invalid handle"),
            Status::WrongHandleSubtype => f.write_str("wrong handle subtype"),
            Status::InvalidProperty => f.write_str("invalid property"),
            Status::WrongPropertyType => f.write_str("wrong property type"),
            Status::PropertyReadFailed => f.write_str("read failed"),
            Status::SourceIsDisconnected => f.write_str("source is disconnected"),
            Status::EmptyValue => f.write_str("empty value"),
            Status::BadUrl => f.write_str("bad URL"),
            Status::Unknown(code) => write!(f, "unknown error code={}", code),
        }
    }
}

/// Translate the status slot of a completed call.
///
/// Every wrapper passes the slot through here immediately after the native
/// call returns; zero is success and anything else becomes
/// [`Error::Status`].
pub fn check(status: c_int) -> Result<(), Error> {
    match Status::from_code(status) {
        None => Ok(()),
        Some(status) => Err(Error::Status(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: [(c_int, Status, &str); 9] = [
        (2000, Status::PropertyWriteFailed, "property write failed"),
        (-2000, Status::InvalidHandle, "invalid handle"),
        (-2001, Status::WrongHandleSubtype, "wrong handle subtype"),
        (-2002, Status::InvalidProperty, "invalid property"),
        (-2003, Status::WrongPropertyType, "wrong property type"),
        (-2004, Status::PropertyReadFailed, "read failed"),
        (-2005, Status::SourceIsDisconnected, "source is disconnected"),
        (-2006, Status::EmptyValue, "empty value"),
        (-2007, Status::BadUrl, "bad URL"),
    ];

    #[test]
    fn test_zero_is_success() {
        assert!(check(0).is_ok());
        assert_eq!(Status::from_code(0), None);
    }

    #[test]
    fn test_named_codes() {
        for (code, status, text) in NAMED {
            assert_eq!(Status::from_code(code), Some(status));
            assert_eq!(status.code(), code);
            assert_eq!(status.to_string(), text);
            match check(code) {
                Err(Error::Status(s)) => assert_eq!(s, status),
                other => panic!("code {} translated to {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_unknown_codes_keep_value() {
        for code in [1, -1, 1999, -2008, i32::MIN, i32::MAX] {
            let status = Status::from_code(code).unwrap();
            assert_eq!(status, Status::Unknown(code));
            assert_eq!(status.code(), code);
            assert_eq!(status.to_string(), format!("unknown error code={}", code));
        }
    }

    #[test]
    fn test_positive_write_failure_is_an_error() {
        // 2000 is positive but still a failure
        assert!(check(2000).is_err());
    }
}
