// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Opaque engine handles.
//!
//! Each flavor wraps the raw integer the engine hands out. Zero never names a
//! live resource. Equality and hashing use the raw value, so two wrappers of
//! the same handle compare equal. The flavors are distinct types so a sink
//! handle cannot be passed where a source is expected.

use crate::{status::Status, Error};
use cscore_sys::CS_Handle;
use std::fmt;

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(CS_Handle);

        impl $name {
            /// The "no resource" sentinel.
            pub const INVALID: Self = $name(0);

            pub const fn from_raw(raw: CS_Handle) -> Self {
                $name(raw)
            }

            pub const fn raw(self) -> CS_Handle {
                self.0
            }

            /// True when the handle is non-zero. Only the engine can tell
            /// whether a non-zero handle is still alive.
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }

            /// Reject the zero handle before calling into the engine.
            pub fn live(self) -> Result<Self, Error> {
                if self.is_valid() {
                    Ok(self)
                } else {
                    Err(Error::Status(Status::InvalidHandle))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for CS_Handle {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

handle_type!(
    /// Handle of a video source.
    SourceHandle
);
handle_type!(
    /// Handle of a video sink.
    SinkHandle
);
handle_type!(
    /// Handle of a property belonging to a source or sink.
    PropertyHandle
);
handle_type!(
    /// Handle of a registered event listener.
    ListenerHandle
);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    #[test]
    fn test_zero_is_invalid() {
        assert!(!SourceHandle::INVALID.is_valid());
        assert_eq!(SinkHandle::default(), SinkHandle::INVALID);
        match PropertyHandle::from_raw(0).live() {
            Err(Error::Status(Status::InvalidHandle)) => {}
            other => panic!("expected invalid handle, got {:?}", other),
        }
        assert!(ListenerHandle::from_raw(-7).live().is_ok());
    }

    #[test]
    fn test_equality_by_raw_value() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let raw: i32 = rng.random_range(1..i32::MAX);
            let a = SourceHandle::from_raw(raw);
            let b = SourceHandle::from_raw(raw);
            assert_eq!(a, b);
            assert_eq!(a.raw(), raw);
            assert_eq!(i32::from(b), raw);

            let mut set = HashSet::new();
            set.insert(a);
            assert!(set.contains(&b));
            assert!(!set.insert(b));
        }
    }

    #[test]
    fn test_display_names_flavor() {
        assert_eq!(SinkHandle::from_raw(42).to_string(), "SinkHandle(42)");
        assert_eq!(ListenerHandle::INVALID.to_string(), "ListenerHandle(0)");
    }
}
