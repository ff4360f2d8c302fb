// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{
    ffi,
    handle::PropertyHandle,
    marshal::{to_c_string, Enumerated},
    Error,
};
use std::{fmt, os::raw::c_int};

/// Value type of a property.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    #[default]
    None,
    Boolean,
    Integer,
    String,
    Enum,
}

impl PropertyKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::CS_PropertyKind_CS_PROP_BOOLEAN => PropertyKind::Boolean,
            ffi::CS_PropertyKind_CS_PROP_INTEGER => PropertyKind::Integer,
            ffi::CS_PropertyKind_CS_PROP_STRING => PropertyKind::String,
            ffi::CS_PropertyKind_CS_PROP_ENUM => PropertyKind::Enum,
            _ => PropertyKind::None,
        }
    }

    pub fn raw(self) -> c_int {
        match self {
            PropertyKind::None => ffi::CS_PropertyKind_CS_PROP_NONE,
            PropertyKind::Boolean => ffi::CS_PropertyKind_CS_PROP_BOOLEAN,
            PropertyKind::Integer => ffi::CS_PropertyKind_CS_PROP_INTEGER,
            PropertyKind::String => ffi::CS_PropertyKind_CS_PROP_STRING,
            PropertyKind::Enum => ffi::CS_PropertyKind_CS_PROP_ENUM,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PropertyKind::None => "none",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Integer => "integer",
            PropertyKind::String => "string",
            PropertyKind::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// A property of a source or sink.
///
/// The handle is scoped to its owner and is not reference counted, so the
/// wrapper has nothing to release. The kind is read once when the wrapper is
/// built and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoProperty {
    handle: PropertyHandle,
    kind: PropertyKind,
}

impl VideoProperty {
    /// Wrap a property handle, reading its kind from the engine.
    pub fn from_handle(handle: PropertyHandle) -> Result<Self, Error> {
        let handle = handle.live()?;
        let kind = cs_status!(CS_GetPropertyKind(handle.raw()))?;
        Ok(VideoProperty {
            handle,
            kind: PropertyKind::from_raw(kind),
        })
    }

    /// Wrap a property handle whose kind is already known, as in event
    /// records.
    pub(crate) fn with_kind(handle: PropertyHandle, kind: PropertyKind) -> Self {
        VideoProperty { handle, kind }
    }

    pub fn handle(&self) -> PropertyHandle {
        self.handle
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.kind != PropertyKind::None
    }

    pub fn is_boolean(&self) -> bool {
        self.kind == PropertyKind::Boolean
    }

    pub fn is_integer(&self) -> bool {
        self.kind == PropertyKind::Integer
    }

    pub fn is_string(&self) -> bool {
        self.kind == PropertyKind::String
    }

    pub fn is_enum(&self) -> bool {
        self.kind == PropertyKind::Enum
    }

    pub fn name(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetPropertyName(handle.raw()))
    }

    /// Integer value of the property. Booleans read as 0 or 1 and enums as
    /// the index of the selected choice.
    pub fn get(&self) -> Result<i32, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetProperty(handle.raw()))
    }

    pub fn set(&self, value: i32) -> Result<(), Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetProperty(handle.raw(), value))
    }

    pub fn min(&self) -> Result<i32, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetPropertyMin(handle.raw()))
    }

    pub fn max(&self) -> Result<i32, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetPropertyMax(handle.raw()))
    }

    pub fn step(&self) -> Result<i32, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetPropertyStep(handle.raw()))
    }

    pub fn default_value(&self) -> Result<i32, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetPropertyDefault(handle.raw()))
    }

    pub fn get_string(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetStringProperty(handle.raw()))
    }

    pub fn set_string(&self, value: &str) -> Result<(), Error> {
        let handle = self.handle.live()?;
        let value = to_c_string(value)?;
        cs_status!(CS_SetStringProperty(handle.raw(), value.as_ptr()))
    }

    /// Choice labels of an enum property, indexed by value.
    pub fn choices(&self) -> Result<Vec<String>, Error> {
        let handle = self.handle.live()?;
        let free = crate::cs_fn!(CS_FreeEnumPropertyChoices);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_GetEnumPropertyChoices(handle.raw(), &mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, free) };
        crate::status::check(status)?;
        list.to_strings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_kind_codes() {
        for kind in [
            PropertyKind::None,
            PropertyKind::Boolean,
            PropertyKind::Integer,
            PropertyKind::String,
            PropertyKind::Enum,
        ] {
            assert_eq!(PropertyKind::from_raw(kind.raw()), kind);
        }
        assert_eq!(PropertyKind::Integer.raw(), 2);
        assert_eq!(PropertyKind::Enum.raw(), 8);
        assert_eq!(PropertyKind::from_raw(3), PropertyKind::None);
    }

    #[test]
    fn test_cached_kind_predicates() {
        let prop = VideoProperty::with_kind(PropertyHandle::from_raw(11), PropertyKind::Enum);
        assert!(prop.is_valid());
        assert!(prop.is_enum());
        assert!(!prop.is_integer());

        let none = VideoProperty::with_kind(PropertyHandle::from_raw(12), PropertyKind::None);
        assert!(!none.is_valid());
    }

    #[test]
    fn test_zero_handle_rejected() {
        let prop = VideoProperty::with_kind(PropertyHandle::INVALID, PropertyKind::Integer);
        for result in [prop.get(), prop.min(), prop.max(), prop.step(), prop.default_value()] {
            assert_eq!(result.unwrap_err().status(), Some(Status::InvalidHandle));
        }
        assert_eq!(prop.set(1).unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(prop.name().unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(prop.choices().unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(
            VideoProperty::from_handle(PropertyHandle::INVALID)
                .unwrap_err()
                .status(),
            Some(Status::InvalidHandle)
        );
    }
}
