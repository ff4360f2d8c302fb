// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Crossing the boundary with strings and arrays.
//!
//! Outbound strings are NUL-terminated UTF-8 buffers owned by Rust for the
//! duration of the call. Inbound buffers belong to the engine: they are
//! wrapped in a guard the moment the call returns, copied into owned Rust
//! values, and handed to the engine's matching free function exactly once
//! when the guard drops, whatever path the caller takes.

use crate::Error;
use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_int},
    ptr, slice,
};

/// Encode an outbound string.
pub fn to_c_string(s: &str) -> Result<CString, Error> {
    Ok(CString::new(s)?)
}

/// Decode a NUL-terminated string without taking ownership of it.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated buffer valid for reads
/// for the duration of the call.
pub unsafe fn decode(ptr: *const c_char) -> Result<String, Error> {
    if ptr.is_null() {
        return Err(Error::NullPointer);
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Ok(cstr.to_str()?.to_string())
}

/// Decode a string that may be absent, replacing invalid UTF-8.
///
/// # Safety
///
/// Same as [`decode`].
pub unsafe fn decode_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// A single engine-allocated value released through `free` on drop.
pub struct NativeBox<T> {
    ptr: *mut T,
    free: unsafe extern "C" fn(*mut T),
}

impl<T> NativeBox<T> {
    /// Take ownership of `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a value allocated by the engine that `free`
    /// releases, and nothing else may free it.
    pub unsafe fn from_raw(ptr: *mut T, free: unsafe extern "C" fn(*mut T)) -> Self {
        NativeBox { ptr, free }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    pub fn get(&self) -> Option<&T> {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Drop for NativeBox<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            let ptr = std::mem::replace(&mut self.ptr, ptr::null_mut());
            unsafe { (self.free)(ptr) };
        }
    }
}

/// A string returned by the engine and released with `CS_FreeString`.
pub type NativeString = NativeBox<c_char>;

impl NativeBox<c_char> {
    /// Copy the string out and release the engine buffer.
    pub fn into_string(self) -> Result<String, Error> {
        unsafe { decode(self.ptr) }
    }
}

/// A `(pointer, count)` array returned by the engine.
///
/// `release` runs exactly once when the guard drops, with the pointer and
/// count exactly as the engine returned them, including when the pointer is
/// null or the count is zero.
pub struct Enumerated<T> {
    ptr: *mut T,
    count: c_int,
    release: Option<unsafe extern "C" fn(*mut T, c_int)>,
}

impl<T> Enumerated<T> {
    /// Take ownership of an enumerated array.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to `count` initialized elements that
    /// `release` frees, and nothing else may free it.
    pub unsafe fn from_raw(
        ptr: *mut T,
        count: c_int,
        release: unsafe extern "C" fn(*mut T, c_int),
    ) -> Self {
        Enumerated {
            ptr,
            count,
            release: Some(release),
        }
    }

    pub fn len(&self) -> usize {
        if self.ptr.is_null() {
            0
        } else {
            usize::try_from(self.count).unwrap_or(0)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self.len() {
            0 => &[],
            len => unsafe { slice::from_raw_parts(self.ptr, len) },
        }
    }
}

impl<T: Copy> Enumerated<T> {
    /// Copy every element and map it into an owned value.
    pub fn map_to_vec<U, F>(&self, f: F) -> Result<Vec<U>, Error>
    where
        F: FnMut(T) -> Result<U, Error>,
    {
        self.as_slice().iter().copied().map(f).collect()
    }
}

impl Enumerated<*mut c_char> {
    /// Decode every string of an enumerated string list.
    pub fn to_strings(&self) -> Result<Vec<String>, Error> {
        self.map_to_vec(|s| unsafe { decode(s) })
    }
}

impl<T> Drop for Enumerated<T> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            unsafe { release(self.ptr, self.count) };
        }
    }
}

/// An outbound array of strings.
///
/// Each string is encoded into its own buffer and the array of pointers is
/// built over them. Both live until the value drops, which happens after the
/// call returns on success and failure alike.
pub struct CStringArray {
    _strings: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CStringArray {
    pub fn new<I, S>(items: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strings = items
            .into_iter()
            .map(|s| to_c_string(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs = strings.iter().map(|s| s.as_ptr()).collect();
        Ok(CStringArray {
            _strings: strings,
            ptrs,
        })
    }

    pub fn len(&self) -> Result<c_int, Error> {
        Ok(c_int::try_from(self.ptrs.len())?)
    }

    pub fn is_empty(&self) -> bool {
        self.ptrs.is_empty()
    }

    /// Pointer array for calls declared as taking `const char**`.
    pub fn as_mut_ptr(&mut self) -> *mut *const c_char {
        self.ptrs.as_mut_ptr()
    }
}
