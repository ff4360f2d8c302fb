// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{
    ffi,
    handle::{PropertyHandle, SinkHandle, SourceHandle},
    marshal::{to_c_string, Enumerated},
    property::VideoProperty,
    source::VideoSource,
    Error,
};
use log::{debug, warn};
use std::{
    fmt,
    hash::{Hash, Hasher},
    os::raw::c_int,
};

/// Kind of a video sink.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    #[default]
    Unknown,
    Mjpeg,
    Cv,
    Raw,
}

impl SinkKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::CS_SinkKind_CS_SINK_MJPEG => SinkKind::Mjpeg,
            ffi::CS_SinkKind_CS_SINK_CV => SinkKind::Cv,
            ffi::CS_SinkKind_CS_SINK_RAW => SinkKind::Raw,
            _ => SinkKind::Unknown,
        }
    }

    pub fn raw(self) -> c_int {
        match self {
            SinkKind::Unknown => ffi::CS_SinkKind_CS_SINK_UNKNOWN,
            SinkKind::Mjpeg => ffi::CS_SinkKind_CS_SINK_MJPEG,
            SinkKind::Cv => ffi::CS_SinkKind_CS_SINK_CV,
            SinkKind::Raw => ffi::CS_SinkKind_CS_SINK_RAW,
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SinkKind::Unknown => "unknown",
            SinkKind::Mjpeg => "mjpeg",
            SinkKind::Cv => "cv",
            SinkKind::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// A video sink owned through one engine reference.
///
/// Same ownership rules as [`VideoSource`]: dropping releases the
/// reference, releasing twice is a no-op, equality is by handle.
pub struct VideoSink {
    handle: SinkHandle,
}

impl VideoSink {
    /// Take ownership of one reference to `handle`.
    pub fn from_handle(handle: SinkHandle) -> Self {
        VideoSink { handle }
    }

    /// Take a new reference to a sink whose handle is only borrowed.
    pub fn copy_from(handle: SinkHandle) -> Result<Self, Error> {
        let handle = handle.live()?;
        let copy = cs_status!(CS_CopySink(handle.raw()))?;
        debug!("copied sink {} as {}", handle.raw(), copy);
        Ok(VideoSink::from_handle(SinkHandle::from_raw(copy)))
    }

    pub fn try_clone(&self) -> Result<Self, Error> {
        VideoSink::copy_from(self.handle)
    }

    pub fn handle(&self) -> SinkHandle {
        self.handle
    }

    /// Give up ownership without releasing the reference.
    pub fn into_handle(mut self) -> SinkHandle {
        std::mem::take(&mut self.handle)
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Release the engine reference. Idempotent; failures are logged.
    pub fn release(&mut self) {
        let handle = std::mem::take(&mut self.handle);
        if !handle.is_valid() {
            return;
        }
        match release_sink(handle) {
            Ok(()) => debug!("released sink {}", handle.raw()),
            Err(err) => warn!("failed to release sink {}: {}", handle.raw(), err),
        }
    }

    pub fn kind(&self) -> Result<SinkKind, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetSinkKind(handle.raw())).map(SinkKind::from_raw)
    }

    pub fn name(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSinkName(handle.raw()))
    }

    pub fn description(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSinkDescription(handle.raw()))
    }

    /// Attach a source, or detach with `None`.
    pub fn set_source(&self, source: Option<&VideoSource>) -> Result<(), Error> {
        let handle = self.handle.live()?;
        let source = source.map(VideoSource::handle).unwrap_or_default();
        cs_status!(CS_SetSinkSource(handle.raw(), source.raw()))
    }

    /// The attached source with its own reference, `None` when detached.
    pub fn source(&self) -> Result<Option<VideoSource>, Error> {
        let handle = self.handle.live()?;
        let source = SourceHandle::from_raw(cs_status!(CS_GetSinkSource(handle.raw()))?);
        if !source.is_valid() {
            return Ok(None);
        }
        VideoSource::copy_from(source).map(Some)
    }

    /// Property of the attached source, looked up through the sink.
    pub fn source_property(&self, name: &str) -> Result<VideoProperty, Error> {
        let handle = self.handle.live()?;
        let name = to_c_string(name)?;
        let property = cs_status!(CS_GetSinkSourceProperty(handle.raw(), name.as_ptr()))?;
        VideoProperty::from_handle(PropertyHandle::from_raw(property))
    }

    pub fn property(&self, name: &str) -> Result<VideoProperty, Error> {
        let handle = self.handle.live()?;
        let name = to_c_string(name)?;
        let property = cs_status!(CS_GetSinkProperty(handle.raw(), name.as_ptr()))?;
        VideoProperty::from_handle(PropertyHandle::from_raw(property))
    }

    pub fn set_config_json(&self, config: &str) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        let config = to_c_string(config)?;
        cs_status!(CS_SetSinkConfigJson(handle.raw(), config.as_ptr())).map(|v| v != 0)
    }

    pub fn config_json(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSinkConfigJson(handle.raw()))
    }

    /// Every sink that exists in the process, each holding its own
    /// reference.
    pub fn enumerate_sinks() -> Result<Vec<VideoSink>, Error> {
        let release = crate::cs_fn!(CS_ReleaseEnumeratedSinks);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateSinks(&mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, release) };
        crate::status::check(status)?;
        list.map_to_vec(|sink| VideoSink::copy_from(SinkHandle::from_raw(sink)))
    }
}

fn release_sink(handle: SinkHandle) -> Result<(), Error> {
    cs_status!(CS_ReleaseSink(handle.raw()))
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        self.release();
    }
}

impl PartialEq for VideoSink {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for VideoSink {}

impl Hash for VideoSink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl fmt::Debug for VideoSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VideoSink")
            .field("handle", &self.handle.raw())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use rand::Rng;
    use std::collections::HashSet;

    fn assert_invalid<T: fmt::Debug>(result: Result<T, Error>) {
        assert_eq!(result.unwrap_err().status(), Some(Status::InvalidHandle));
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(SinkKind::from_raw(2), SinkKind::Mjpeg);
        assert_eq!(SinkKind::from_raw(4), SinkKind::Cv);
        assert_eq!(SinkKind::from_raw(8), SinkKind::Raw);
        assert_eq!(SinkKind::from_raw(1), SinkKind::Unknown);
        assert_eq!(SinkKind::Mjpeg.raw(), 2);
    }

    #[test]
    fn test_zero_handle_operations_fail() {
        let sink = VideoSink::from_handle(SinkHandle::INVALID);
        assert_invalid(sink.kind());
        assert_invalid(sink.name());
        assert_invalid(sink.description());
        assert_invalid(sink.set_source(None));
        assert_invalid(sink.source());
        assert_invalid(sink.source_property("brightness"));
        assert_invalid(sink.property("compression"));
        assert_invalid(sink.set_config_json("{}"));
        assert_invalid(sink.config_json());
        assert_invalid(sink.try_clone());
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut sink = VideoSink::from_handle(SinkHandle::INVALID);
        sink.release();
        sink.release();
        drop(sink);
    }

    #[test]
    fn test_hash_matches_handle() {
        let mut rng = rand::rng();
        let raw: i32 = rng.random_range(1..10_000);
        let mut set = HashSet::new();
        set.insert(VideoSink::from_handle(SinkHandle::from_raw(raw)).into_handle());
        assert!(set.contains(&SinkHandle::from_raw(raw)));
    }
}
