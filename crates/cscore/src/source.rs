// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{
    ffi,
    handle::{PropertyHandle, SinkHandle, SourceHandle},
    marshal::{to_c_string, Enumerated},
    mode::{ConnectionStrategy, PixelFormat, VideoMode},
    property::VideoProperty,
    sink::VideoSink,
    Error,
};
use log::{debug, warn};
use std::{
    fmt,
    hash::{Hash, Hasher},
    os::raw::c_int,
};

/// Kind of a video source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    #[default]
    Unknown,
    Usb,
    Http,
    Cv,
    Raw,
}

impl SourceKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::CS_SourceKind_CS_SOURCE_USB => SourceKind::Usb,
            ffi::CS_SourceKind_CS_SOURCE_HTTP => SourceKind::Http,
            ffi::CS_SourceKind_CS_SOURCE_CV => SourceKind::Cv,
            ffi::CS_SourceKind_CS_SOURCE_RAW => SourceKind::Raw,
            _ => SourceKind::Unknown,
        }
    }

    pub fn raw(self) -> c_int {
        match self {
            SourceKind::Unknown => ffi::CS_SourceKind_CS_SOURCE_UNKNOWN,
            SourceKind::Usb => ffi::CS_SourceKind_CS_SOURCE_USB,
            SourceKind::Http => ffi::CS_SourceKind_CS_SOURCE_HTTP,
            SourceKind::Cv => ffi::CS_SourceKind_CS_SOURCE_CV,
            SourceKind::Raw => ffi::CS_SourceKind_CS_SOURCE_RAW,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SourceKind::Unknown => "unknown",
            SourceKind::Usb => "usb",
            SourceKind::Http => "http",
            SourceKind::Cv => "cv",
            SourceKind::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// A video source owned through one engine reference.
///
/// Dropping the wrapper releases that reference. Several wrappers may hold
/// references to the same source; they compare equal. Releasing takes
/// `&mut self`, so only the owner can dispose of a wrapper.
pub struct VideoSource {
    handle: SourceHandle,
}

impl VideoSource {
    /// Take ownership of one reference to `handle`, as returned by a create
    /// or copy call.
    pub fn from_handle(handle: SourceHandle) -> Self {
        VideoSource { handle }
    }

    /// Take a new reference to a source whose handle is only borrowed, such
    /// as one found in an enumeration buffer or an event record.
    pub fn copy_from(handle: SourceHandle) -> Result<Self, Error> {
        let handle = handle.live()?;
        let copy = cs_status!(CS_CopySource(handle.raw()))?;
        debug!("copied source {} as {}", handle.raw(), copy);
        Ok(VideoSource::from_handle(SourceHandle::from_raw(copy)))
    }

    /// Take another reference to the same source.
    pub fn try_clone(&self) -> Result<Self, Error> {
        VideoSource::copy_from(self.handle)
    }

    pub fn handle(&self) -> SourceHandle {
        self.handle
    }

    /// Give up ownership without releasing the reference.
    pub fn into_handle(mut self) -> SourceHandle {
        std::mem::take(&mut self.handle)
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Release the engine reference.
    ///
    /// The handle is reset to zero first, so calling this again, or dropping
    /// the wrapper afterwards, does nothing. Failures are logged, never
    /// returned.
    pub fn release(&mut self) {
        let handle = std::mem::take(&mut self.handle);
        if !handle.is_valid() {
            return;
        }
        match release_source(handle) {
            Ok(()) => debug!("released source {}", handle.raw()),
            Err(err) => warn!("failed to release source {}: {}", handle.raw(), err),
        }
    }

    pub fn kind(&self) -> Result<SourceKind, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetSourceKind(handle.raw())).map(SourceKind::from_raw)
    }

    pub fn name(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSourceName(handle.raw()))
    }

    pub fn description(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSourceDescription(handle.raw()))
    }

    /// Engine timestamp of the most recent frame, zero when none arrived.
    pub fn last_frame_time(&self) -> Result<u64, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_GetSourceLastFrameTime(handle.raw()))
    }

    pub fn set_connection_strategy(&self, strategy: ConnectionStrategy) -> Result<(), Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetSourceConnectionStrategy(handle.raw(), strategy.raw()))
    }

    pub fn is_connected(&self) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_IsSourceConnected(handle.raw())).map(|v| v != 0)
    }

    pub fn is_enabled(&self) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_IsSourceEnabled(handle.raw())).map(|v| v != 0)
    }

    pub fn property(&self, name: &str) -> Result<VideoProperty, Error> {
        let handle = self.handle.live()?;
        let name = to_c_string(name)?;
        let property = cs_status!(CS_GetSourceProperty(handle.raw(), name.as_ptr()))?;
        VideoProperty::from_handle(PropertyHandle::from_raw(property))
    }

    pub fn enumerate_properties(&self) -> Result<Vec<VideoProperty>, Error> {
        let handle = self.handle.live()?;
        let free = crate::cs_fn!(CS_FreeEnumeratedProperties);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateSourceProperties(handle.raw(), &mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, free) };
        crate::status::check(status)?;
        list.map_to_vec(|p| VideoProperty::from_handle(PropertyHandle::from_raw(p)))
    }

    pub fn video_mode(&self) -> Result<VideoMode, Error> {
        let handle = self.handle.live()?;
        let mut mode = ffi::CS_VideoMode::default();
        cs_status!(CS_GetSourceVideoMode(handle.raw(), &mut mode))?;
        Ok(VideoMode::from(mode))
    }

    /// Request a video mode. Returns whether the engine accepted it.
    pub fn set_video_mode(&self, mode: &VideoMode) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        let raw = mode.to_raw();
        cs_status!(CS_SetSourceVideoMode(handle.raw(), &raw)).map(|v| v != 0)
    }

    pub fn set_video_mode_discrete(
        &self,
        pixel_format: PixelFormat,
        width: i32,
        height: i32,
        fps: i32,
    ) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetSourceVideoModeDiscrete(
            handle.raw(),
            pixel_format.raw(),
            width,
            height,
            fps
        ))
        .map(|v| v != 0)
    }

    pub fn set_pixel_format(&self, pixel_format: PixelFormat) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetSourcePixelFormat(handle.raw(), pixel_format.raw())).map(|v| v != 0)
    }

    pub fn set_resolution(&self, width: i32, height: i32) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetSourceResolution(handle.raw(), width, height)).map(|v| v != 0)
    }

    pub fn set_fps(&self, fps: i32) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        cs_status!(CS_SetSourceFPS(handle.raw(), fps)).map(|v| v != 0)
    }

    /// Apply engine settings given as a JSON object.
    pub fn set_config_json(&self, config: &str) -> Result<bool, Error> {
        let handle = self.handle.live()?;
        let config = to_c_string(config)?;
        cs_status!(CS_SetSourceConfigJson(handle.raw(), config.as_ptr())).map(|v| v != 0)
    }

    pub fn config_json(&self) -> Result<String, Error> {
        let handle = self.handle.live()?;
        cs_string!(CS_GetSourceConfigJson(handle.raw()))
    }

    pub fn enumerate_video_modes(&self) -> Result<Vec<VideoMode>, Error> {
        let handle = self.handle.live()?;
        let free = crate::cs_fn!(CS_FreeEnumeratedVideoModes);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateSourceVideoModes(handle.raw(), &mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, free) };
        crate::status::check(status)?;
        list.map_to_vec(|mode| Ok(VideoMode::from(mode)))
    }

    /// Sinks currently attached to this source, each holding its own
    /// reference.
    pub fn enumerate_sinks(&self) -> Result<Vec<VideoSink>, Error> {
        let handle = self.handle.live()?;
        let release = crate::cs_fn!(CS_ReleaseEnumeratedSinks);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateSourceSinks(handle.raw(), &mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, release) };
        crate::status::check(status)?;
        list.map_to_vec(|sink| VideoSink::copy_from(SinkHandle::from_raw(sink)))
    }

    /// Every source that exists in the process, each holding its own
    /// reference.
    pub fn enumerate_sources() -> Result<Vec<VideoSource>, Error> {
        let release = crate::cs_fn!(CS_ReleaseEnumeratedSources);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateSources(&mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, release) };
        crate::status::check(status)?;
        list.map_to_vec(|source| VideoSource::copy_from(SourceHandle::from_raw(source)))
    }
}

fn release_source(handle: SourceHandle) -> Result<(), Error> {
    cs_status!(CS_ReleaseSource(handle.raw()))
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.release();
    }
}

impl PartialEq for VideoSource {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for VideoSource {}

impl Hash for VideoSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VideoSource")
            .field("handle", &self.handle.raw())
            .finish()
    }
}
