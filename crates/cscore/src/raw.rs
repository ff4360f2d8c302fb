// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Sources fed and sinks drained by application code.
//!
//! Frame buffers exchanged with these endpoints are allocated by the engine
//! so it can grow them while grabbing; [`RawFrame`] owns one and returns it
//! to the engine on drop.

use crate::{
    ffi,
    handle::{PropertyHandle, SinkHandle, SourceHandle},
    marshal::{to_c_string, CStringArray},
    mode::{PixelFormat, VideoMode},
    property::{PropertyKind, VideoProperty},
    sink::VideoSink,
    source::VideoSource,
    Error,
};
use log::{debug, warn};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    os::raw::c_int,
    ptr, slice,
    time::Duration,
};

/// An image buffer allocated by the engine.
pub struct RawFrame {
    raw: ffi::CS_RawFrame,
}

impl RawFrame {
    /// An empty frame; grabbing into it allocates the buffer.
    pub fn new() -> Self {
        RawFrame {
            raw: ffi::CS_RawFrame::default(),
        }
    }

    /// A frame holding a copy of `data` described by `mode`'s pixel format
    /// and resolution.
    pub fn from_data(mode: &VideoMode, data: &[u8]) -> Result<Self, Error> {
        let mut frame = RawFrame::new();
        frame.reserve(data.len())?;
        if !data.is_empty() {
            unsafe {
                ptr::copy_nonoverlapping(data.as_ptr(), frame.raw.data.cast::<u8>(), data.len())
            };
        }
        frame.raw.totalData = c_int::try_from(data.len())?;
        frame.set_format(mode.pixel_format, mode.width, mode.height);
        Ok(frame)
    }

    /// Make sure the buffer holds at least `size` bytes.
    pub fn reserve(&mut self, size: usize) -> Result<(), Error> {
        let size = c_int::try_from(size)?;
        cs!(CS_AllocateRawFrameData(&mut self.raw, size));
        if size > 0 && self.raw.data.is_null() {
            return Err(Error::NullPointer);
        }
        Ok(())
    }

    pub fn set_format(&mut self, pixel_format: PixelFormat, width: i32, height: i32) {
        self.raw.pixelFormat = pixel_format.raw();
        self.raw.width = width;
        self.raw.height = height;
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_raw(self.raw.pixelFormat)
    }

    pub fn width(&self) -> i32 {
        self.raw.width
    }

    pub fn height(&self) -> i32 {
        self.raw.height
    }

    /// Allocated size of the buffer.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.raw.dataLength).unwrap_or(0)
    }

    /// Image bytes of the last frame grabbed or stored.
    pub fn data(&self) -> &[u8] {
        let len = usize::try_from(self.raw.totalData)
            .unwrap_or(0)
            .min(self.capacity());
        if self.raw.data.is_null() || len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.data.cast::<u8>(), len) }
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        let len = usize::try_from(self.raw.totalData)
            .unwrap_or(0)
            .min(self.capacity());
        if self.raw.data.is_null() || len == 0 {
            return &mut [];
        }
        unsafe { slice::from_raw_parts_mut(self.raw.data.cast::<u8>(), len) }
    }
}

impl Default for RawFrame {
    fn default() -> Self {
        RawFrame::new()
    }
}

impl Drop for RawFrame {
    fn drop(&mut self) {
        if self.raw.data.is_null() {
            return;
        }
        // A non-null buffer can only come from a loaded library.
        match ffi::try_library().map(|lib| lib.CS_FreeRawFrameData.as_ref().map(|f| *f)) {
            Some(Ok(free)) => unsafe { free(&mut self.raw) },
            _ => warn!("leaking raw frame buffer, CS_FreeRawFrameData unavailable"),
        }
        self.raw.data = ptr::null_mut();
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("pixel_format", &self.pixel_format())
            .field("width", &self.raw.width)
            .field("height", &self.raw.height)
            .field("len", &self.data().len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// A source whose frames are supplied by the application.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RawSource {
    source: VideoSource,
}

impl RawSource {
    pub fn new(name: &str, mode: &VideoMode) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let raw = mode.to_raw();
        let handle = cs_status!(CS_CreateRawSource(cname.as_ptr(), &raw))?;
        debug!("created raw source {} ({}) as {}", name, mode, handle);
        Ok(RawSource {
            source: VideoSource::from_handle(SourceHandle::from_raw(handle)),
        })
    }

    pub fn put_frame(&self, frame: &RawFrame) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_PutRawSourceFrame(handle.raw(), &frame.raw))
    }

    /// Report an error to sinks in place of a frame.
    pub fn notify_error(&self, msg: &str) -> Result<(), Error> {
        let handle = self.handle().live()?;
        let msg = to_c_string(msg)?;
        cs_status!(CS_NotifySourceError(handle.raw(), msg.as_ptr()))
    }

    pub fn set_connected(&self, connected: bool) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetSourceConnected(handle.raw(), c_int::from(connected)))
    }

    pub fn set_description(&self, description: &str) -> Result<(), Error> {
        let handle = self.handle().live()?;
        let description = to_c_string(description)?;
        cs_status!(CS_SetSourceDescription(handle.raw(), description.as_ptr()))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_property(
        &self,
        name: &str,
        kind: PropertyKind,
        minimum: i32,
        maximum: i32,
        step: i32,
        default_value: i32,
        value: i32,
    ) -> Result<VideoProperty, Error> {
        let handle = self.handle().live()?;
        let cname = to_c_string(name)?;
        let property = cs_status!(CS_CreateSourceProperty(
            handle.raw(),
            cname.as_ptr(),
            kind.raw(),
            minimum,
            maximum,
            step,
            default_value,
            value
        ))?;
        debug!("created {} property {} on source {}", kind, name, handle.raw());
        Ok(VideoProperty::with_kind(
            PropertyHandle::from_raw(property),
            kind,
        ))
    }

    pub fn create_integer_property(
        &self,
        name: &str,
        minimum: i32,
        maximum: i32,
        step: i32,
        default_value: i32,
        value: i32,
    ) -> Result<VideoProperty, Error> {
        self.create_property(
            name,
            PropertyKind::Integer,
            minimum,
            maximum,
            step,
            default_value,
            value,
        )
    }

    pub fn create_boolean_property(
        &self,
        name: &str,
        default_value: bool,
        value: bool,
    ) -> Result<VideoProperty, Error> {
        self.create_property(
            name,
            PropertyKind::Boolean,
            0,
            1,
            1,
            i32::from(default_value),
            i32::from(value),
        )
    }

    pub fn create_string_property(&self, name: &str, value: &str) -> Result<VideoProperty, Error> {
        let property = self.create_property(name, PropertyKind::String, 0, 0, 0, 0, 0)?;
        property.set_string(value)?;
        Ok(property)
    }

    /// Replace the choice labels of an enum property.
    pub fn set_enum_property_choices<S: AsRef<str>>(
        &self,
        property: &VideoProperty,
        choices: &[S],
    ) -> Result<(), Error> {
        let handle = self.handle().live()?;
        let property = property.handle().live()?;
        let mut cchoices = CStringArray::new(choices)?;
        let count = cchoices.len()?;
        cs_status!(CS_SetSourceEnumPropertyChoices(
            handle.raw(),
            property.raw(),
            cchoices.as_mut_ptr(),
            count
        ))
    }

    pub fn into_source(self) -> VideoSource {
        self.source
    }
}

impl Deref for RawSource {
    type Target = VideoSource;

    fn deref(&self) -> &VideoSource {
        &self.source
    }
}

impl DerefMut for RawSource {
    fn deref_mut(&mut self) -> &mut VideoSource {
        &mut self.source
    }
}

/// A sink whose frames are pulled by the application.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RawSink {
    sink: VideoSink,
}

impl RawSink {
    pub fn new(name: &str) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let handle = cs_status!(CS_CreateRawSink(cname.as_ptr()))?;
        debug!("created raw sink {} as {}", name, handle);
        Ok(RawSink {
            sink: VideoSink::from_handle(SinkHandle::from_raw(handle)),
        })
    }

    /// Wait for the next frame and copy it into `frame`.
    ///
    /// Returns the frame time, or zero when no frame could be grabbed; the
    /// reason is then available from [`RawSink::error`].
    pub fn grab_frame(&self, frame: &mut RawFrame) -> Result<u64, Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_GrabRawSinkFrame(handle.raw(), &mut frame.raw))
    }

    /// Same as [`RawSink::grab_frame`] giving up after `timeout`.
    pub fn grab_frame_timeout(&self, frame: &mut RawFrame, timeout: Duration) -> Result<u64, Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_GrabRawSinkFrameTimeout(
            handle.raw(),
            &mut frame.raw,
            timeout.as_secs_f64()
        ))
    }

    /// Text of the last grab failure.
    pub fn error(&self) -> Result<String, Error> {
        let handle = self.handle().live()?;
        cs_string!(CS_GetSinkError(handle.raw()))
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetSinkEnabled(handle.raw(), c_int::from(enabled)))
    }

    pub fn set_description(&self, description: &str) -> Result<(), Error> {
        let handle = self.handle().live()?;
        let description = to_c_string(description)?;
        cs_status!(CS_SetSinkDescription(handle.raw(), description.as_ptr()))
    }

    pub fn into_sink(self) -> VideoSink {
        self.sink
    }
}

impl Deref for RawSink {
    type Target = VideoSink;

    fn deref(&self) -> &VideoSink {
        &self.sink
    }
}

impl DerefMut for RawSink {
    fn deref_mut(&mut self) -> &mut VideoSink {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame() {
        let mut frame = RawFrame::new();
        assert!(frame.data().is_empty());
        assert!(frame.data_mut().is_empty());
        assert_eq!(frame.capacity(), 0);
        frame.set_format(PixelFormat::Bgr, 640, 480);
        assert_eq!(frame.pixel_format(), PixelFormat::Bgr);
        assert_eq!((frame.width(), frame.height()), (640, 480));
        drop(frame);
    }

    #[test]
    fn test_zero_handle_endpoints_fail() {
        let sink = RawSink {
            sink: VideoSink::from_handle(SinkHandle::INVALID),
        };
        let mut frame = RawFrame::new();
        assert!(sink.grab_frame(&mut frame).is_err());
        assert!(sink
            .grab_frame_timeout(&mut frame, Duration::from_millis(10))
            .is_err());

        let source = RawSource {
            source: VideoSource::from_handle(SourceHandle::INVALID),
        };
        assert!(source.put_frame(&frame).is_err());
        assert!(source.notify_error("lost").is_err());
        assert!(source
            .create_integer_property("brightness", 0, 100, 1, 50, 50)
            .is_err());
    }
}
