// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Camera sources.
//!
//! [`VideoCamera`] adds the controls shared by every physical camera to a
//! [`VideoSource`]. [`UsbCamera`] and [`HttpCamera`] build on it. All of them
//! dereference down to [`VideoSource`], so a camera can be passed wherever a
//! source is expected.

use crate::{
    ffi,
    handle::SourceHandle,
    marshal::{decode_lossy, to_c_string, CStringArray, Enumerated, NativeBox},
    source::VideoSource,
    Error,
};
use log::debug;
use std::{
    fmt,
    ops::{Deref, DerefMut},
    os::raw::c_int,
    slice,
};

/// Manual white balance presets, in kelvin.
pub mod white_balance {
    pub const FIXED_INDOOR: i32 = 3000;
    pub const FIXED_OUTDOOR1: i32 = 4000;
    pub const FIXED_OUTDOOR2: i32 = 5000;
    pub const FIXED_FLUORESCENT1: i32 = 5100;
    pub const FIXED_FLUORESCENT2: i32 = 5200;
}

/// A source backed by a physical camera.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct VideoCamera {
    source: VideoSource,
}

impl VideoCamera {
    pub fn from_source(source: VideoSource) -> Self {
        VideoCamera { source }
    }

    pub fn into_source(self) -> VideoSource {
        self.source
    }

    /// Brightness as a percentage, 0 to 100.
    pub fn brightness(&self) -> Result<i32, Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_GetCameraBrightness(handle.raw()))
    }

    pub fn set_brightness(&self, brightness: i32) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraBrightness(handle.raw(), brightness))
    }

    pub fn set_white_balance_auto(&self) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraWhiteBalanceAuto(handle.raw()))
    }

    pub fn set_white_balance_hold_current(&self) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraWhiteBalanceHoldCurrent(handle.raw()))
    }

    /// Fix the white balance, see [`white_balance`] for common values.
    pub fn set_white_balance_manual(&self, value: i32) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraWhiteBalanceManual(handle.raw(), value))
    }

    pub fn set_exposure_auto(&self) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraExposureAuto(handle.raw()))
    }

    pub fn set_exposure_hold_current(&self) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraExposureHoldCurrent(handle.raw()))
    }

    /// Fix the exposure as a percentage, 0 to 100.
    pub fn set_exposure_manual(&self, value: i32) -> Result<(), Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_SetCameraExposureManual(handle.raw(), value))
    }
}

impl Deref for VideoCamera {
    type Target = VideoSource;

    fn deref(&self) -> &VideoSource {
        &self.source
    }
}

impl DerefMut for VideoCamera {
    fn deref_mut(&mut self) -> &mut VideoSource {
        &mut self.source
    }
}

/// Description of a USB camera attached to the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbCameraInfo {
    /// Device number, N in `/dev/videoN` on Linux.
    pub device: i32,
    /// Device path, such as `/dev/video0`.
    pub path: String,
    /// Name reported by the vendor and driver.
    pub name: String,
    /// Other paths to the same device, such as `/dev/v4l/by-id/...`.
    pub other_paths: Vec<String>,
    pub vendor_id: i32,
    pub product_id: i32,
}

impl UsbCameraInfo {
    /// Copy an engine record into owned values.
    ///
    /// # Safety
    ///
    /// The strings and path list of `raw` must be valid for reads.
    unsafe fn from_raw(raw: &ffi::CS_UsbCameraInfo) -> Result<Self, Error> {
        let other_paths = match usize::try_from(raw.otherPathsCount)? {
            0 => Vec::new(),
            _ if raw.otherPaths.is_null() => return Err(Error::NullPointer),
            len => unsafe { slice::from_raw_parts(raw.otherPaths, len) }
                .iter()
                .map(|p| unsafe { decode_lossy(*p) })
                .collect(),
        };
        Ok(UsbCameraInfo {
            device: raw.dev,
            path: unsafe { decode_lossy(raw.path) },
            name: unsafe { decode_lossy(raw.name) },
            other_paths,
            vendor_id: raw.vendorId,
            product_id: raw.productId,
        })
    }
}

impl fmt::Display for UsbCameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{:04x}:{:04x}]",
            self.name, self.path, self.vendor_id, self.product_id
        )
    }
}

/// A USB camera.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct UsbCamera {
    camera: VideoCamera,
}

impl UsbCamera {
    /// Open a camera by device number, N in `/dev/videoN` on Linux.
    pub fn from_device(name: &str, dev: i32) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let handle = cs_status!(CS_CreateUsbCameraDev(cname.as_ptr(), dev))?;
        debug!("created usb camera {} for device {} as {}", name, dev, handle);
        Ok(UsbCamera::wrap(handle))
    }

    /// Open a camera by device path.
    pub fn from_path(name: &str, path: &str) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let cpath = to_c_string(path)?;
        let handle = cs_status!(CS_CreateUsbCameraPath(cname.as_ptr(), cpath.as_ptr()))?;
        debug!("created usb camera {} for {} as {}", name, path, handle);
        Ok(UsbCamera::wrap(handle))
    }

    fn wrap(handle: c_int) -> Self {
        UsbCamera {
            camera: VideoCamera::from_source(VideoSource::from_handle(SourceHandle::from_raw(
                handle,
            ))),
        }
    }

    /// List the USB cameras currently attached.
    pub fn enumerate() -> Result<Vec<UsbCameraInfo>, Error> {
        let free = crate::cs_fn!(CS_FreeEnumeratedUsbCameras);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_EnumerateUsbCameras(&mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, free) };
        crate::status::check(status)?;
        list.as_slice()
            .iter()
            .map(|info| unsafe { UsbCameraInfo::from_raw(info) })
            .collect()
    }

    pub fn path(&self) -> Result<String, Error> {
        let handle = self.handle().live()?;
        cs_string!(CS_GetUsbCameraPath(handle.raw()))
    }

    pub fn info(&self) -> Result<UsbCameraInfo, Error> {
        let handle = self.handle().live()?;
        let free = crate::cs_fn!(CS_FreeUsbCameraInfo);
        let mut status = 0;
        let ptr = cs!(CS_GetUsbCameraInfo(handle.raw(), &mut status));
        let info = unsafe { NativeBox::from_raw(ptr, free) };
        crate::status::check(status)?;
        let raw = info.get().ok_or(Error::NullPointer)?;
        unsafe { UsbCameraInfo::from_raw(raw) }
    }

    /// Log every connection attempt at info level (1) or only at debug (0).
    pub fn set_connect_verbose(&self, level: i32) -> Result<(), Error> {
        self.property("connect_verbose")?.set(level)
    }

    pub fn into_camera(self) -> VideoCamera {
        self.camera
    }
}

impl Deref for UsbCamera {
    type Target = VideoCamera;

    fn deref(&self) -> &VideoCamera {
        &self.camera
    }
}

impl DerefMut for UsbCamera {
    fn deref_mut(&mut self) -> &mut VideoCamera {
        &mut self.camera
    }
}

/// Protocol flavor of an HTTP camera.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpCameraKind {
    /// Detect the server type from its responses.
    #[default]
    Unknown,
    MjpgStreamer,
    CsCore,
    Axis,
}

impl HttpCameraKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::CS_HttpCameraKind_CS_HTTP_MJPGSTREAMER => HttpCameraKind::MjpgStreamer,
            ffi::CS_HttpCameraKind_CS_HTTP_CSCORE => HttpCameraKind::CsCore,
            ffi::CS_HttpCameraKind_CS_HTTP_AXIS => HttpCameraKind::Axis,
            _ => HttpCameraKind::Unknown,
        }
    }

    pub fn raw(self) -> c_int {
        match self {
            HttpCameraKind::Unknown => ffi::CS_HttpCameraKind_CS_HTTP_UNKNOWN,
            HttpCameraKind::MjpgStreamer => ffi::CS_HttpCameraKind_CS_HTTP_MJPGSTREAMER,
            HttpCameraKind::CsCore => ffi::CS_HttpCameraKind_CS_HTTP_CSCORE,
            HttpCameraKind::Axis => ffi::CS_HttpCameraKind_CS_HTTP_AXIS,
        }
    }
}

/// Stream URL of an Axis camera at `host`.
pub fn axis_url(host: &str) -> String {
    format!("http://{}/mjpg/video.mjpg", host)
}

/// A camera streaming MJPEG over HTTP.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct HttpCamera {
    camera: VideoCamera,
}

impl HttpCamera {
    pub fn new(name: &str, url: &str, kind: HttpCameraKind) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let curl = to_c_string(url)?;
        let handle = cs_status!(CS_CreateHttpCamera(cname.as_ptr(), curl.as_ptr(), kind.raw()))?;
        debug!("created http camera {} for {} as {}", name, url, handle);
        Ok(HttpCamera::wrap(handle))
    }

    /// Create a camera that tries each URL in turn until one connects.
    pub fn with_urls<S: AsRef<str>>(
        name: &str,
        urls: &[S],
        kind: HttpCameraKind,
    ) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let mut curls = CStringArray::new(urls)?;
        let count = curls.len()?;
        let handle = cs_status!(CS_CreateHttpCameraMulti(
            cname.as_ptr(),
            curls.as_mut_ptr(),
            count,
            kind.raw()
        ))?;
        debug!("created http camera {} for {} urls as {}", name, count, handle);
        Ok(HttpCamera::wrap(handle))
    }

    /// Create a source for an Axis IP camera.
    pub fn axis(name: &str, host: &str) -> Result<Self, Error> {
        HttpCamera::new(name, &axis_url(host), HttpCameraKind::Axis)
    }

    /// Create a source for an Axis IP camera reachable at several hosts.
    pub fn axis_hosts<S: AsRef<str>>(name: &str, hosts: &[S]) -> Result<Self, Error> {
        let urls: Vec<String> = hosts.iter().map(|h| axis_url(h.as_ref())).collect();
        HttpCamera::with_urls(name, &urls, HttpCameraKind::Axis)
    }

    fn wrap(handle: c_int) -> Self {
        HttpCamera {
            camera: VideoCamera::from_source(VideoSource::from_handle(SourceHandle::from_raw(
                handle,
            ))),
        }
    }

    pub fn http_kind(&self) -> Result<HttpCameraKind, Error> {
        let handle = self.handle().live()?;
        cs_status!(CS_GetHttpCameraKind(handle.raw())).map(HttpCameraKind::from_raw)
    }

    pub fn set_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<(), Error> {
        let handle = self.handle().live()?;
        let mut curls = CStringArray::new(urls)?;
        let count = curls.len()?;
        cs_status!(CS_SetHttpCameraUrls(handle.raw(), curls.as_mut_ptr(), count))
    }

    pub fn urls(&self) -> Result<Vec<String>, Error> {
        let handle = self.handle().live()?;
        let free = crate::cs_fn!(CS_FreeHttpCameraUrls);
        let mut count = 0;
        let mut status = 0;
        let ptr = cs!(CS_GetHttpCameraUrls(handle.raw(), &mut count, &mut status));
        let list = unsafe { Enumerated::from_raw(ptr, count, free) };
        crate::status::check(status)?;
        list.to_strings()
    }

    pub fn into_camera(self) -> VideoCamera {
        self.camera
    }
}

impl Deref for HttpCamera {
    type Target = VideoCamera;

    fn deref(&self) -> &VideoCamera {
        &self.camera
    }
}

impl DerefMut for HttpCamera {
    fn deref_mut(&mut self) -> &mut VideoCamera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use std::{ffi::CString, ptr};

    #[test]
    fn test_axis_url() {
        assert_eq!(axis_url("10.0.0.11"), "http://10.0.0.11/mjpg/video.mjpg");
    }

    #[test]
    fn test_http_kind_codes() {
        for kind in [
            HttpCameraKind::Unknown,
            HttpCameraKind::MjpgStreamer,
            HttpCameraKind::CsCore,
            HttpCameraKind::Axis,
        ] {
            assert_eq!(HttpCameraKind::from_raw(kind.raw()), kind);
        }
        assert_eq!(HttpCameraKind::Axis.raw(), 3);
    }

    #[test]
    fn test_usb_info_from_raw() {
        let path = CString::new("/dev/video0").unwrap();
        let name = CString::new("HD Webcam").unwrap();
        let by_id = CString::new("/dev/v4l/by-id/usb-cam-video-index0").unwrap();
        let mut others = [by_id.as_ptr() as *mut _];
        let raw = ffi::CS_UsbCameraInfo {
            dev: 0,
            path: path.as_ptr() as *mut _,
            name: name.as_ptr() as *mut _,
            otherPathsCount: 1,
            otherPaths: others.as_mut_ptr(),
            vendorId: 0x046d,
            productId: 0x0825,
        };
        let info = unsafe { UsbCameraInfo::from_raw(&raw) }.unwrap();
        assert_eq!(info.path, "/dev/video0");
        assert_eq!(info.other_paths, vec!["/dev/v4l/by-id/usb-cam-video-index0"]);
        assert_eq!(info.to_string(), "HD Webcam (/dev/video0) [046d:0825]");

        let broken = ffi::CS_UsbCameraInfo {
            otherPaths: ptr::null_mut(),
            ..raw
        };
        assert!(matches!(
            unsafe { UsbCameraInfo::from_raw(&broken) },
            Err(Error::NullPointer)
        ));
    }

    #[test]
    fn test_usb_info_missing_strings_are_empty() {
        let mut others = [ptr::null_mut()];
        let raw = ffi::CS_UsbCameraInfo {
            dev: 2,
            path: ptr::null_mut(),
            name: ptr::null_mut(),
            otherPathsCount: 1,
            otherPaths: others.as_mut_ptr(),
            vendorId: 0,
            productId: 0,
        };
        let info = unsafe { UsbCameraInfo::from_raw(&raw) }.unwrap();
        assert_eq!(info.device, 2);
        assert_eq!(info.path, "");
        assert_eq!(info.name, "");
        assert_eq!(info.other_paths, vec![String::new()]);
    }

    #[test]
    fn test_zero_handle_camera_controls_fail() {
        let camera = VideoCamera::from_source(VideoSource::from_handle(SourceHandle::INVALID));
        assert_eq!(camera.brightness().unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(
            camera.set_exposure_manual(10).unwrap_err().status(),
            Some(Status::InvalidHandle)
        );
        let usb = UsbCamera { camera };
        assert_eq!(usb.path().unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(usb.info().unwrap_err().status(), Some(Status::InvalidHandle));
    }
}
