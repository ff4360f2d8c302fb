// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::ffi;
use std::{fmt, os::raw::c_int, str::FromStr};

/// Pixel formats understood by the engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Unknown,
    Mjpeg,
    Yuyv,
    Rgb565,
    Bgr,
    Gray,
    Y16,
    Uyvy,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Unknown,
        PixelFormat::Mjpeg,
        PixelFormat::Yuyv,
        PixelFormat::Rgb565,
        PixelFormat::Bgr,
        PixelFormat::Gray,
        PixelFormat::Y16,
        PixelFormat::Uyvy,
    ];

    /// Values the engine does not know map to `Unknown`.
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::CS_PixelFormat_CS_PIXFMT_MJPEG => PixelFormat::Mjpeg,
            ffi::CS_PixelFormat_CS_PIXFMT_YUYV => PixelFormat::Yuyv,
            ffi::CS_PixelFormat_CS_PIXFMT_RGB565 => PixelFormat::Rgb565,
            ffi::CS_PixelFormat_CS_PIXFMT_BGR => PixelFormat::Bgr,
            ffi::CS_PixelFormat_CS_PIXFMT_GRAY => PixelFormat::Gray,
            ffi::CS_PixelFormat_CS_PIXFMT_Y16 => PixelFormat::Y16,
            ffi::CS_PixelFormat_CS_PIXFMT_UYVY => PixelFormat::Uyvy,
            _ => PixelFormat::Unknown,
        }
    }

    pub fn raw(self) -> c_int {
        match self {
            PixelFormat::Unknown => ffi::CS_PixelFormat_CS_PIXFMT_UNKNOWN,
            PixelFormat::Mjpeg => ffi::CS_PixelFormat_CS_PIXFMT_MJPEG,
            PixelFormat::Yuyv => ffi::CS_PixelFormat_CS_PIXFMT_YUYV,
            PixelFormat::Rgb565 => ffi::CS_PixelFormat_CS_PIXFMT_RGB565,
            PixelFormat::Bgr => ffi::CS_PixelFormat_CS_PIXFMT_BGR,
            PixelFormat::Gray => ffi::CS_PixelFormat_CS_PIXFMT_GRAY,
            PixelFormat::Y16 => ffi::CS_PixelFormat_CS_PIXFMT_Y16,
            PixelFormat::Uyvy => ffi::CS_PixelFormat_CS_PIXFMT_UYVY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Unknown => "unknown",
            PixelFormat::Mjpeg => "mjpeg",
            PixelFormat::Yuyv => "yuyv",
            PixelFormat::Rgb565 => "rgb565",
            PixelFormat::Bgr => "bgr",
            PixelFormat::Gray => "gray",
            PixelFormat::Y16 => "y16",
            PixelFormat::Uyvy => "uyvy",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .into_iter()
            .find(|fmt| fmt.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown pixel format '{}', expected one of: mjpeg, yuyv, rgb565, bgr, gray, y16, uyvy",
                    s
                )
            })
    }
}

/// A pixel format, resolution and frame rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoMode {
    pub pixel_format: PixelFormat,
    pub width: i32,
    pub height: i32,
    pub fps: i32,
}

impl VideoMode {
    pub fn new(pixel_format: PixelFormat, width: i32, height: i32, fps: i32) -> Self {
        VideoMode {
            pixel_format,
            width,
            height,
            fps,
        }
    }

    pub fn to_raw(self) -> ffi::CS_VideoMode {
        ffi::CS_VideoMode {
            pixelFormat: self.pixel_format.raw(),
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

impl From<ffi::CS_VideoMode> for VideoMode {
    fn from(raw: ffi::CS_VideoMode) -> Self {
        VideoMode {
            pixel_format: PixelFormat::from_raw(raw.pixelFormat),
            width: raw.width,
            height: raw.height,
            fps: raw.fps,
        }
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}x{} @ {} fps",
            self.pixel_format, self.width, self.height, self.fps
        )
    }
}

/// How the engine keeps a source's connection to its device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStrategy {
    /// Connect while at least one enabled sink is attached.
    #[default]
    AutoManage,
    /// Stay connected regardless of sinks.
    KeepOpen,
    /// Never connect.
    ForceClose,
}

impl ConnectionStrategy {
    pub fn raw(self) -> c_int {
        match self {
            ConnectionStrategy::AutoManage => ffi::CS_ConnectionStrategy_CS_CONNECTION_AUTO_MANAGE,
            ConnectionStrategy::KeepOpen => ffi::CS_ConnectionStrategy_CS_CONNECTION_KEEP_OPEN,
            ConnectionStrategy::ForceClose => ffi::CS_ConnectionStrategy_CS_CONNECTION_FORCE_CLOSE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_codes() {
        for (i, fmt) in PixelFormat::ALL.into_iter().enumerate() {
            assert_eq!(fmt.raw(), i as c_int);
            assert_eq!(PixelFormat::from_raw(fmt.raw()), fmt);
        }
        assert_eq!(PixelFormat::from_raw(99), PixelFormat::Unknown);
        assert_eq!(PixelFormat::from_raw(-1), PixelFormat::Unknown);
    }

    #[test]
    fn test_pixel_format_parse() {
        assert_eq!("MJPEG".parse::<PixelFormat>(), Ok(PixelFormat::Mjpeg));
        assert_eq!("yuyv".parse::<PixelFormat>(), Ok(PixelFormat::Yuyv));
        assert!("h264".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn test_video_mode_raw_layout() {
        let mode = VideoMode::new(PixelFormat::Yuyv, 320, 240, 15);
        let raw = mode.to_raw();
        assert_eq!(raw.pixelFormat, ffi::CS_PixelFormat_CS_PIXFMT_YUYV);
        assert_eq!((raw.width, raw.height, raw.fps), (320, 240, 15));
        assert_eq!(VideoMode::from(raw), mode);
        assert_eq!(mode.to_string(), "yuyv 320x240 @ 15 fps");
    }

    #[test]
    fn test_connection_strategy_codes() {
        assert_eq!(ConnectionStrategy::default().raw(), 0);
        assert_eq!(ConnectionStrategy::KeepOpen.raw(), 1);
        assert_eq!(ConnectionStrategy::ForceClose.raw(), 2);
    }
}
