// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{handle::SinkHandle, marshal::to_c_string, sink::VideoSink, Error};
use log::debug;
use std::ops::{Deref, DerefMut};

/// Port used by robot dashboards for the first camera stream.
pub const DEFAULT_PORT: u16 = 1181;

/// A sink serving its source as an MJPEG stream over HTTP.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MjpegServer {
    sink: VideoSink,
}

impl MjpegServer {
    /// Start a server on `listen_address:port`. An empty address listens on
    /// all interfaces.
    pub fn new(name: &str, listen_address: &str, port: u16) -> Result<Self, Error> {
        let cname = to_c_string(name)?;
        let caddress = to_c_string(listen_address)?;
        let handle = cs_status!(CS_CreateMjpegServer(
            cname.as_ptr(),
            caddress.as_ptr(),
            i32::from(port)
        ))?;
        debug!(
            "created mjpeg server {} on {}:{} as {}",
            name,
            if listen_address.is_empty() { "*" } else { listen_address },
            port,
            handle
        );
        Ok(MjpegServer {
            sink: VideoSink::from_handle(SinkHandle::from_raw(handle)),
        })
    }

    /// Start a server on all interfaces.
    pub fn on_port(name: &str, port: u16) -> Result<Self, Error> {
        MjpegServer::new(name, "", port)
    }

    pub fn listen_address(&self) -> Result<String, Error> {
        let handle = self.handle().live()?;
        cs_string!(CS_GetMjpegServerListenAddress(handle.raw()))
    }

    pub fn port(&self) -> Result<u16, Error> {
        let handle = self.handle().live()?;
        let port = cs_status!(CS_GetMjpegServerPort(handle.raw()))?;
        Ok(u16::try_from(port)?)
    }

    pub fn into_sink(self) -> VideoSink {
        self.sink
    }
}

impl Deref for MjpegServer {
    type Target = VideoSink;

    fn deref(&self) -> &VideoSink {
        &self.sink
    }
}

impl DerefMut for MjpegServer {
    fn deref_mut(&mut self) -> &mut VideoSink {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_zero_handle_queries_fail() {
        let server = MjpegServer {
            sink: VideoSink::from_handle(SinkHandle::INVALID),
        };
        assert_eq!(server.port().unwrap_err().status(), Some(Status::InvalidHandle));
        assert_eq!(
            server.listen_address().unwrap_err().status(),
            Some(Status::InvalidHandle)
        );
    }

    #[test]
    fn test_interior_nul_rejected_before_load() {
        assert!(matches!(
            MjpegServer::new("bad\0name", "", DEFAULT_PORT),
            Err(Error::CString(_))
        ));
    }
}
