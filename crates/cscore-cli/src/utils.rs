// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use cscore::camera::UsbCamera;
use serde::Serialize;
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Parse resolution string in format "WxH" or "W*H"
pub fn parse_resolution(s: &str) -> Result<(i32, i32), CliError> {
    let (width_str, height_str) = s
        .split_once('x')
        .or_else(|| s.split_once('*'))
        .ok_or_else(|| {
            CliError::InvalidArgs(format!(
                "Invalid resolution format (expected WxH or W*H): {}",
                s
            ))
        })?;

    let width = width_str
        .parse::<i32>()
        .map_err(|_| CliError::InvalidArgs(format!("Invalid width in resolution: {}", s)))?;
    let height = height_str
        .parse::<i32>()
        .map_err(|_| CliError::InvalidArgs(format!("Invalid height in resolution: {}", s)))?;

    if width <= 0 || height <= 0 {
        return Err(CliError::InvalidArgs(format!(
            "Resolution dimensions must be positive: {}",
            s
        )));
    }

    Ok((width, height))
}

/// Split a `name=value` property assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidArgs(format!(
            "Property assignment must be name=value: {}",
            s
        ))),
    }
}

/// Open a USB camera from a device number (`0`) or a device path
/// (`/dev/video0`).
pub fn open_camera(name: &str, device: &str) -> Result<UsbCamera, CliError> {
    let result = match device.parse::<i32>() {
        Ok(dev) => UsbCamera::from_device(name, dev),
        Err(_) => UsbCamera::from_path(name, device),
    };

    match result {
        Ok(camera) => {
            log::debug!("Opened camera {} as {}", device, camera.handle());
            Ok(camera)
        }
        Err(cscore::Error::Status(status)) => {
            Err(CliError::CameraNotFound(format!("{}: {}", device, status)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Install signal handler for graceful shutdown on Ctrl+C
///
/// Returns an Arc<AtomicBool> that will be set to true when SIGINT is received.
/// Check this flag periodically in your main loop to exit gracefully.
pub fn install_signal_handler() -> Result<Arc<AtomicBool>, CliError> {
    let term = Arc::new(AtomicBool::new(false));

    flag::register(SIGINT, Arc::clone(&term))
        .map_err(|e| CliError::General(format!("Failed to register signal handler: {}", e)))?;

    log::debug!("Installed SIGINT handler");
    Ok(term)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json_str);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_resolution("640*480").unwrap(), (640, 480));
        assert!(parse_resolution("1920").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("axb").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("brightness=40").unwrap(),
            ("brightness".to_string(), "40".to_string())
        );
        assert_eq!(
            parse_assignment("name = front cam").unwrap(),
            ("name".to_string(), "front cam".to_string())
        );
        assert_eq!(
            parse_assignment("url=http://a/b?c=d").unwrap().1,
            "http://a/b?c=d"
        );
        assert!(parse_assignment("brightness").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
