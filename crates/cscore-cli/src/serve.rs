// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils;
use clap::Args as ClapArgs;
use cscore::mjpeg::{self, MjpegServer};
use cscore::mode::PixelFormat;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Camera device number or path
    #[arg(short, long, default_value = "0")]
    device: String,

    /// HTTP port to serve on
    #[arg(short, long, default_value_t = mjpeg::DEFAULT_PORT)]
    port: u16,

    /// Address to listen on (empty for all interfaces)
    #[arg(short, long, default_value = "")]
    address: String,

    /// Resolution in WxH format
    #[arg(short, long)]
    resolution: Option<String>,

    /// Pixel format (mjpeg, yuyv, rgb565, bgr, gray, y16, uyvy)
    #[arg(long)]
    format: Option<String>,

    /// Target frame rate
    #[arg(short = 'F', long)]
    fps: Option<i32>,

    /// JSON camera configuration applied before streaming
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera and server name
    #[arg(short, long, default_value = "cscore")]
    name: String,
}

/// Read a camera configuration file. The engine takes the text as is, so
/// this only checks that it is a JSON object.
fn load_config(path: &Path) -> Result<String, CliError> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidArgs(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| CliError::InvalidArgs(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    if !value.is_object() {
        return Err(CliError::InvalidArgs(format!(
            "Camera configuration must be a JSON object: {}",
            path.display()
        )));
    }
    Ok(text)
}

pub fn execute(args: Args, _json: bool) -> Result<(), CliError> {
    log::debug!("Serve parameters: {:?}", args);

    // Validate everything before touching the engine
    let resolution = args
        .resolution
        .as_deref()
        .map(utils::parse_resolution)
        .transpose()?;
    let format = args
        .format
        .as_deref()
        .map(|s| s.parse::<PixelFormat>().map_err(CliError::InvalidArgs))
        .transpose()?;
    if let Some(fps) = args.fps {
        if fps <= 0 {
            return Err(CliError::InvalidArgs(format!(
                "Frame rate must be positive: {}",
                fps
            )));
        }
    }
    let config = args.config.as_deref().map(load_config).transpose()?;

    let term = utils::install_signal_handler()?;
    crate::forward_engine_logs();

    log::info!("Opening camera: {}", args.device);
    let camera = utils::open_camera(&args.name, &args.device)?;

    if let Some(config) = &config {
        if !camera.set_config_json(config)? {
            log::warn!("Camera rejected part of the configuration");
        }
    }

    if resolution.is_some() || format.is_some() || args.fps.is_some() {
        let mut mode = camera.video_mode()?;
        if let Some((width, height)) = resolution {
            mode.width = width;
            mode.height = height;
        }
        if let Some(format) = format {
            mode.pixel_format = format;
        }
        if let Some(fps) = args.fps {
            mode.fps = fps;
        }
        if !camera.set_video_mode(&mode)? {
            log::warn!("Camera did not accept video mode {}", mode);
        }
    }
    log::info!("Video mode: {}", camera.video_mode()?);

    let server = MjpegServer::new(&format!("{}-stream", args.name), &args.address, args.port)?;
    server.set_source(Some(&camera))?;
    let host = if args.address.is_empty() {
        cscore::hostname().unwrap_or_else(|_| "localhost".to_string())
    } else {
        args.address.clone()
    };
    log::info!(
        "Serving http://{}:{}/stream.mjpg (Ctrl+C to stop)...",
        host,
        server.port()?
    );

    let mut connected = None;
    while !term.load(Ordering::Relaxed) {
        let now = camera.is_connected()?;
        if connected != Some(now) {
            if now {
                log::info!("Camera connected");
            } else {
                log::warn!("Camera disconnected");
            }
            connected = Some(now);
        }
        thread::sleep(Duration::from_millis(100));
    }

    log::info!("Received Ctrl+C, stopping...");
    server.set_source(None)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("cscore-cli-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_config() {
        let path = write_temp("ok.json", r#"{"brightness": 40, "fps": 15}"#);
        assert!(load_config(&path).unwrap().contains("brightness"));
        fs::remove_file(path).unwrap();

        let path = write_temp("array.json", "[1, 2]");
        assert!(matches!(load_config(&path), Err(CliError::InvalidArgs(_))));
        fs::remove_file(path).unwrap();

        let path = write_temp("broken.json", "{");
        assert!(matches!(load_config(&path), Err(CliError::InvalidArgs(_))));
        fs::remove_file(path).unwrap();

        assert!(load_config(Path::new("/nonexistent/cscore.json")).is_err());
    }
}
