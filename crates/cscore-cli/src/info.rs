// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils;
use clap::Args as ClapArgs;
use cscore::{sink::VideoSink, source::VideoSource};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Open this camera (number or path) and report its video modes
    #[arg(short, long)]
    device: Option<String>,
}

#[derive(Debug, Serialize)]
struct SystemInfo {
    hostname: String,
    interfaces: Vec<String>,
    sources: Vec<SourceInfo>,
    sinks: Vec<SinkInfo>,
}

#[derive(Debug, Serialize)]
struct SourceInfo {
    handle: i32,
    name: String,
    kind: String,
    description: String,
    connected: bool,
    mode: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    modes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SinkInfo {
    handle: i32,
    name: String,
    kind: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

fn source_info(source: &VideoSource, with_modes: bool) -> Result<SourceInfo, CliError> {
    let modes = if with_modes {
        source
            .enumerate_video_modes()?
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        Vec::new()
    };

    Ok(SourceInfo {
        handle: source.handle().raw(),
        name: source.name()?,
        kind: source.kind()?.to_string(),
        description: source.description()?,
        connected: source.is_connected()?,
        mode: source.video_mode()?.to_string(),
        modes,
    })
}

fn sink_info(sink: &VideoSink) -> Result<SinkInfo, CliError> {
    let source = match sink.source()? {
        Some(source) => Some(source.name()?),
        None => None,
    };

    Ok(SinkInfo {
        handle: sink.handle().raw(),
        name: sink.name()?,
        kind: sink.kind()?.to_string(),
        description: sink.description()?,
        source,
    })
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing info command: {:?}", args);
    crate::forward_engine_logs();

    // Kept open until the report is printed so it shows up in the listing.
    let camera = match &args.device {
        Some(device) => Some(utils::open_camera("info", device)?),
        None => None,
    };

    let mut sources = Vec::new();
    for source in VideoSource::enumerate_sources()? {
        let with_modes = camera
            .as_ref()
            .is_some_and(|camera| camera.handle() == source.handle());
        sources.push(source_info(&source, with_modes)?);
    }

    let sinks = VideoSink::enumerate_sinks()?
        .iter()
        .map(sink_info)
        .collect::<Result<Vec<_>, _>>()?;

    let info = SystemInfo {
        hostname: cscore::hostname()?,
        interfaces: cscore::network_interfaces()?,
        sources,
        sinks,
    };

    if json {
        utils::print_json(&info)?;
    } else {
        print_text_info(&info);
    }

    Ok(())
}

fn print_text_info(info: &SystemInfo) {
    println!("Host: {}", info.hostname);
    println!("Interfaces: {}", info.interfaces.join(", "));

    println!("\nSources ({}):", info.sources.len());
    for source in &info.sources {
        println!(
            "  [{}] {} ({}) {} - {}",
            source.handle,
            source.name,
            source.kind,
            if source.connected {
                "connected"
            } else {
                "disconnected"
            },
            source.mode
        );
        if !source.description.is_empty() {
            println!("      {}", source.description);
        }
        for mode in &source.modes {
            println!("      {}", mode);
        }
    }

    println!("\nSinks ({}):", info.sinks.len());
    for sink in &info.sinks {
        println!(
            "  [{}] {} ({}) <- {}",
            sink.handle,
            sink.name,
            sink.kind,
            sink.source.as_deref().unwrap_or("no source")
        );
    }
}
