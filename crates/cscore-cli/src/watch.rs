// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils;
use clap::Args as ClapArgs;
use cscore::event::{EventKind, EventMask, VideoEvent};
use cscore::listener::VideoListener;
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Event kinds to watch, comma separated (e.g. source-created,sink-enabled)
    #[arg(short, long, value_delimiter = ',', value_parser = parse_kind)]
    events: Vec<EventKind>,

    /// Report existing sources, sinks and properties first
    #[arg(short, long)]
    immediate: bool,

    /// Open this camera (number or path) while watching
    #[arg(short, long)]
    device: Option<String>,

    /// Stop after N events (0=unlimited)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,
}

fn parse_kind(s: &str) -> Result<EventKind, String> {
    s.parse()
}

/// One event as printed with --json, one object per line
#[derive(Debug, Serialize)]
struct EventRecord {
    kind: &'static str,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl From<&VideoEvent> for EventRecord {
    fn from(event: &VideoEvent) -> Self {
        let property = event.property();
        let value = property.map(|p| {
            if p.is_string() {
                event.value_str.clone()
            } else {
                event.value.to_string()
            }
        });

        EventRecord {
            kind: event.kind.name(),
            name: event.name.clone(),
            source: event.source.is_valid().then(|| event.source.raw()),
            sink: event.sink.is_valid().then(|| event.sink.raw()),
            mode: matches!(
                event.kind,
                EventKind::SourceVideoModeChanged | EventKind::SourceVideoModesUpdated
            )
            .then(|| event.mode.to_string()),
            property: property.map(|p| p.handle().raw()),
            value,
        }
    }
}

fn mask_for(kinds: &[EventKind]) -> EventMask {
    if kinds.is_empty() {
        EventMask::ALL
    } else {
        kinds.iter().copied().collect()
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing watch command: {:?}", args);

    let mask = mask_for(&args.events);
    let term = utils::install_signal_handler()?;
    crate::forward_engine_logs();

    let (tx, rx) = mpsc::channel();
    let mut listener = VideoListener::new(mask, args.immediate, move |event| {
        let _ = tx.send(event);
    })?;
    log::info!(
        "Watching {} (Ctrl+C to stop)...",
        mask.kinds()
            .map(EventKind::name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let _camera = match &args.device {
        Some(device) => Some(utils::open_camera("watch", device)?),
        None => None,
    };

    let max_events = if args.count == 0 {
        u64::MAX
    } else {
        args.count
    };
    let mut seen = 0u64;

    while seen < max_events && !term.load(Ordering::Relaxed) {
        let event = match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if json {
            let line = serde_json::to_string(&EventRecord::from(&event))
                .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", line);
        } else {
            println!("{}", event);
        }
        seen += 1;
    }

    if term.load(Ordering::Relaxed) {
        log::info!("Received Ctrl+C, stopping...");
    }
    log::info!("Received {} events", seen);

    listener.remove()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_for() {
        assert_eq!(mask_for(&[]), EventMask::ALL);
        let mask = mask_for(&[EventKind::SourceCreated, EventKind::SinkEnabled]);
        assert!(mask.contains(EventKind::SourceCreated));
        assert!(mask.contains(EventKind::SinkEnabled));
        assert!(!mask.contains(EventKind::SinkDisabled));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("source-created").unwrap(), EventKind::SourceCreated);
        assert!(parse_kind("nonsense").is_err());
    }
}
