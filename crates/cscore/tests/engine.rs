// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// cscore Engine Tests
//
// TESTING LAYERS:
//
// Layer 1 (No engine required):
//   - test_zero_handles_fail_without_engine: wrappers around handle 0
//   - test_double_release_is_noop: disposal idempotence
//
// Layer 2 (Requires libcscore, marked with #[ignore]):
//   - test_raw_source_mode_round_trip
//   - test_immediate_notify_precedes_new_sources
//   - test_no_events_after_remove
//   - test_usb_camera_kind
//   - test_grab_from_disconnected_source
//   - test_created_property_defaults
//   - test_empty_enumerations
//
// Layer 2 tests use a USB camera at device 0 only where noted. Point
// CSCORE_LIBRARY at the shared library when it is not on the search path.
//
// RUN LAYER 1:
//   cargo test -p cscore --test engine
//
// RUN LAYER 2:
//   cargo test -p cscore --test engine -- --ignored --nocapture --test-threads=1

use cscore::{
    camera::UsbCamera,
    event::{EventKind, EventMask},
    handle::{SinkHandle, SourceHandle},
    listener::VideoListener,
    mode::{PixelFormat, VideoMode},
    property::PropertyKind,
    raw::{RawFrame, RawSink, RawSource},
    sink::VideoSink,
    source::{SourceKind, VideoSource},
    status::Status,
};
use serial_test::serial;
use std::{
    sync::{mpsc, Arc, Mutex},
    thread,
    time::Duration,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_mode() -> VideoMode {
    VideoMode::new(PixelFormat::Mjpeg, 320, 240, 30)
}

#[test]
fn test_zero_handles_fail_without_engine() {
    let source = VideoSource::from_handle(SourceHandle::INVALID);
    let sink = VideoSink::from_handle(SinkHandle::INVALID);

    assert_eq!(source.kind().unwrap_err().status(), Some(Status::InvalidHandle));
    assert_eq!(sink.name().unwrap_err().status(), Some(Status::InvalidHandle));
    assert_eq!(
        sink.set_source(Some(&source)).unwrap_err().status(),
        Some(Status::InvalidHandle)
    );
}

#[test]
fn test_double_release_is_noop() {
    let mut source = VideoSource::from_handle(SourceHandle::INVALID);
    source.release();
    source.release();
    assert!(!source.is_valid());

    let mut sink = VideoSink::from_handle(SinkHandle::INVALID);
    sink.release();
    drop(sink);
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_raw_source_mode_round_trip() {
    init_logging();
    let source = RawSource::new("round-trip", &test_mode()).unwrap();
    let mode = VideoMode::new(PixelFormat::Yuyv, 640, 480, 15);

    assert!(source.set_video_mode(&mode).unwrap());
    assert_eq!(source.video_mode().unwrap(), mode);

    assert!(source.set_resolution(160, 120).unwrap());
    let mode = source.video_mode().unwrap();
    assert_eq!((mode.width, mode.height), (160, 120));
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_immediate_notify_precedes_new_sources() {
    init_logging();
    let first = RawSource::new("existing-a", &test_mode()).unwrap();
    let second = RawSource::new("existing-b", &test_mode()).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut listener = VideoListener::new(EventMask::SOURCE_CREATED, true, move |event| {
        let _ = tx.send(event.name);
    })
    .unwrap();

    let third = RawSource::new("created-later", &test_mode()).unwrap();

    let mut names = Vec::new();
    while let Ok(name) = rx.recv_timeout(Duration::from_secs(2)) {
        let done = name == "created-later";
        names.push(name);
        if done {
            break;
        }
    }
    listener.remove().unwrap();

    let later = names.iter().position(|n| n == "created-later").unwrap();
    let a = names.iter().position(|n| n == "existing-a").unwrap();
    let b = names.iter().position(|n| n == "existing-b").unwrap();
    assert!(a < later && b < later, "unexpected order {:?}", names);

    drop((first, second, third));
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_no_events_after_remove() {
    init_logging();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let events = seen.clone();
    let mut listener = VideoListener::new(EventMask::SOURCES, false, move |event| {
        events.lock().unwrap().push(event.kind);
    })
    .unwrap();
    let handle = listener.handle();

    let before = RawSource::new("before-remove", &test_mode()).unwrap();
    thread::sleep(Duration::from_millis(200));
    listener.remove().unwrap();
    assert!(!cscore::listener::ListenerRegistry::global().contains(handle));
    let count = seen.lock().unwrap().len();
    assert!(count > 0);

    let after = RawSource::new("after-remove", &test_mode()).unwrap();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(seen.lock().unwrap().len(), count);

    // A second removal neither fails nor reaches the engine.
    listener.remove().unwrap();
    drop((before, after));
}

#[test]
#[serial]
#[ignore = "requires libcscore and a USB camera at device 0"]
fn test_usb_camera_kind() {
    init_logging();
    let camera = UsbCamera::from_device("cam", 0).unwrap();
    assert!(camera.handle().is_valid());
    assert_eq!(camera.kind().unwrap(), SourceKind::Usb);
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_grab_from_disconnected_source() {
    init_logging();
    let source = RawSource::new("unplugged", &test_mode()).unwrap();
    source.set_connected(false).unwrap();
    let sink = RawSink::new("grabber").unwrap();
    sink.set_source(Some(&source)).unwrap();

    let mut frame = RawFrame::new();
    let err = sink
        .grab_frame_timeout(&mut frame, Duration::from_millis(200))
        .unwrap_err();
    assert_eq!(err.status(), Some(Status::SourceIsDisconnected));
    assert_eq!(err.to_string(), "source is disconnected");
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_created_property_defaults() {
    init_logging();
    let source = RawSource::new("props", &test_mode()).unwrap();
    let created = source
        .create_integer_property("brightness", 0, 100, 1, 50, 50)
        .unwrap();
    assert_eq!(created.default_value().unwrap(), 50);

    let looked_up = source.property("brightness").unwrap();
    assert_eq!(looked_up.kind(), PropertyKind::Integer);
    assert_eq!(looked_up, created);
    assert_eq!((looked_up.min().unwrap(), looked_up.max().unwrap()), (0, 100));
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_empty_enumerations() {
    init_logging();
    let source = RawSource::new("lonely", &test_mode()).unwrap();
    assert!(source.enumerate_sinks().unwrap().is_empty());
    assert!(source.enumerate_properties().unwrap().is_empty());

    let sink = RawSink::new("unattached").unwrap();
    assert!(sink.source().unwrap().is_none());
}

#[test]
#[serial]
#[ignore = "requires libcscore"]
fn test_event_source_is_copied() {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let listener = VideoListener::new(EventKind::SourceCreated.into(), false, move |event| {
        let _ = tx.send(event.source().ok().flatten());
    })
    .unwrap();

    let original = RawSource::new("evented", &test_mode()).unwrap();
    let copy = rx.recv_timeout(Duration::from_secs(2)).unwrap().unwrap();
    assert_eq!(copy.handle(), original.handle());
    drop(original);
    assert_eq!(copy.name().unwrap(), "evented");
    drop(listener);
}
