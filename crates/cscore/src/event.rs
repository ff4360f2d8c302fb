// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Engine event records.
//!
//! The engine hands listeners a borrowed record that is only valid while the
//! callback runs. [`VideoEvent`] is the owned copy built from it before the
//! user handler sees anything. Handles inside it are plain values: use
//! [`VideoEvent::source`] or [`VideoEvent::sink`] inside the handler to take
//! a reference that outlives the event.

use crate::{
    ffi,
    handle::{PropertyHandle, SinkHandle, SourceHandle},
    marshal::decode_lossy,
    mode::VideoMode,
    property::{PropertyKind, VideoProperty},
    sink::VideoSink,
    source::VideoSource,
    Error,
};
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    os::raw::c_int,
    str::FromStr,
};

/// Kind of an engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SourceCreated,
    SourceDestroyed,
    SourceConnected,
    SourceDisconnected,
    SourceVideoModesUpdated,
    SourceVideoModeChanged,
    SourcePropertyCreated,
    SourcePropertyValueUpdated,
    SourcePropertyChoicesUpdated,
    SinkSourceChanged,
    SinkCreated,
    SinkDestroyed,
    SinkEnabled,
    SinkDisabled,
    NetworkInterfacesChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        EventKind::SourceCreated,
        EventKind::SourceDestroyed,
        EventKind::SourceConnected,
        EventKind::SourceDisconnected,
        EventKind::SourceVideoModesUpdated,
        EventKind::SourceVideoModeChanged,
        EventKind::SourcePropertyCreated,
        EventKind::SourcePropertyValueUpdated,
        EventKind::SourcePropertyChoicesUpdated,
        EventKind::SinkSourceChanged,
        EventKind::SinkCreated,
        EventKind::SinkDestroyed,
        EventKind::SinkEnabled,
        EventKind::SinkDisabled,
        EventKind::NetworkInterfacesChanged,
    ];

    /// Map a raw event code; codes the engine adds later map to `None`.
    pub fn from_raw(raw: c_int) -> Option<Self> {
        EventKind::ALL.into_iter().find(|kind| kind.raw() == raw)
    }

    pub fn raw(self) -> c_int {
        match self {
            EventKind::SourceCreated => ffi::CS_EventKind_CS_SOURCE_CREATED,
            EventKind::SourceDestroyed => ffi::CS_EventKind_CS_SOURCE_DESTROYED,
            EventKind::SourceConnected => ffi::CS_EventKind_CS_SOURCE_CONNECTED,
            EventKind::SourceDisconnected => ffi::CS_EventKind_CS_SOURCE_DISCONNECTED,
            EventKind::SourceVideoModesUpdated => ffi::CS_EventKind_CS_SOURCE_VIDEOMODES_UPDATED,
            EventKind::SourceVideoModeChanged => ffi::CS_EventKind_CS_SOURCE_VIDEOMODE_CHANGED,
            EventKind::SourcePropertyCreated => ffi::CS_EventKind_CS_SOURCE_PROPERTY_CREATED,
            EventKind::SourcePropertyValueUpdated => {
                ffi::CS_EventKind_CS_SOURCE_PROPERTY_VALUE_UPDATED
            }
            EventKind::SourcePropertyChoicesUpdated => {
                ffi::CS_EventKind_CS_SOURCE_PROPERTY_CHOICES_UPDATED
            }
            EventKind::SinkSourceChanged => ffi::CS_EventKind_CS_SINK_SOURCE_CHANGED,
            EventKind::SinkCreated => ffi::CS_EventKind_CS_SINK_CREATED,
            EventKind::SinkDestroyed => ffi::CS_EventKind_CS_SINK_DESTROYED,
            EventKind::SinkEnabled => ffi::CS_EventKind_CS_SINK_ENABLED,
            EventKind::SinkDisabled => ffi::CS_EventKind_CS_SINK_DISABLED,
            EventKind::NetworkInterfacesChanged => ffi::CS_EventKind_CS_NETWORK_INTERFACES_CHANGED,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::SourceCreated => "source-created",
            EventKind::SourceDestroyed => "source-destroyed",
            EventKind::SourceConnected => "source-connected",
            EventKind::SourceDisconnected => "source-disconnected",
            EventKind::SourceVideoModesUpdated => "source-video-modes-updated",
            EventKind::SourceVideoModeChanged => "source-video-mode-changed",
            EventKind::SourcePropertyCreated => "source-property-created",
            EventKind::SourcePropertyValueUpdated => "source-property-value-updated",
            EventKind::SourcePropertyChoicesUpdated => "source-property-choices-updated",
            EventKind::SinkSourceChanged => "sink-source-changed",
            EventKind::SinkCreated => "sink-created",
            EventKind::SinkDestroyed => "sink-destroyed",
            EventKind::SinkEnabled => "sink-enabled",
            EventKind::SinkDisabled => "sink-disabled",
            EventKind::NetworkInterfacesChanged => "network-interfaces-changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown event kind '{}'", s))
    }
}

/// Set of event kinds a listener subscribes to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventMask(c_int);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const ALL: EventMask = EventMask(0x7fff);
    pub const SOURCE_CREATED: EventMask = EventMask(ffi::CS_EventKind_CS_SOURCE_CREATED);
    pub const SOURCE_DESTROYED: EventMask = EventMask(ffi::CS_EventKind_CS_SOURCE_DESTROYED);
    pub const SOURCE_CONNECTED: EventMask = EventMask(ffi::CS_EventKind_CS_SOURCE_CONNECTED);
    pub const SOURCE_DISCONNECTED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_DISCONNECTED);
    pub const SOURCE_VIDEO_MODES_UPDATED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_VIDEOMODES_UPDATED);
    pub const SOURCE_VIDEO_MODE_CHANGED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_VIDEOMODE_CHANGED);
    pub const SOURCE_PROPERTY_CREATED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_PROPERTY_CREATED);
    pub const SOURCE_PROPERTY_VALUE_UPDATED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_PROPERTY_VALUE_UPDATED);
    pub const SOURCE_PROPERTY_CHOICES_UPDATED: EventMask =
        EventMask(ffi::CS_EventKind_CS_SOURCE_PROPERTY_CHOICES_UPDATED);
    pub const SINK_SOURCE_CHANGED: EventMask = EventMask(ffi::CS_EventKind_CS_SINK_SOURCE_CHANGED);
    pub const SINK_CREATED: EventMask = EventMask(ffi::CS_EventKind_CS_SINK_CREATED);
    pub const SINK_DESTROYED: EventMask = EventMask(ffi::CS_EventKind_CS_SINK_DESTROYED);
    pub const SINK_ENABLED: EventMask = EventMask(ffi::CS_EventKind_CS_SINK_ENABLED);
    pub const SINK_DISABLED: EventMask = EventMask(ffi::CS_EventKind_CS_SINK_DISABLED);
    pub const NETWORK_INTERFACES_CHANGED: EventMask =
        EventMask(ffi::CS_EventKind_CS_NETWORK_INTERFACES_CHANGED);

    /// Every source lifecycle event.
    pub const SOURCES: EventMask = EventMask(0x000f);
    /// Every property event.
    pub const PROPERTIES: EventMask = EventMask(0x01c0);
    /// Every sink lifecycle event.
    pub const SINKS: EventMask = EventMask(0x3c00);

    pub const fn from_bits(bits: c_int) -> Self {
        EventMask(bits & EventMask::ALL.0)
    }

    pub const fn bits(self) -> c_int {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.raw() != 0
    }

    pub fn insert(&mut self, kind: EventKind) {
        self.0 |= kind.raw();
    }

    /// Kinds in this mask, in code order.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        EventMask(kind.raw())
    }
}

impl FromIterator<EventKind> for EventMask {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        let mut mask = EventMask::NONE;
        for kind in iter {
            mask.insert(kind);
        }
        mask
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOr<EventKind> for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventKind) -> EventMask {
        EventMask(self.0 | rhs.raw())
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

/// An owned copy of an engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEvent {
    pub kind: EventKind,
    pub source: SourceHandle,
    pub sink: SinkHandle,
    /// Name of the source, sink or property the event concerns, or the
    /// host name for network events.
    pub name: String,
    pub mode: VideoMode,
    pub property: PropertyHandle,
    pub property_kind: PropertyKind,
    pub value: i32,
    pub value_str: String,
}

impl VideoEvent {
    /// Copy a borrowed engine record. Returns `None` for kinds this crate
    /// does not know.
    ///
    /// # Safety
    ///
    /// The string pointers of `raw` must be null or valid for reads.
    pub unsafe fn from_raw(raw: &ffi::CS_Event) -> Option<Self> {
        let kind = EventKind::from_raw(raw.kind)?;
        Some(VideoEvent {
            kind,
            source: SourceHandle::from_raw(raw.source),
            sink: SinkHandle::from_raw(raw.sink),
            name: unsafe { decode_lossy(raw.name) },
            mode: VideoMode::from(raw.mode),
            property: PropertyHandle::from_raw(raw.property),
            property_kind: PropertyKind::from_raw(raw.propertyKind),
            value: raw.value,
            value_str: unsafe { decode_lossy(raw.valueStr) },
        })
    }

    /// A new reference to the event's source, `None` when the event has
    /// no source.
    pub fn source(&self) -> Result<Option<VideoSource>, Error> {
        if !self.source.is_valid() {
            return Ok(None);
        }
        VideoSource::copy_from(self.source).map(Some)
    }

    /// A new reference to the event's sink, `None` when the event has no
    /// sink.
    pub fn sink(&self) -> Result<Option<VideoSink>, Error> {
        if !self.sink.is_valid() {
            return Ok(None);
        }
        VideoSink::copy_from(self.sink).map(Some)
    }

    /// The property the event concerns, typed with the kind carried in the
    /// event.
    pub fn property(&self) -> Option<VideoProperty> {
        if !self.property.is_valid() {
            return None;
        }
        Some(VideoProperty::with_kind(self.property, self.property_kind))
    }
}

impl fmt::Display for VideoEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)?;
        match self.kind {
            EventKind::SourceVideoModeChanged | EventKind::SourceVideoModesUpdated => {
                write!(f, " {}", self.mode)
            }
            EventKind::SourcePropertyCreated
            | EventKind::SourcePropertyValueUpdated
            | EventKind::SourcePropertyChoicesUpdated => match self.property_kind {
                PropertyKind::String => write!(f, " = '{}'", self.value_str),
                _ => write!(f, " = {}", self.value),
            },
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mode::PixelFormat;
    use std::{ffi::CString, ptr};

    pub(crate) fn raw_event(kind: EventKind, name: &CString) -> ffi::CS_Event {
        ffi::CS_Event {
            kind: kind.raw(),
            source: 3,
            sink: 0,
            name: name.as_ptr(),
            mode: ffi::CS_VideoMode {
                pixelFormat: PixelFormat::Mjpeg.raw(),
                width: 160,
                height: 120,
                fps: 30,
            },
            property: 0,
            propertyKind: 0,
            value: 0,
            valueStr: ptr::null(),
        }
    }

    #[test]
    fn test_kind_bits_are_distinct() {
        let mut seen = 0;
        for kind in EventKind::ALL {
            assert_eq!(kind.raw().count_ones(), 1);
            assert_eq!(seen & kind.raw(), 0);
            seen |= kind.raw();
            assert_eq!(EventKind::from_raw(kind.raw()), Some(kind));
            assert_eq!(kind.name().parse::<EventKind>(), Ok(kind));
        }
        assert_eq!(seen, EventMask::ALL.bits());
        assert_eq!(EventKind::from_raw(0x8000), None);
    }

    #[test]
    fn test_mask_algebra() {
        let mask = EventMask::SOURCE_CREATED | EventKind::SinkCreated;
        assert!(mask.contains(EventKind::SourceCreated));
        assert!(mask.contains(EventKind::SinkCreated));
        assert!(!mask.contains(EventKind::SinkDestroyed));
        assert_eq!(
            mask.kinds().collect::<Vec<_>>(),
            vec![EventKind::SourceCreated, EventKind::SinkCreated]
        );

        let collected: EventMask = [EventKind::SourceConnected, EventKind::SourceDisconnected]
            .into_iter()
            .collect();
        assert_eq!(
            collected,
            EventMask::SOURCE_CONNECTED | EventMask::SOURCE_DISCONNECTED
        );
        assert_eq!(EventMask::from_bits(-1), EventMask::ALL);
        assert!(EventMask::default().is_empty());
        assert_eq!(EventMask::SOURCES.kinds().count(), 4);
        assert_eq!(EventMask::SINKS.kinds().count(), 4);
        assert_eq!(EventMask::PROPERTIES.kinds().count(), 3);
    }

    #[test]
    fn test_decode_owned_copy() {
        let name = CString::new("usb0").unwrap();
        let mut raw = raw_event(EventKind::SourceVideoModeChanged, &name);
        let event = unsafe { VideoEvent::from_raw(&raw) }.unwrap();
        raw.mode.width = 0;
        raw.name = ptr::null();
        drop(name);

        assert_eq!(event.kind, EventKind::SourceVideoModeChanged);
        assert_eq!(event.name, "usb0");
        assert_eq!(event.source, SourceHandle::from_raw(3));
        assert!(!event.sink.is_valid());
        assert_eq!(event.mode, VideoMode::new(PixelFormat::Mjpeg, 160, 120, 30));
        assert_eq!(event.value_str, "");
        assert!(event.property().is_none());
        assert!(event.sink().unwrap().is_none());
        assert_eq!(event.to_string(), "source-video-mode-changed 'usb0' mjpeg 160x120 @ 30 fps");
    }

    #[test]
    fn test_decode_property_event() {
        let name = CString::new("brightness").unwrap();
        let value = CString::new("50").unwrap();
        let mut raw = raw_event(EventKind::SourcePropertyValueUpdated, &name);
        raw.property = 9;
        raw.propertyKind = PropertyKind::Integer.raw();
        raw.value = 50;
        raw.valueStr = value.as_ptr();

        let event = unsafe { VideoEvent::from_raw(&raw) }.unwrap();
        let prop = event.property().unwrap();
        assert_eq!(prop.handle(), PropertyHandle::from_raw(9));
        assert!(prop.is_integer());
        assert_eq!(event.value_str, "50");
        assert_eq!(event.to_string(), "source-property-value-updated 'brightness' = 50");
    }

    #[test]
    fn test_unknown_kind_dropped() {
        let name = CString::new("x").unwrap();
        let mut raw = raw_event(EventKind::SinkCreated, &name);
        raw.kind = 0x10000;
        assert!(unsafe { VideoEvent::from_raw(&raw) }.is_none());
    }
}
