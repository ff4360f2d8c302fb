// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

// Declarations for the cscore C interface (cscore_c.h). The function table
// follows the layout bindgen emits with `--dynamic-loading`: every entry point
// is resolved when the library is opened and kept as a `Result` so a missing
// symbol only fails the call that needs it.

use std::os::raw::{c_char, c_double, c_int, c_uint, c_void};

pub type CS_Handle = c_int;
pub type CS_Property = CS_Handle;
pub type CS_Listener = CS_Handle;
pub type CS_Sink = CS_Handle;
pub type CS_Source = CS_Handle;

pub type CS_Status = c_int;
pub type CS_Bool = c_int;

pub type CS_StatusValue = c_int;
pub const CS_StatusValue_CS_PROPERTY_WRITE_FAILED: CS_StatusValue = 2000;
pub const CS_StatusValue_CS_OK: CS_StatusValue = 0;
pub const CS_StatusValue_CS_INVALID_HANDLE: CS_StatusValue = -2000;
pub const CS_StatusValue_CS_WRONG_HANDLE_SUBTYPE: CS_StatusValue = -2001;
pub const CS_StatusValue_CS_INVALID_PROPERTY: CS_StatusValue = -2002;
pub const CS_StatusValue_CS_WRONG_PROPERTY_TYPE: CS_StatusValue = -2003;
pub const CS_StatusValue_CS_READ_FAILED: CS_StatusValue = -2004;
pub const CS_StatusValue_CS_SOURCE_IS_DISCONNECTED: CS_StatusValue = -2005;
pub const CS_StatusValue_CS_EMPTY_VALUE: CS_StatusValue = -2006;
pub const CS_StatusValue_CS_BAD_URL: CS_StatusValue = -2007;

pub type CS_LogLevel = c_uint;
pub const CS_LogLevel_CS_LOG_CRITICAL: CS_LogLevel = 50;
pub const CS_LogLevel_CS_LOG_ERROR: CS_LogLevel = 40;
pub const CS_LogLevel_CS_LOG_WARNING: CS_LogLevel = 30;
pub const CS_LogLevel_CS_LOG_INFO: CS_LogLevel = 20;
pub const CS_LogLevel_CS_LOG_DEBUG: CS_LogLevel = 10;
pub const CS_LogLevel_CS_LOG_DEBUG1: CS_LogLevel = 9;
pub const CS_LogLevel_CS_LOG_DEBUG2: CS_LogLevel = 8;
pub const CS_LogLevel_CS_LOG_DEBUG3: CS_LogLevel = 7;
pub const CS_LogLevel_CS_LOG_DEBUG4: CS_LogLevel = 6;

pub type CS_PixelFormat = c_int;
pub const CS_PixelFormat_CS_PIXFMT_UNKNOWN: CS_PixelFormat = 0;
pub const CS_PixelFormat_CS_PIXFMT_MJPEG: CS_PixelFormat = 1;
pub const CS_PixelFormat_CS_PIXFMT_YUYV: CS_PixelFormat = 2;
pub const CS_PixelFormat_CS_PIXFMT_RGB565: CS_PixelFormat = 3;
pub const CS_PixelFormat_CS_PIXFMT_BGR: CS_PixelFormat = 4;
pub const CS_PixelFormat_CS_PIXFMT_GRAY: CS_PixelFormat = 5;
pub const CS_PixelFormat_CS_PIXFMT_Y16: CS_PixelFormat = 6;
pub const CS_PixelFormat_CS_PIXFMT_UYVY: CS_PixelFormat = 7;

pub type CS_PropertyKind = c_int;
pub const CS_PropertyKind_CS_PROP_NONE: CS_PropertyKind = 0;
pub const CS_PropertyKind_CS_PROP_BOOLEAN: CS_PropertyKind = 1;
pub const CS_PropertyKind_CS_PROP_INTEGER: CS_PropertyKind = 2;
pub const CS_PropertyKind_CS_PROP_STRING: CS_PropertyKind = 4;
pub const CS_PropertyKind_CS_PROP_ENUM: CS_PropertyKind = 8;

pub type CS_SourceKind = c_int;
pub const CS_SourceKind_CS_SOURCE_UNKNOWN: CS_SourceKind = 0;
pub const CS_SourceKind_CS_SOURCE_USB: CS_SourceKind = 1;
pub const CS_SourceKind_CS_SOURCE_HTTP: CS_SourceKind = 2;
pub const CS_SourceKind_CS_SOURCE_CV: CS_SourceKind = 4;
pub const CS_SourceKind_CS_SOURCE_RAW: CS_SourceKind = 8;

pub type CS_HttpCameraKind = c_int;
pub const CS_HttpCameraKind_CS_HTTP_UNKNOWN: CS_HttpCameraKind = 0;
pub const CS_HttpCameraKind_CS_HTTP_MJPGSTREAMER: CS_HttpCameraKind = 1;
pub const CS_HttpCameraKind_CS_HTTP_CSCORE: CS_HttpCameraKind = 2;
pub const CS_HttpCameraKind_CS_HTTP_AXIS: CS_HttpCameraKind = 3;

pub type CS_SinkKind = c_int;
pub const CS_SinkKind_CS_SINK_UNKNOWN: CS_SinkKind = 0;
pub const CS_SinkKind_CS_SINK_MJPEG: CS_SinkKind = 2;
pub const CS_SinkKind_CS_SINK_CV: CS_SinkKind = 4;
pub const CS_SinkKind_CS_SINK_RAW: CS_SinkKind = 8;

pub type CS_EventKind = c_int;
pub const CS_EventKind_CS_SOURCE_CREATED: CS_EventKind = 0x0001;
pub const CS_EventKind_CS_SOURCE_DESTROYED: CS_EventKind = 0x0002;
pub const CS_EventKind_CS_SOURCE_CONNECTED: CS_EventKind = 0x0004;
pub const CS_EventKind_CS_SOURCE_DISCONNECTED: CS_EventKind = 0x0008;
pub const CS_EventKind_CS_SOURCE_VIDEOMODES_UPDATED: CS_EventKind = 0x0010;
pub const CS_EventKind_CS_SOURCE_VIDEOMODE_CHANGED: CS_EventKind = 0x0020;
pub const CS_EventKind_CS_SOURCE_PROPERTY_CREATED: CS_EventKind = 0x0040;
pub const CS_EventKind_CS_SOURCE_PROPERTY_VALUE_UPDATED: CS_EventKind = 0x0080;
pub const CS_EventKind_CS_SOURCE_PROPERTY_CHOICES_UPDATED: CS_EventKind = 0x0100;
pub const CS_EventKind_CS_SINK_SOURCE_CHANGED: CS_EventKind = 0x0200;
pub const CS_EventKind_CS_SINK_CREATED: CS_EventKind = 0x0400;
pub const CS_EventKind_CS_SINK_DESTROYED: CS_EventKind = 0x0800;
pub const CS_EventKind_CS_SINK_ENABLED: CS_EventKind = 0x1000;
pub const CS_EventKind_CS_SINK_DISABLED: CS_EventKind = 0x2000;
pub const CS_EventKind_CS_NETWORK_INTERFACES_CHANGED: CS_EventKind = 0x4000;

pub type CS_ConnectionStrategy = c_int;
pub const CS_ConnectionStrategy_CS_CONNECTION_AUTO_MANAGE: CS_ConnectionStrategy = 0;
pub const CS_ConnectionStrategy_CS_CONNECTION_KEEP_OPEN: CS_ConnectionStrategy = 1;
pub const CS_ConnectionStrategy_CS_CONNECTION_FORCE_CLOSE: CS_ConnectionStrategy = 2;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CS_VideoMode {
    pub pixelFormat: c_int,
    pub width: c_int,
    pub height: c_int,
    pub fps: c_int,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CS_Event {
    pub kind: CS_EventKind,
    pub source: CS_Source,
    pub sink: CS_Sink,
    pub name: *const c_char,
    pub mode: CS_VideoMode,
    pub property: CS_Property,
    pub propertyKind: CS_PropertyKind,
    pub value: c_int,
    pub valueStr: *const c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CS_UsbCameraInfo {
    pub dev: c_int,
    pub path: *mut c_char,
    pub name: *mut c_char,
    pub otherPathsCount: c_int,
    pub otherPaths: *mut *mut c_char,
    pub vendorId: c_int,
    pub productId: c_int,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CS_RawFrame {
    pub data: *mut c_char,
    pub dataLength: c_int,
    pub pixelFormat: c_int,
    pub width: c_int,
    pub height: c_int,
    pub totalData: c_int,
}

impl Default for CS_RawFrame {
    fn default() -> Self {
        CS_RawFrame {
            data: std::ptr::null_mut(),
            dataLength: 0,
            pixelFormat: 0,
            width: 0,
            height: 0,
            totalData: 0,
        }
    }
}

pub type CS_ListenerCallback =
    Option<unsafe extern "C" fn(data: *mut c_void, event: *const CS_Event)>;

pub type CS_LogFunc = Option<
    unsafe extern "C" fn(level: c_uint, file: *const c_char, line: c_uint, msg: *const c_char),
>;

macro_rules! cscore_library {
    ($($name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?;)*) => {
        pub struct CsCoreLibrary {
            __library: ::libloading::Library,
            $(pub $name: Result<unsafe extern "C" fn($($ty),*) $(-> $ret)?, ::libloading::Error>,)*
        }

        impl CsCoreLibrary {
            pub unsafe fn new<P>(path: P) -> Result<Self, ::libloading::Error>
            where
                P: AsRef<::std::ffi::OsStr>,
            {
                let library = ::libloading::Library::new(path)?;
                Self::from_library(library)
            }

            pub unsafe fn from_library<L>(library: L) -> Result<Self, ::libloading::Error>
            where
                L: Into<::libloading::Library>,
            {
                let __library = library.into();
                $(let $name = __library
                    .get(concat!(stringify!($name), "\0").as_bytes())
                    .map(|sym| *sym);)*
                Ok(CsCoreLibrary {
                    __library,
                    $($name,)*
                })
            }
        }
    };
}

cscore_library! {
    // Property functions
    CS_GetPropertyKind(property: CS_Property, status: *mut CS_Status) -> CS_PropertyKind;
    CS_GetPropertyName(property: CS_Property, status: *mut CS_Status) -> *mut c_char;
    CS_GetProperty(property: CS_Property, status: *mut CS_Status) -> c_int;
    CS_SetProperty(property: CS_Property, value: c_int, status: *mut CS_Status);
    CS_GetPropertyMin(property: CS_Property, status: *mut CS_Status) -> c_int;
    CS_GetPropertyMax(property: CS_Property, status: *mut CS_Status) -> c_int;
    CS_GetPropertyStep(property: CS_Property, status: *mut CS_Status) -> c_int;
    CS_GetPropertyDefault(property: CS_Property, status: *mut CS_Status) -> c_int;
    CS_GetStringProperty(property: CS_Property, status: *mut CS_Status) -> *mut c_char;
    CS_SetStringProperty(property: CS_Property, value: *const c_char, status: *mut CS_Status);
    CS_GetEnumPropertyChoices(property: CS_Property, count: *mut c_int, status: *mut CS_Status) -> *mut *mut c_char;

    // Source creation functions
    CS_CreateUsbCameraDev(name: *const c_char, dev: c_int, status: *mut CS_Status) -> CS_Source;
    CS_CreateUsbCameraPath(name: *const c_char, path: *const c_char, status: *mut CS_Status) -> CS_Source;
    CS_CreateHttpCamera(name: *const c_char, url: *const c_char, kind: CS_HttpCameraKind, status: *mut CS_Status) -> CS_Source;
    CS_CreateHttpCameraMulti(name: *const c_char, urls: *mut *const c_char, count: c_int, kind: CS_HttpCameraKind, status: *mut CS_Status) -> CS_Source;
    CS_CreateRawSource(name: *const c_char, mode: *const CS_VideoMode, status: *mut CS_Status) -> CS_Source;

    // Source functions
    CS_GetSourceKind(source: CS_Source, status: *mut CS_Status) -> CS_SourceKind;
    CS_GetSourceName(source: CS_Source, status: *mut CS_Status) -> *mut c_char;
    CS_GetSourceDescription(source: CS_Source, status: *mut CS_Status) -> *mut c_char;
    CS_GetSourceLastFrameTime(source: CS_Source, status: *mut CS_Status) -> u64;
    CS_SetSourceConnectionStrategy(source: CS_Source, strategy: CS_ConnectionStrategy, status: *mut CS_Status);
    CS_IsSourceConnected(source: CS_Source, status: *mut CS_Status) -> CS_Bool;
    CS_IsSourceEnabled(source: CS_Source, status: *mut CS_Status) -> CS_Bool;
    CS_GetSourceProperty(source: CS_Source, name: *const c_char, status: *mut CS_Status) -> CS_Property;
    CS_EnumerateSourceProperties(source: CS_Source, count: *mut c_int, status: *mut CS_Status) -> *mut CS_Property;
    CS_GetSourceVideoMode(source: CS_Source, mode: *mut CS_VideoMode, status: *mut CS_Status);
    CS_SetSourceVideoMode(source: CS_Source, mode: *const CS_VideoMode, status: *mut CS_Status) -> CS_Bool;
    CS_SetSourceVideoModeDiscrete(source: CS_Source, pixelFormat: CS_PixelFormat, width: c_int, height: c_int, fps: c_int, status: *mut CS_Status) -> CS_Bool;
    CS_SetSourcePixelFormat(source: CS_Source, pixelFormat: CS_PixelFormat, status: *mut CS_Status) -> CS_Bool;
    CS_SetSourceResolution(source: CS_Source, width: c_int, height: c_int, status: *mut CS_Status) -> CS_Bool;
    CS_SetSourceFPS(source: CS_Source, fps: c_int, status: *mut CS_Status) -> CS_Bool;
    CS_SetSourceConfigJson(source: CS_Source, config: *const c_char, status: *mut CS_Status) -> CS_Bool;
    CS_GetSourceConfigJson(source: CS_Source, status: *mut CS_Status) -> *mut c_char;
    CS_EnumerateSourceVideoModes(source: CS_Source, count: *mut c_int, status: *mut CS_Status) -> *mut CS_VideoMode;
    CS_EnumerateSourceSinks(source: CS_Source, count: *mut c_int, status: *mut CS_Status) -> *mut CS_Sink;
    CS_CopySource(source: CS_Source, status: *mut CS_Status) -> CS_Source;
    CS_ReleaseSource(source: CS_Source, status: *mut CS_Status);

    // Camera source common property functions
    CS_SetCameraBrightness(source: CS_Source, brightness: c_int, status: *mut CS_Status);
    CS_GetCameraBrightness(source: CS_Source, status: *mut CS_Status) -> c_int;
    CS_SetCameraWhiteBalanceAuto(source: CS_Source, status: *mut CS_Status);
    CS_SetCameraWhiteBalanceHoldCurrent(source: CS_Source, status: *mut CS_Status);
    CS_SetCameraWhiteBalanceManual(source: CS_Source, value: c_int, status: *mut CS_Status);
    CS_SetCameraExposureAuto(source: CS_Source, status: *mut CS_Status);
    CS_SetCameraExposureHoldCurrent(source: CS_Source, status: *mut CS_Status);
    CS_SetCameraExposureManual(source: CS_Source, value: c_int, status: *mut CS_Status);

    // UsbCamera source functions
    CS_GetUsbCameraPath(source: CS_Source, status: *mut CS_Status) -> *mut c_char;
    CS_GetUsbCameraInfo(source: CS_Source, status: *mut CS_Status) -> *mut CS_UsbCameraInfo;

    // HttpCamera source functions
    CS_GetHttpCameraKind(source: CS_Source, status: *mut CS_Status) -> CS_HttpCameraKind;
    CS_SetHttpCameraUrls(source: CS_Source, urls: *mut *const c_char, count: c_int, status: *mut CS_Status);
    CS_GetHttpCameraUrls(source: CS_Source, count: *mut c_int, status: *mut CS_Status) -> *mut *mut c_char;

    // Raw source functions
    CS_PutRawSourceFrame(source: CS_Source, image: *const CS_RawFrame, status: *mut CS_Status);
    CS_NotifySourceError(source: CS_Source, msg: *const c_char, status: *mut CS_Status);
    CS_SetSourceConnected(source: CS_Source, connected: CS_Bool, status: *mut CS_Status);
    CS_SetSourceDescription(source: CS_Source, description: *const c_char, status: *mut CS_Status);
    CS_CreateSourceProperty(source: CS_Source, name: *const c_char, kind: CS_PropertyKind, minimum: c_int, maximum: c_int, step: c_int, defaultValue: c_int, value: c_int, status: *mut CS_Status) -> CS_Property;
    CS_SetSourceEnumPropertyChoices(source: CS_Source, property: CS_Property, choices: *mut *const c_char, count: c_int, status: *mut CS_Status);

    // Sink creation functions
    CS_CreateMjpegServer(name: *const c_char, listenAddress: *const c_char, port: c_int, status: *mut CS_Status) -> CS_Sink;
    CS_CreateRawSink(name: *const c_char, status: *mut CS_Status) -> CS_Sink;

    // Sink functions
    CS_GetSinkKind(sink: CS_Sink, status: *mut CS_Status) -> CS_SinkKind;
    CS_GetSinkName(sink: CS_Sink, status: *mut CS_Status) -> *mut c_char;
    CS_GetSinkDescription(sink: CS_Sink, status: *mut CS_Status) -> *mut c_char;
    CS_GetSinkProperty(sink: CS_Sink, name: *const c_char, status: *mut CS_Status) -> CS_Property;
    CS_SetSinkSource(sink: CS_Sink, source: CS_Source, status: *mut CS_Status);
    CS_GetSinkSourceProperty(sink: CS_Sink, name: *const c_char, status: *mut CS_Status) -> CS_Property;
    CS_SetSinkConfigJson(sink: CS_Sink, config: *const c_char, status: *mut CS_Status) -> CS_Bool;
    CS_GetSinkConfigJson(sink: CS_Sink, status: *mut CS_Status) -> *mut c_char;
    CS_GetSinkSource(sink: CS_Sink, status: *mut CS_Status) -> CS_Source;
    CS_CopySink(sink: CS_Sink, status: *mut CS_Status) -> CS_Sink;
    CS_ReleaseSink(sink: CS_Sink, status: *mut CS_Status);

    // MjpegServer sink functions
    CS_GetMjpegServerListenAddress(sink: CS_Sink, status: *mut CS_Status) -> *mut c_char;
    CS_GetMjpegServerPort(sink: CS_Sink, status: *mut CS_Status) -> c_int;

    // Raw sink functions
    CS_SetSinkDescription(sink: CS_Sink, description: *const c_char, status: *mut CS_Status);
    CS_GrabRawSinkFrame(sink: CS_Sink, image: *mut CS_RawFrame, status: *mut CS_Status) -> u64;
    CS_GrabRawSinkFrameTimeout(sink: CS_Sink, image: *mut CS_RawFrame, timeout: c_double, status: *mut CS_Status) -> u64;
    CS_GetSinkError(sink: CS_Sink, status: *mut CS_Status) -> *mut c_char;
    CS_SetSinkEnabled(sink: CS_Sink, enabled: CS_Bool, status: *mut CS_Status);

    // Listener functions
    CS_AddListener(data: *mut c_void, callback: CS_ListenerCallback, eventMask: c_int, immediateNotify: c_int, status: *mut CS_Status) -> CS_Listener;
    CS_RemoveListener(handle: CS_Listener, status: *mut CS_Status);

    // Utility functions
    CS_SetLogger(func: CS_LogFunc, min_level: c_uint);
    CS_Shutdown();
    CS_EnumerateUsbCameras(count: *mut c_int, status: *mut CS_Status) -> *mut CS_UsbCameraInfo;
    CS_FreeEnumeratedUsbCameras(cameras: *mut CS_UsbCameraInfo, count: c_int);
    CS_FreeUsbCameraInfo(info: *mut CS_UsbCameraInfo);
    CS_EnumerateSources(count: *mut c_int, status: *mut CS_Status) -> *mut CS_Source;
    CS_ReleaseEnumeratedSources(sources: *mut CS_Source, count: c_int);
    CS_EnumerateSinks(count: *mut c_int, status: *mut CS_Status) -> *mut CS_Sink;
    CS_ReleaseEnumeratedSinks(sinks: *mut CS_Sink, count: c_int);
    CS_FreeString(str_: *mut c_char);
    CS_FreeEnumPropertyChoices(choices: *mut *mut c_char, count: c_int);
    CS_FreeHttpCameraUrls(urls: *mut *mut c_char, count: c_int);
    CS_FreeEnumeratedProperties(properties: *mut CS_Property, count: c_int);
    CS_FreeEnumeratedVideoModes(modes: *mut CS_VideoMode, count: c_int);
    CS_GetHostname() -> *mut c_char;
    CS_GetNetworkInterfaces(count: *mut c_int) -> *mut *mut c_char;
    CS_FreeNetworkInterfaces(interfaces: *mut *mut c_char, count: c_int);
    CS_AllocateRawFrameData(frame: *mut CS_RawFrame, requestedSize: c_int);
    CS_FreeRawFrameData(frame: *mut CS_RawFrame);
}
