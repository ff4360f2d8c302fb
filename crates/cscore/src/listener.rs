// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Event listener registration.
//!
//! The engine keeps the `data` pointer of every registered listener and
//! calls back with it from its notifier thread until the listener is
//! removed. Instead of a pointer to the handler, the registry passes a
//! numeric cookie and keeps the handler in a table keyed by that cookie. A
//! callback that arrives for a cookie no longer in the table is ignored, so
//! a late callback can never reach a dropped handler.
//!
//! Locking: the table lock covers insert, lookup and erase only. Handlers
//! run with the table unlocked, under their own lock, so a handler may
//! register or remove listeners, including itself.

use crate::{event::EventMask, event::VideoEvent, ffi, handle::ListenerHandle, Error};
use log::{debug, error, warn};
use std::{
    collections::HashMap,
    fmt,
    os::raw::{c_int, c_void},
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, OnceLock, PoisonError,
    },
};

type Handler = Box<dyn FnMut(VideoEvent) + Send>;

/// A registered handler and the state needed to stop it.
struct Adapter {
    handler: Mutex<Handler>,
    closed: AtomicBool,
}

impl Adapter {
    fn new(handler: Handler) -> Self {
        Adapter {
            handler: Mutex::new(handler),
            closed: AtomicBool::new(false),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Run the handler unless the listener was removed. A panic in the
    /// handler is logged and stops here.
    fn deliver(&self, event: VideoEvent) {
        let mut handler = self
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Removal may have happened while this thread waited for the lock.
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let kind = event.kind;
        if panic::catch_unwind(AssertUnwindSafe(|| (*handler)(event))).is_err() {
            error!("listener handler panicked while handling {} event", kind);
        }
    }
}

#[derive(Default)]
struct RegistryState {
    next_cookie: usize,
    adapters: HashMap<usize, Arc<Adapter>>,
    by_handle: HashMap<ListenerHandle, usize>,
}

/// Process-wide table of live listener handlers.
pub struct ListenerRegistry {
    state: Mutex<RegistryState>,
}

static REGISTRY: OnceLock<ListenerRegistry> = OnceLock::new();

impl ListenerRegistry {
    fn new() -> Self {
        ListenerRegistry {
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// The registry the engine's listener callback dispatches through.
    pub fn global() -> &'static ListenerRegistry {
        REGISTRY.get_or_init(ListenerRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of registered listeners, including one whose registration is
    /// still in progress.
    pub fn len(&self) -> usize {
        self.lock().adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, handle: ListenerHandle) -> bool {
        self.lock().by_handle.contains_key(&handle)
    }

    /// Register `handler` with the engine.
    ///
    /// The table entry exists before the engine is asked to register, so
    /// events synthesized for `immediate_notify` are delivered even when the
    /// engine raises them before the add call returns.
    pub fn add(
        &self,
        mask: EventMask,
        immediate_notify: bool,
        handler: Handler,
    ) -> Result<ListenerHandle, Error> {
        let cookie = self.reserve(handler);
        let result: Result<c_int, Error> = (|| {
            cs_status!(CS_AddListener(
                cookie as *mut c_void,
                Some(on_event),
                mask.bits(),
                c_int::from(immediate_notify)
            ))
        })();
        match result {
            Ok(raw) => {
                let handle = ListenerHandle::from_raw(raw);
                self.bind(cookie, handle);
                debug!("added listener {} for mask {:#06x}", raw, mask.bits());
                Ok(handle)
            }
            Err(err) => {
                self.abandon(cookie);
                Err(err)
            }
        }
    }

    /// Deregister a listener.
    ///
    /// The table entry is erased whether or not the engine accepts the
    /// removal, and the handler is closed so a callback already waiting for
    /// it returns without running. A callback already running finishes.
    pub fn remove(&self, handle: ListenerHandle) -> Result<(), Error> {
        let handle = handle.live()?;
        let result: Result<(), Error> = (|| cs_status!(CS_RemoveListener(handle.raw())))();
        match self.erase(handle) {
            Some(_) => debug!("removed listener {}", handle.raw()),
            None => debug!("listener {} was not registered", handle.raw()),
        }
        result
    }

    /// Drop every handler without calling the engine. Used after engine
    /// shutdown, when no callback can arrive anymore.
    pub fn clear(&self) {
        let mut state = self.lock();
        for adapter in state.adapters.values() {
            adapter.close();
        }
        let count = state.adapters.len();
        state.adapters.clear();
        state.by_handle.clear();
        if count > 0 {
            debug!("dropped {} listener handlers", count);
        }
    }

    fn reserve(&self, handler: Handler) -> usize {
        let mut state = self.lock();
        // Cookie zero would reach the engine as a null data pointer.
        state.next_cookie = state.next_cookie.wrapping_add(1).max(1);
        while state.adapters.contains_key(&state.next_cookie) {
            state.next_cookie = state.next_cookie.wrapping_add(1).max(1);
        }
        let cookie = state.next_cookie;
        state.adapters.insert(cookie, Arc::new(Adapter::new(handler)));
        cookie
    }

    fn bind(&self, cookie: usize, handle: ListenerHandle) {
        self.lock().by_handle.insert(handle, cookie);
    }

    fn abandon(&self, cookie: usize) {
        if let Some(adapter) = self.lock().adapters.remove(&cookie) {
            adapter.close();
        }
    }

    fn erase(&self, handle: ListenerHandle) -> Option<Arc<Adapter>> {
        let adapter = {
            let mut state = self.lock();
            let cookie = state.by_handle.remove(&handle)?;
            state.adapters.remove(&cookie)
        };
        if let Some(adapter) = &adapter {
            adapter.close();
        }
        adapter
    }

    fn lookup(&self, cookie: usize) -> Option<Arc<Adapter>> {
        self.lock().adapters.get(&cookie).cloned()
    }

    /// Decode `raw` and hand it to the handler registered under `cookie`.
    fn dispatch(&self, cookie: usize, raw: &ffi::CS_Event) {
        let Some(adapter) = self.lookup(cookie) else {
            return;
        };
        match unsafe { VideoEvent::from_raw(raw) } {
            Some(event) => adapter.deliver(event),
            None => debug!("ignoring event of unknown kind {:#x}", raw.kind),
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

unsafe extern "C" fn on_event(data: *mut c_void, event: *const ffi::CS_Event) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let Some(event) = (unsafe { event.as_ref() }) else {
            return;
        };
        ListenerRegistry::global().dispatch(data as usize, event);
    }));
    if result.is_err() {
        error!("panic while dispatching listener event");
    }
}

/// A registered event listener.
///
/// The handler runs on the engine's notifier thread. Dropping the listener
/// deregisters it.
pub struct VideoListener {
    handle: ListenerHandle,
}

impl VideoListener {
    /// Register `handler` for the events in `mask`.
    ///
    /// With `immediate_notify`, the engine first synthesizes one event per
    /// existing resource matching the mask, such as a `SourceCreated` for
    /// every source already open. These arrive before any later real event.
    pub fn new<F>(mask: EventMask, immediate_notify: bool, handler: F) -> Result<Self, Error>
    where
        F: FnMut(VideoEvent) + Send + 'static,
    {
        let handle = ListenerRegistry::global().add(mask, immediate_notify, Box::new(handler))?;
        Ok(VideoListener { handle })
    }

    pub fn handle(&self) -> ListenerHandle {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Deregister the listener. Once this returns no further event is
    /// delivered, except one whose handler was already running. Removing
    /// twice does nothing.
    pub fn remove(&mut self) -> Result<(), Error> {
        let handle = std::mem::take(&mut self.handle);
        if !handle.is_valid() {
            return Ok(());
        }
        ListenerRegistry::global().remove(handle)
    }
}

impl Drop for VideoListener {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            warn!("failed to remove listener: {}", err);
        }
    }
}

impl fmt::Debug for VideoListener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VideoListener")
            .field("handle", &self.handle.raw())
            .finish()
    }
}
