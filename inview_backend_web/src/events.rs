// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window event subscription and repaint-callback glue.
//!
//! [`EventBridge`] subscribes to the window's `scroll` and `resize` events
//! (once per kind, at construction), feeds each raw event into
//! [`FrameScheduler::on_event`], and submits every returned [`FrameRequest`]
//! to `requestAnimationFrame`. When a frame callback fires, the request is
//! routed back into [`FrameScheduler::on_frame`], which runs the registered
//! tick callbacks.
//!
//! Dropping the bridge removes the listeners, cancels outstanding
//! animation-frame callbacks, and clears the scheduler's pending state.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast as _;
use web_sys::Window;

use inview_core::host::FrameRequest;
use inview_core::scheduler::FrameScheduler;
use inview_core::trigger::TriggerKind;

use crate::raf::{cancel_frame, submit_frame, FrameHandle};

/// One submitted animation-frame callback.
///
/// The closure must stay alive until the browser invokes or cancels it. The
/// JS glue holds its own reference during the call, so removing the map entry
/// from inside the callback is sound.
struct PendingFrame {
    handle: FrameHandle,
    _closure: Closure<dyn FnMut(f64)>,
}

type PendingMap = Rc<RefCell<BTreeMap<u64, PendingFrame>>>;

/// Connects window `scroll`/`resize` events to a shared [`FrameScheduler`].
///
/// Tick callbacks registered on the scheduler run while the scheduler is
/// borrowed, so they must not call back into it; register work that reads the
/// page instead (see
/// [`ViewportTracker::attach`](inview_core::tracker::ViewportTracker::attach)).
pub struct EventBridge {
    scheduler: Rc<RefCell<FrameScheduler>>,
    pending: PendingMap,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
    window: Window,
}

impl EventBridge {
    /// Subscribes to the window's `scroll` and `resize` events.
    ///
    /// Returns `None` outside a browser main thread.
    #[must_use]
    pub fn new(scheduler: Rc<RefCell<FrameScheduler>>) -> Option<Self> {
        let window = web_sys::window()?;
        let pending: PendingMap = Rc::new(RefCell::new(BTreeMap::new()));

        let mut listeners = Vec::with_capacity(TriggerKind::ALL.len());
        for kind in TriggerKind::ALL {
            let scheduler = Rc::clone(&scheduler);
            let pending = Rc::clone(&pending);
            let listener = Closure::wrap(Box::new(move || {
                let requests = scheduler.borrow_mut().on_event(kind);
                submit(&scheduler, &pending, requests);
            }) as Box<dyn FnMut()>);
            let _ = window
                .add_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref());
            listeners.push((kind.event_name(), listener));
        }

        Some(Self {
            scheduler,
            pending,
            listeners,
            window,
        })
    }

    /// Returns the number of animation-frame callbacks submitted and not yet
    /// fired or cancelled.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Submits repaint requests to `requestAnimationFrame`.
fn submit(
    scheduler: &Rc<RefCell<FrameScheduler>>,
    pending: &PendingMap,
    requests: Vec<FrameRequest>,
) {
    for request in requests {
        let id = request.id;
        let scheduler = Rc::clone(scheduler);
        let pending_inner = Rc::clone(pending);
        let closure = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            // Drop our map entry first so teardown never cancels a handle
            // that already ran.
            let _ = pending_inner.borrow_mut().remove(&id.0);
            scheduler.borrow_mut().on_frame(id);
        }) as Box<dyn FnMut(f64)>);

        let handle = submit_frame(closure.as_ref().unchecked_ref());
        pending.borrow_mut().insert(
            id.0,
            PendingFrame {
                handle,
                _closure: closure,
            },
        );
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        for (event_name, listener) in &self.listeners {
            let _ = self
                .window
                .remove_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref());
        }
        for frame in self.pending.borrow_mut().values() {
            cancel_frame(frame.handle);
        }
        self.pending.borrow_mut().clear();
        let _ = self.scheduler.borrow_mut().cancel_all();
    }
}

impl core::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBridge")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending.borrow().len())
            .finish_non_exhaustive()
    }
}
