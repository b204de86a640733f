// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for inview.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebDom`]: live-page [`DomHost`](inview_core::host::DomHost) over
//!   `web_sys` elements
//! - [`EventBridge`]: window `scroll`/`resize` listeners feeding a shared
//!   [`FrameScheduler`], with `requestAnimationFrame` submission (plus a
//!   `setTimeout` fallback for contexts without it)
//! - [`start`]: convenience wiring for the common whole-page setup

#![no_std]

extern crate alloc;

mod dom;
mod events;
mod raf;

pub use dom::WebDom;
pub use events::EventBridge;
pub use inview_core::host::DomHost;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use inview_core::scheduler::FrameScheduler;
use inview_core::stage::StageConfig;
use inview_core::tracker::ViewportTracker;

/// Shared handle to a tracker driving the live page.
pub type SharedTracker = Rc<RefCell<ViewportTracker<WebDom>>>;

/// Builds a tracker over the live page, registers the given stages, and
/// subscribes to window events.
///
/// Dropping the returned [`EventBridge`] tears the subscription down; the
/// tracker handle stays valid for adding and removing stages afterwards.
///
/// Returns `None` outside a browser main thread.
#[must_use]
pub fn start(stages: Vec<StageConfig<web_sys::Element>>) -> Option<(SharedTracker, EventBridge)> {
    let dom = WebDom::new()?;
    let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
    let tracker = Rc::new(RefCell::new(ViewportTracker::new(dom)));
    ViewportTracker::attach(&mut scheduler.borrow_mut(), &tracker);
    for config in stages {
        tracker.borrow_mut().add_stage(config);
    }
    let bridge = EventBridge::new(scheduler)?;
    Some((tracker, bridge))
}
