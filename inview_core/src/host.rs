// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capability contract for platform integrations.
//!
//! Inview splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Event source** — Subscribes to raw `resize`/`scroll` events once per
//!   kind at construction and feeds them into
//!   [`FrameScheduler::on_event`](crate::scheduler::FrameScheduler::on_event).
//!   This is backend-specific and not abstracted by a trait because the
//!   setup and teardown differ fundamentally across platforms.
//!
//! - **Repaint primitive** — Submits each returned
//!   [`FrameRequest`] to the platform's "callback before next repaint"
//!   mechanism (e.g. `requestAnimationFrame`) and routes the firing callback
//!   back into
//!   [`FrameScheduler::on_frame`](crate::scheduler::FrameScheduler::on_frame).
//!
//! - **Page access** — Implements the [`DomHost`] trait to query elements,
//!   read and write attributes, report geometry, and run delayed attribute
//!   changes.
//!
//! # Crate boundaries
//!
//! `inview_core` owns the coalescing state machine, the stage collection, and
//! the transition pass. Backend crates depend on `inview_core` and provide
//! platform glue; the harness crate provides a scripted in-memory host for
//! tests and demos.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::Rect;

use crate::trigger::TriggerKind;

/// Identifies one outstanding repaint request.
///
/// Allocated by the [`FrameScheduler`](crate::scheduler::FrameScheduler);
/// the host glue passes it back when the scheduled callback fires (or to the
/// platform's cancel primitive on teardown). Core treats the value as opaque.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

/// A repaint request the host glue must submit to the platform.
///
/// Produced by
/// [`FrameScheduler::on_event`](crate::scheduler::FrameScheduler::on_event)
/// when a registration with no pending request sees a raw event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest {
    /// Handle to pass back via `on_frame` when the callback fires.
    pub id: RequestId,
    /// The trigger kind whose registration is waiting on this request.
    pub kind: TriggerKind,
}

/// Keys a pending delayed attribute change to one element within one stage.
///
/// At most one delayed action may be pending per key; scheduling under an
/// occupied key replaces the pending action.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelayKey {
    /// Identifier of the owning stage (stable across stage removal).
    pub stage: u32,
    /// Index of the element within the stage's selector matches.
    pub element: u32,
}

impl fmt::Debug for DelayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DelayKey({}.{})", self.stage, self.element)
    }
}

/// Page access capability implemented by platform backends.
///
/// Both the live-DOM backend and the scripted test host implement this trait,
/// enabling generic trackers and deterministic tests. All methods are
/// infallible by contract: configuration-input problems (a selector matching
/// nothing, an attribute that was never set) surface as empty results, not
/// errors.
pub trait DomHost {
    /// Opaque element handle. Handles are cheap to clone and remain valid for
    /// the lifetime of the element in the page.
    type Element: Clone;

    /// Returns the elements currently matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<Self::Element>;

    /// Returns the current value of the named attribute, if set.
    fn attr(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Sets the named attribute to `value`.
    fn set_attr(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Removes the named attribute.
    fn remove_attr(&mut self, element: &Self::Element, name: &str);

    /// Returns the element's bounding box in document coordinates.
    ///
    /// The tracker reads only the top edge (`y0`) and the rendered height.
    fn bounds(&self, element: &Self::Element) -> Rect;

    /// Returns the current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Returns the current viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Sets an attribute on the document root (direction publication).
    fn set_root_attr(&mut self, name: &str, value: &str);

    /// Schedules `element`'s `name` attribute to become `value` after
    /// `delay`, keyed by `key`. A pending action under the same key is
    /// replaced.
    fn schedule_attr_set(
        &mut self,
        element: &Self::Element,
        key: DelayKey,
        delay: Duration,
        name: &str,
        value: &str,
    );

    /// Cancels the pending delayed action under `key`, if any.
    fn cancel_scheduled(&mut self, element: &Self::Element, key: DelayKey);
}
