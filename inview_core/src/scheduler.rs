// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event coalescing onto per-frame callbacks.
//!
//! Raw scroll and resize events fire far more often than the display can
//! render. The [`FrameScheduler`] batches them: however many times a trigger
//! kind fires within one repaint interval, the callbacks registered under
//! that kind execute at most once per interval, reading state at fire time
//! rather than at the first event's time.
//!
//! The scheduler is a push-driven state machine with no platform dependency.
//! Host glue feeds raw events in via [`on_event`](FrameScheduler::on_event),
//! submits the returned [`FrameRequest`]s to the platform's repaint
//! primitive, and routes each firing callback back through
//! [`on_frame`](FrameScheduler::on_frame).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::host::{FrameRequest, RequestId};
use crate::trigger::TriggerKind;

/// Callback invoked on each coalesced tick, with the kind that ticked.
pub type TickCallback = dyn FnMut(TriggerKind);

/// One permanent subscription: a callback plus its pending-request slot.
struct Registration {
    callback: Box<TickCallback>,
    pending: Option<RequestId>,
}

/// Coalesces repeated trigger events of a given kind into at most one pending
/// callback invocation per display refresh cycle.
///
/// Registrations are permanent for the scheduler's lifetime; there is no
/// unregister primitive. Each registration holds at most one pending repaint
/// request at a time, which is the sole piece of state shared between the
/// producer (raw event) and the consumer (the scheduled callback). Both run
/// on the host's single UI thread, so mutual exclusion is structural.
pub struct FrameScheduler {
    resize: Vec<Registration>,
    scroll: Vec<Registration>,
    next_request: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Creates a scheduler with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resize: Vec::new(),
            scroll: Vec::new(),
            next_request: 0,
        }
    }

    /// Adds a permanent callback subscription under `kind`.
    pub fn register(&mut self, kind: TriggerKind, callback: Box<TickCallback>) {
        self.lane_mut(kind).push(Registration {
            callback,
            pending: None,
        });
    }

    /// Returns the number of callbacks registered under `kind`.
    #[must_use]
    pub fn registered(&self, kind: TriggerKind) -> usize {
        self.lane(kind).len()
    }

    /// Returns `true` if any registration under `kind` has a pending request.
    #[must_use]
    pub fn has_pending(&self, kind: TriggerKind) -> bool {
        self.lane(kind).iter().any(|r| r.pending.is_some())
    }

    /// Feeds one raw environment event of `kind` into the scheduler.
    ///
    /// For every registration under `kind` without a pending request, a fresh
    /// [`FrameRequest`] is allocated, recorded as pending, and returned for
    /// the host glue to submit to the repaint primitive. Registrations that
    /// are already pending contribute nothing — this is the coalescing step.
    pub fn on_event(&mut self, kind: TriggerKind) -> Vec<FrameRequest> {
        let mut next = self.next_request;
        let mut requests = Vec::new();
        for reg in self.lane_mut(kind) {
            if reg.pending.is_none() {
                let id = RequestId(next);
                next += 1;
                reg.pending = Some(id);
                requests.push(FrameRequest { id, kind });
            }
        }
        self.next_request = next;
        requests
    }

    /// Delivers a fired repaint callback.
    ///
    /// Invokes the callback whose pending request matches `id`, with its
    /// trigger kind. The pending slot is cleared *before* the callback runs,
    /// so the registration is eligible for re-scheduling on the next raw
    /// event even if the callback panics. Unknown or stale ids are ignored.
    pub fn on_frame(&mut self, id: RequestId) {
        for kind in TriggerKind::ALL {
            for reg in self.lane_mut(kind) {
                if reg.pending == Some(id) {
                    reg.pending = None;
                    (reg.callback)(kind);
                    return;
                }
            }
        }
    }

    /// Clears all pending requests, returning the ids the host glue should
    /// pass to the platform's cancel primitive.
    ///
    /// Registrations themselves survive; this is teardown support so tests
    /// and short-lived embeddings can destroy scheduler instances without
    /// leaking outstanding repaint requests.
    pub fn cancel_all(&mut self) -> Vec<RequestId> {
        let mut cancelled = Vec::new();
        for kind in TriggerKind::ALL {
            for reg in self.lane_mut(kind) {
                if let Some(id) = reg.pending.take() {
                    cancelled.push(id);
                }
            }
        }
        cancelled
    }

    fn lane(&self, kind: TriggerKind) -> &Vec<Registration> {
        match kind {
            TriggerKind::Resize => &self.resize,
            TriggerKind::Scroll => &self.scroll,
        }
    }

    fn lane_mut(&mut self, kind: TriggerKind) -> &mut Vec<Registration> {
        match kind {
            TriggerKind::Resize => &mut self.resize,
            TriggerKind::Scroll => &mut self.scroll,
        }
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("resize", &self.resize.len())
            .field("scroll", &self.scroll.len())
            .field("next_request", &self.next_request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    /// Registers a callback that appends each tick's kind to a shared log.
    fn register_logging(
        sched: &mut FrameScheduler,
        kind: TriggerKind,
    ) -> Rc<RefCell<Vec<TriggerKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        sched.register(kind, Box::new(move |k| sink.borrow_mut().push(k)));
        log
    }

    #[test]
    fn rapid_events_coalesce_to_one_request() {
        let mut sched = FrameScheduler::new();
        let log = register_logging(&mut sched, TriggerKind::Scroll);

        let first = sched.on_event(TriggerKind::Scroll);
        assert_eq!(first.len(), 1);

        // Storm of raw events within the same repaint interval.
        for _ in 0..50 {
            assert!(
                sched.on_event(TriggerKind::Scroll).is_empty(),
                "pending registration must not be re-scheduled"
            );
        }

        sched.on_frame(first[0].id);
        assert_eq!(*log.borrow(), vec![TriggerKind::Scroll]);
    }

    #[test]
    fn registration_is_reeligible_after_fire() {
        let mut sched = FrameScheduler::new();
        let log = register_logging(&mut sched, TriggerKind::Scroll);

        let a = sched.on_event(TriggerKind::Scroll);
        sched.on_frame(a[0].id);

        let b = sched.on_event(TriggerKind::Scroll);
        assert_eq!(b.len(), 1, "fired registration must become schedulable");
        assert_ne!(a[0].id, b[0].id);
        sched.on_frame(b[0].id);

        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn kinds_coalesce_independently() {
        let mut sched = FrameScheduler::new();
        let scroll_log = register_logging(&mut sched, TriggerKind::Scroll);
        let resize_log = register_logging(&mut sched, TriggerKind::Resize);

        let s = sched.on_event(TriggerKind::Scroll);
        let r = sched.on_event(TriggerKind::Resize);
        assert_eq!(s[0].kind, TriggerKind::Scroll);
        assert_eq!(r[0].kind, TriggerKind::Resize);
        assert!(sched.has_pending(TriggerKind::Scroll));
        assert!(sched.has_pending(TriggerKind::Resize));

        sched.on_frame(r[0].id);
        assert!(scroll_log.borrow().is_empty());
        assert_eq!(*resize_log.borrow(), vec![TriggerKind::Resize]);
        assert!(sched.has_pending(TriggerKind::Scroll));

        sched.on_frame(s[0].id);
        assert_eq!(*scroll_log.borrow(), vec![TriggerKind::Scroll]);
    }

    #[test]
    fn raw_event_fans_out_to_all_registrations() {
        let mut sched = FrameScheduler::new();
        let a = register_logging(&mut sched, TriggerKind::Scroll);
        let b = register_logging(&mut sched, TriggerKind::Scroll);
        assert_eq!(sched.registered(TriggerKind::Scroll), 2);

        let requests = sched.on_event(TriggerKind::Scroll);
        assert_eq!(requests.len(), 2, "one request per idle registration");

        for req in &requests {
            sched.on_frame(req.id);
        }
        assert_eq!(a.borrow().len(), 1);
        assert_eq!(b.borrow().len(), 1);
    }

    #[test]
    fn stale_request_id_is_ignored() {
        let mut sched = FrameScheduler::new();
        let log = register_logging(&mut sched, TriggerKind::Scroll);

        let requests = sched.on_event(TriggerKind::Scroll);
        sched.on_frame(requests[0].id);
        // Delivering the same id again must not re-fire.
        sched.on_frame(requests[0].id);
        sched.on_frame(RequestId(999));

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn cancel_all_returns_outstanding_ids() {
        let mut sched = FrameScheduler::new();
        let log = register_logging(&mut sched, TriggerKind::Scroll);
        let _ = register_logging(&mut sched, TriggerKind::Resize);

        let s = sched.on_event(TriggerKind::Scroll);
        let r = sched.on_event(TriggerKind::Resize);

        let mut cancelled = sched.cancel_all();
        cancelled.sort();
        let mut expected = vec![s[0].id, r[0].id];
        expected.sort();
        assert_eq!(cancelled, expected);
        assert!(!sched.has_pending(TriggerKind::Scroll));
        assert!(!sched.has_pending(TriggerKind::Resize));

        // A cancelled id delivered late must be ignored.
        sched.on_frame(s[0].id);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancel_all_with_nothing_pending_is_empty() {
        let mut sched = FrameScheduler::new();
        let _ = register_logging(&mut sched, TriggerKind::Scroll);
        assert!(sched.cancel_all().is_empty());
    }
}
