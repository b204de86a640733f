// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic host for inview tests and demos.
//!
//! Real scroll sessions are timing-dependent: raw events arrive in bursts,
//! repaint callbacks fire when the platform feels like it, and delayed
//! transitions land on wall-clock timers. This crate replaces all three with
//! scripted equivalents so a whole session can be replayed step by step:
//!
//! - [`FakeDom`] — an in-memory page implementing
//!   [`DomHost`](inview_core::host::DomHost): scripted elements, settable
//!   scroll offset and viewport height, recorded attributes, and a virtual
//!   millisecond clock that fires due delayed actions in due-time order.
//! - [`FramePump`] — collects the [`FrameRequest`]s returned by
//!   [`FrameScheduler::on_event`](inview_core::scheduler::FrameScheduler::on_event)
//!   and fires them one "repaint" at a time.

#![no_std]

extern crate alloc;

use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use kurbo::Rect;

use inview_core::host::{DelayKey, DomHost, FrameRequest, RequestId};
use inview_core::scheduler::FrameScheduler;

/// Handle to one scripted element.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

struct FakeElement {
    selector: String,
    top: f64,
    height: f64,
}

struct PendingAction {
    element: ElementId,
    key: DelayKey,
    due: u64,
    attr: String,
    value: String,
}

#[derive(Default)]
struct DomState {
    elements: Vec<FakeElement>,
    attrs: BTreeMap<(u32, String), String>,
    root_attrs: BTreeMap<String, String>,
    scroll: f64,
    viewport: f64,
    now_ms: u64,
    pending: Vec<PendingAction>,
    writes: u64,
}

/// Scripted in-memory page with a virtual millisecond clock.
///
/// `FakeDom` is a cheap-clone handle over shared state, so a test can keep
/// one copy for scripting and assertions while the tracker owns another.
#[derive(Clone, Default)]
pub struct FakeDom {
    inner: Rc<RefCell<DomState>>,
}

impl FakeDom {
    /// Creates an empty page with the given viewport height.
    #[must_use]
    pub fn new(viewport: f64) -> Self {
        let dom = Self::default();
        dom.inner.borrow_mut().viewport = viewport;
        dom
    }

    /// Adds an element matched by `selector` with the given document-space
    /// top edge and rendered height. Match order is insertion order.
    pub fn add_element(&self, selector: &str, top: f64, height: f64) -> ElementId {
        let mut state = self.inner.borrow_mut();
        state.elements.push(FakeElement {
            selector: selector.to_string(),
            top,
            height,
        });
        #[expect(
            clippy::cast_possible_truncation,
            reason = "scripted pages stay far below u32::MAX elements"
        )]
        ElementId(state.elements.len() as u32 - 1)
    }

    /// Sets the scroll offset the next `scroll_offset` read will report.
    pub fn set_scroll(&self, offset: f64) {
        self.inner.borrow_mut().scroll = offset;
    }

    /// Sets the viewport height the next `viewport_height` read will report.
    pub fn set_viewport(&self, height: f64) {
        self.inner.borrow_mut().viewport = height;
    }

    /// Returns the root attribute published under `name`, if any.
    #[must_use]
    pub fn root_attr(&self, name: &str) -> Option<String> {
        self.inner.borrow().root_attrs.get(name).cloned()
    }

    /// Returns the current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Returns the number of delayed actions currently pending.
    #[must_use]
    pub fn pending_delays(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Returns the total number of element attribute writes so far.
    ///
    /// Root attribute publication does not count.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.borrow().writes
    }

    /// Advances the virtual clock by `ms`, firing due delayed actions in
    /// due-time order (insertion order on ties).
    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now_ms + ms;
        loop {
            let next = {
                let state = self.inner.borrow();
                state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, action)| action.due <= target)
                    .min_by_key(|(index, action)| (action.due, *index))
                    .map(|(index, _)| index)
            };
            let Some(index) = next else { break };
            let mut state = self.inner.borrow_mut();
            let action = state.pending.remove(index);
            state.now_ms = action.due;
            state.writes += 1;
            state
                .attrs
                .insert((action.element.0, action.attr), action.value);
        }
        self.inner.borrow_mut().now_ms = target;
    }
}

impl DomHost for FakeDom {
    type Element = ElementId;

    fn query(&self, selector: &str) -> Vec<ElementId> {
        let state = self.inner.borrow();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "scripted pages stay far below u32::MAX elements"
        )]
        (0..state.elements.len() as u32)
            .filter(|&i| state.elements[i as usize].selector == selector)
            .map(ElementId)
            .collect()
    }

    fn attr(&self, element: &ElementId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attrs
            .get(&(element.0, name.to_string()))
            .cloned()
    }

    fn set_attr(&mut self, element: &ElementId, name: &str, value: &str) {
        let mut state = self.inner.borrow_mut();
        state.writes += 1;
        state
            .attrs
            .insert((element.0, name.to_string()), value.to_string());
    }

    fn remove_attr(&mut self, element: &ElementId, name: &str) {
        self.inner
            .borrow_mut()
            .attrs
            .remove(&(element.0, name.to_string()));
    }

    fn bounds(&self, element: &ElementId) -> Rect {
        let state = self.inner.borrow();
        let el = &state.elements[element.0 as usize];
        Rect::new(0.0, el.top, 0.0, el.top + el.height)
    }

    fn scroll_offset(&self) -> f64 {
        self.inner.borrow().scroll
    }

    fn viewport_height(&self) -> f64 {
        self.inner.borrow().viewport
    }

    fn set_root_attr(&mut self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .root_attrs
            .insert(name.to_string(), value.to_string());
    }

    fn schedule_attr_set(
        &mut self,
        element: &ElementId,
        key: DelayKey,
        delay: Duration,
        name: &str,
        value: &str,
    ) {
        let mut state = self.inner.borrow_mut();
        // Occupied key → replace, never stack.
        state
            .pending
            .retain(|action| !(action.element == *element && action.key == key));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "transition delays are small millisecond values"
        )]
        let due = state.now_ms + delay.as_millis() as u64;
        state.pending.push(PendingAction {
            element: *element,
            key,
            due,
            attr: name.to_string(),
            value: value.to_string(),
        });
    }

    fn cancel_scheduled(&mut self, element: &ElementId, key: DelayKey) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|action| !(action.element == *element && action.key == key));
    }
}

impl fmt::Debug for FakeDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("FakeDom")
            .field("elements", &state.elements.len())
            .field("scroll", &state.scroll)
            .field("viewport", &state.viewport)
            .field("now_ms", &state.now_ms)
            .field("pending", &state.pending.len())
            .finish_non_exhaustive()
    }
}

/// Collects repaint requests and fires them one "repaint" at a time.
///
/// Stands in for the host's `requestAnimationFrame`/`cancelAnimationFrame`
/// pair: the driver submits whatever
/// [`on_event`](FrameScheduler::on_event) returned, then fires queued
/// requests to simulate the next repaint.
#[derive(Debug, Default)]
pub struct FramePump {
    queue: VecDeque<FrameRequest>,
}

impl FramePump {
    /// Creates an empty pump.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues requests returned by a raw-event dispatch.
    pub fn submit(&mut self, requests: Vec<FrameRequest>) {
        self.queue.extend(requests);
    }

    /// Returns the number of queued requests.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fires the oldest queued request into `scheduler`, if any.
    pub fn fire_next(&mut self, scheduler: &mut FrameScheduler) -> Option<FrameRequest> {
        let request = self.queue.pop_front()?;
        scheduler.on_frame(request.id);
        Some(request)
    }

    /// Fires every request queued at call time (one simulated repaint) and
    /// returns how many fired.
    pub fn fire_all(&mut self, scheduler: &mut FrameScheduler) -> usize {
        let count = self.queue.len();
        for _ in 0..count {
            let _ = self.fire_next(scheduler);
        }
        count
    }

    /// Drops queued requests whose id appears in `ids` (cancel primitive).
    pub fn cancel(&mut self, ids: &[RequestId]) {
        self.queue.retain(|request| !ids.contains(&request.id));
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use inview_core::stage::StageConfig;
    use inview_core::tracker::{ROOT_DIRECTION_ATTR, ViewportTracker};
    use inview_core::trigger::TriggerKind;

    use super::*;

    type SharedTracker = Rc<RefCell<ViewportTracker<FakeDom>>>;

    fn session(viewport: f64) -> (FakeDom, FrameScheduler, SharedTracker, FramePump) {
        let dom = FakeDom::new(viewport);
        let tracker = Rc::new(RefCell::new(ViewportTracker::new(dom.clone())));
        let mut scheduler = FrameScheduler::new();
        ViewportTracker::attach(&mut scheduler, &tracker);
        (dom, scheduler, tracker, FramePump::new())
    }

    fn attr(dom: &FakeDom, element: ElementId) -> Option<String> {
        dom.attr(&element, "data-inview")
    }

    #[test]
    fn scroll_storm_coalesces_to_one_tick_with_fire_time_geometry() {
        let (dom, mut scheduler, tracker, mut pump) = session(600.0);
        let el = dom.add_element(".item", 1000.0, 500.0);
        tracker.borrow_mut().add_stage(StageConfig::new(".item"));
        assert_eq!(attr(&dom, el).as_deref(), Some("out"));

        // Three raw scroll events land within one repaint interval, each
        // with a different live offset.
        dom.set_scroll(200.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        dom.set_scroll(500.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        dom.set_scroll(800.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        assert_eq!(pump.pending(), 1, "storm coalesces to one request");

        let fired = pump.fire_all(&mut scheduler);
        assert_eq!(fired, 1);
        // The handler read the offset at fire time (800), not at the first
        // event's time (200, where the element is still out of view).
        assert_eq!(tracker.borrow().scroll_offset(), 800.0);
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));
    }

    #[test]
    fn delayed_entry_lands_only_after_virtual_delay() {
        let (dom, _scheduler, tracker, _pump) = session(600.0);
        let el = dom.add_element(".hero", 100.0, 200.0);

        let entered = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&entered);
        tracker.borrow_mut().add_stage(
            StageConfig::new(".hero")
                .delays(Duration::from_millis(200), Duration::ZERO)
                .on_enter(move |_| counter.set(counter.get() + 1)),
        );

        // Entry detected: callback fires at detection time, value waits.
        assert_eq!(entered.get(), 1);
        assert_eq!(attr(&dom, el).as_deref(), Some("out"));
        assert_eq!(dom.pending_delays(), 1);

        dom.advance(199);
        assert_eq!(attr(&dom, el).as_deref(), Some("out"), "199ms is too early");
        dom.advance(1);
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));
        assert_eq!(dom.pending_delays(), 0);
        assert_eq!(entered.get(), 1, "callback does not re-fire when the value lands");
    }

    #[test]
    fn stale_delayed_exit_lands_and_is_corrected_next_tick() {
        let (dom, mut scheduler, tracker, mut pump) = session(600.0);
        let el = dom.add_element(".item", 100.0, 200.0);
        tracker.borrow_mut().add_stage(
            StageConfig::new(".item").delays(Duration::ZERO, Duration::from_millis(150)),
        );
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));

        // Leave: the out-value is scheduled, the attribute still reads in.
        dom.set_scroll(5000.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));
        assert_eq!(dom.pending_delays(), 1);

        // Scroll back before the delay elapses. The attribute still holds
        // the in-value, so no entering transition is initiated and the
        // stale exit lands anyway.
        dom.set_scroll(0.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        dom.advance(150);
        assert_eq!(attr(&dom, el).as_deref(), Some("out"));

        // The next tick observes out-value + in-view and corrects it.
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));
    }

    #[test]
    fn resize_tick_updates_viewport_scroll_tick_applies_it() {
        let (dom, mut scheduler, tracker, mut pump) = session(600.0);
        let el = dom.add_element(".item", 700.0, 100.0);
        tracker.borrow_mut().add_stage(StageConfig::new(".item"));
        assert_eq!(attr(&dom, el).as_deref(), Some("out"));

        // Growing the viewport alone updates geometry but transitions wait
        // for the next scroll tick.
        dom.set_viewport(900.0);
        pump.submit(scheduler.on_event(TriggerKind::Resize));
        pump.fire_all(&mut scheduler);
        assert_eq!(tracker.borrow().viewport_height(), 900.0);
        assert_eq!(attr(&dom, el).as_deref(), Some("out"));

        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        assert_eq!(attr(&dom, el).as_deref(), Some("in"));
    }

    #[test]
    fn direction_is_published_on_the_root() {
        let (dom, mut scheduler, tracker, mut pump) = session(600.0);
        let _ = dom.add_element(".item", 100.0, 200.0);
        tracker.borrow_mut().add_stage(StageConfig::new(".item"));
        assert_eq!(dom.root_attr(ROOT_DIRECTION_ATTR).as_deref(), Some("up"));

        dom.set_scroll(300.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        assert_eq!(dom.root_attr(ROOT_DIRECTION_ATTR).as_deref(), Some("down"));

        dom.set_scroll(100.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        pump.fire_all(&mut scheduler);
        assert_eq!(dom.root_attr(ROOT_DIRECTION_ATTR).as_deref(), Some("up"));
    }

    #[test]
    fn cancel_all_discards_queued_requests() {
        let (dom, mut scheduler, tracker, mut pump) = session(600.0);
        let el = dom.add_element(".item", 1000.0, 500.0);
        tracker.borrow_mut().add_stage(StageConfig::new(".item"));

        dom.set_scroll(800.0);
        pump.submit(scheduler.on_event(TriggerKind::Scroll));
        let cancelled = scheduler.cancel_all();
        pump.cancel(&cancelled);

        assert_eq!(pump.fire_all(&mut scheduler), 0);
        assert_eq!(
            attr(&dom, el).as_deref(),
            Some("out"),
            "no tick ran after teardown"
        );
    }

    #[test]
    fn delayed_actions_fire_in_due_order() {
        let (dom, _scheduler, tracker, _pump) = session(600.0);
        let slow = dom.add_element(".slow", 100.0, 100.0);
        let fast = dom.add_element(".fast", 100.0, 100.0);
        tracker.borrow_mut().add_stage(
            StageConfig::new(".slow").delays(Duration::from_millis(300), Duration::ZERO),
        );
        tracker.borrow_mut().add_stage(
            StageConfig::new(".fast").delays(Duration::from_millis(100), Duration::ZERO),
        );

        dom.advance(100);
        assert_eq!(attr(&dom, fast).as_deref(), Some("in"));
        assert_eq!(attr(&dom, slow).as_deref(), Some("out"));

        dom.advance(200);
        assert_eq!(attr(&dom, slow).as_deref(), Some("in"));
        assert_eq!(dom.now_ms(), 300);
    }
}
