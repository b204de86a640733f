// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage collection and the in/out transition pass.
//!
//! [`ViewportTracker`] owns the registered stages and, on every coalesced
//! scroll or resize tick, recomputes geometry and drives each tracked
//! element's visibility attribute and callbacks.
//!
//! An element is *in view* when
//!
//! ```text
//! scroll + viewport_height > bounds.top + offset_top
//!     && scroll < bounds.top + bounds.height - offset_bottom
//! ```
//!
//! with strict inequalities on both bounds: an element exactly at either
//! boundary is out of view.
//!
//! Within one tick, stages are evaluated in registration order and elements
//! within a stage in selector-match order. Transitions are guarded by the
//! element's current attribute value, so re-evaluating at an unchanged
//! scroll position writes nothing.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use crate::host::{DelayKey, DomHost};
use crate::scheduler::FrameScheduler;
use crate::stage::StageConfig;
use crate::trigger::TriggerKind;

/// Attribute set on the document root to publish the scroll direction.
pub const ROOT_DIRECTION_ATTR: &str = "scroll-direction";

/// Direction of the most recent scroll movement.
///
/// Derived per scroll tick: `Down` when the new offset is strictly greater
/// than the previous one, `Up` otherwise (ties resolve to `Up`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Scrolling toward the top of the document.
    Up,
    /// Scrolling toward the bottom of the document.
    Down,
}

impl ScrollDirection {
    /// The attribute value published for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// One registered stage: its immutable configuration plus a stable id used
/// to key delayed actions (stable across removal of other stages).
struct Stage<E> {
    id: u32,
    config: StageConfig<E>,
}

/// Tracks registered stages and drives visibility transitions.
///
/// The tracker owns its [`DomHost`]; host glue shares the tracker behind
/// `Rc<RefCell<…>>` and wires it to a [`FrameScheduler`] with
/// [`attach`](Self::attach).
pub struct ViewportTracker<D: DomHost> {
    dom: D,
    stages: Vec<Stage<D::Element>>,
    next_stage_id: u32,
    scroll: f64,
    prev_scroll: f64,
    direction: Option<ScrollDirection>,
    viewport_height: f64,
}

impl<D: DomHost> ViewportTracker<D> {
    /// Creates a tracker with no stages over the given host.
    ///
    /// Scroll offsets start at zero; the first real scroll tick therefore
    /// reports `Down` only if the page has actually moved past the top.
    #[must_use]
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            stages: Vec::new(),
            next_stage_id: 0,
            scroll: 0.0,
            prev_scroll: 0.0,
            direction: None,
            viewport_height: 0.0,
        }
    }

    /// Registers the shared tracker with `scheduler` for both trigger kinds.
    ///
    /// Resize ticks re-read the viewport height; scroll ticks run the full
    /// transition pass.
    pub fn attach(scheduler: &mut FrameScheduler, tracker: &Rc<RefCell<Self>>)
    where
        D: 'static,
    {
        for kind in TriggerKind::ALL {
            let shared = Rc::clone(tracker);
            scheduler.register(
                kind,
                alloc::boxed::Box::new(move |kind| {
                    let mut tracker = shared.borrow_mut();
                    match kind {
                        TriggerKind::Resize => tracker.handle_resize(),
                        TriggerKind::Scroll => tracker.handle_scroll(),
                    }
                }),
            );
        }
    }

    /// Returns a reference to the host.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Returns a mutable reference to the host.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the scroll offset read on the most recent scroll tick.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    /// Returns the direction derived on the most recent scroll tick, or
    /// `None` before the first tick.
    #[must_use]
    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Returns the viewport height read on the most recent resize tick.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Registers a stage.
    ///
    /// Every element currently matching the stage's selector is immediately
    /// initialized to the out-value, then one forced resize + scroll
    /// evaluation runs so elements already in view flip to the in-value
    /// without waiting for a real event.
    pub fn add_stage(&mut self, config: StageConfig<D::Element>) {
        for element in self.dom.query(&config.selector) {
            self.dom.set_attr(&element, &config.attr, &config.out_value);
        }
        let id = self.next_stage_id;
        self.next_stage_id += 1;
        self.stages.push(Stage { id, config });
        self.handle_resize();
        self.handle_scroll();
    }

    /// Removes every stage whose selector exactly equals `selector`.
    ///
    /// The stage attribute is removed from all matching elements and any
    /// pending delayed transitions owned by the removed stages are
    /// cancelled, so the elements receive no further state changes. No-op
    /// when nothing matches.
    pub fn remove_stage(&mut self, selector: &str) {
        let mut index = 0;
        while index < self.stages.len() {
            if self.stages[index].config.selector != selector {
                index += 1;
                continue;
            }
            let stage = self.stages.remove(index);
            for (slot, element) in self.dom.query(&stage.config.selector).iter().enumerate() {
                self.dom.cancel_scheduled(
                    element,
                    DelayKey {
                        stage: stage.id,
                        element: element_slot(slot),
                    },
                );
                self.dom.remove_attr(element, &stage.config.attr);
            }
        }
    }

    /// Discards all stages without touching element attributes.
    ///
    /// State is abandoned, not reset: attributes keep their last value and
    /// in-flight delayed transitions still land.
    pub fn clear_stages(&mut self) {
        self.stages.clear();
    }

    /// Recomputes the viewport height from the host.
    pub fn handle_resize(&mut self) {
        self.viewport_height = self.dom.viewport_height();
    }

    /// Processes one coalesced scroll tick.
    ///
    /// Shifts the current offset to previous, reads the new offset, derives
    /// and publishes the scroll direction, then runs the transition pass.
    pub fn handle_scroll(&mut self) {
        self.prev_scroll = self.scroll;
        self.scroll = self.dom.scroll_offset();
        let direction = if self.scroll > self.prev_scroll {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        self.direction = Some(direction);
        self.dom.set_root_attr(ROOT_DIRECTION_ATTR, direction.as_str());
        self.evaluate_stages();
    }

    /// The transition-evaluation pass.
    fn evaluate_stages(&mut self) {
        let scroll = self.scroll;
        let viewport = self.viewport_height;
        let dom = &mut self.dom;

        for stage in &mut self.stages {
            let elements = dom.query(&stage.config.selector);
            for (slot, element) in elements.iter().enumerate() {
                let bounds = dom.bounds(element);
                let top_pos = bounds.y0 + stage.config.offset_top;
                let bot_pos = bounds.y0 + bounds.height() - stage.config.offset_bottom;
                let in_view = scroll + viewport > top_pos && scroll < bot_pos;

                let current = dom.attr(element, &stage.config.attr);
                let key = DelayKey {
                    stage: stage.id,
                    element: element_slot(slot),
                };

                if in_view && current.as_deref() == Some(stage.config.out_value.as_str()) {
                    if stage.config.delay_in > Duration::ZERO {
                        dom.cancel_scheduled(element, key);
                        dom.schedule_attr_set(
                            element,
                            key,
                            stage.config.delay_in,
                            &stage.config.attr,
                            &stage.config.in_value,
                        );
                    } else {
                        dom.set_attr(element, &stage.config.attr, &stage.config.in_value);
                    }
                    // Fires at detection time, before a delayed value lands.
                    if let Some(callback) = stage.config.in_callback.as_mut() {
                        callback(element);
                    }
                } else if !in_view
                    && current.as_deref() == Some(stage.config.in_value.as_str())
                {
                    if stage.config.delay_out > Duration::ZERO {
                        dom.cancel_scheduled(element, key);
                        dom.schedule_attr_set(
                            element,
                            key,
                            stage.config.delay_out,
                            &stage.config.attr,
                            &stage.config.out_value,
                        );
                    } else {
                        dom.set_attr(element, &stage.config.attr, &stage.config.out_value);
                    }
                    if let Some(callback) = stage.config.out_callback.as_mut() {
                        callback(element);
                    }
                }
            }
        }
    }
}

impl<D: DomHost> fmt::Debug for ViewportTracker<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportTracker")
            .field("stages", &self.stages.len())
            .field("scroll", &self.scroll)
            .field("prev_scroll", &self.prev_scroll)
            .field("direction", &self.direction)
            .field("viewport_height", &self.viewport_height)
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "selector matches are far below u32::MAX; truncation cannot occur in practice"
)]
fn element_slot(slot: usize) -> u32 {
    slot as u32
}
