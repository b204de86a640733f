// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the event-to-tick pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! session drivers call at each stage: raw event coalesced into a repaint
//! request, coalesced tick fired, scroll sample taken, transition initiated.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.

use crate::host::RequestId;
use crate::tracker::ScrollDirection;
use crate::trigger::TriggerKind;

/// Whether a transition moves the element into or out of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// The element is entering the in-view region.
    Enter,
    /// The element is leaving the in-view region.
    Leave,
}

/// Emitted when a raw event allocates a repaint request (the coalescing
/// step admitted it rather than dropping it).
#[derive(Clone, Copy, Debug)]
pub struct TickRequestEvent {
    /// The trigger kind that fired.
    pub kind: TriggerKind,
    /// The allocated request handle.
    pub id: RequestId,
}

/// Emitted when a coalesced tick runs.
#[derive(Clone, Copy, Debug)]
pub struct TickFireEvent {
    /// The trigger kind whose callback ran.
    pub kind: TriggerKind,
    /// The request handle that fired.
    pub id: RequestId,
}

/// Emitted after a scroll tick has recomputed offsets and direction.
#[derive(Clone, Copy, Debug)]
pub struct ScrollSampleEvent {
    /// Offset read on this tick.
    pub offset: f64,
    /// Offset from the previous tick.
    pub previous: f64,
    /// Direction derived from the two offsets.
    pub direction: ScrollDirection,
}

/// Emitted when a transition is initiated for one element.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Registration-order index of the stage (0-based).
    pub stage: u32,
    /// Selector-match index of the element within its stage.
    pub element: u32,
    /// Enter or leave.
    pub phase: TransitionPhase,
    /// `true` when the attribute change was scheduled after a delay rather
    /// than applied immediately.
    pub delayed: bool,
}

/// Receives trace events from a session driver.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a raw event allocates a repaint request.
    fn on_tick_request(&mut self, e: &TickRequestEvent) {
        _ = e;
    }

    /// Called when a coalesced tick runs.
    fn on_tick_fire(&mut self, e: &TickFireEvent) {
        _ = e;
    }

    /// Called after a scroll tick recomputed offsets and direction.
    fn on_scroll_sample(&mut self, e: &ScrollSampleEvent) {
        _ = e;
    }

    /// Called when a transition is initiated.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickRequestEvent`].
    #[inline]
    pub fn tick_request(&mut self, e: &TickRequestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickFireEvent`].
    #[inline]
    pub fn tick_fire(&mut self, e: &TickFireEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_fire(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScrollSampleEvent`].
    #[inline]
    pub fn scroll_sample(&mut self, e: &ScrollSampleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scroll_sample(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        requests: u32,
        fires: u32,
        samples: u32,
        transitions: u32,
    }

    impl TraceSink for CountingSink {
        fn on_tick_request(&mut self, _e: &TickRequestEvent) {
            self.requests += 1;
        }

        fn on_tick_fire(&mut self, _e: &TickFireEvent) {
            self.fires += 1;
        }

        fn on_scroll_sample(&mut self, _e: &ScrollSampleEvent) {
            self.samples += 1;
        }

        fn on_transition(&mut self, _e: &TransitionEvent) {
            self.transitions += 1;
        }
    }

    #[test]
    fn tracer_dispatches_to_sink() {
        use crate::host::RequestId;

        let mut sink = CountingSink::default();
        let mut tracer = Tracer::new(&mut sink);
        tracer.tick_request(&TickRequestEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(0),
        });
        tracer.tick_fire(&TickFireEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(0),
        });
        tracer.scroll_sample(&ScrollSampleEvent {
            offset: 10.0,
            previous: 0.0,
            direction: ScrollDirection::Down,
        });
        tracer.transition(&TransitionEvent {
            stage: 0,
            element: 0,
            phase: TransitionPhase::Enter,
            delayed: false,
        });
        drop(tracer);
        assert_eq!(
            (sink.requests, sink.fires, sink.samples, sink.transitions),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn none_tracer_is_inert() {
        let mut tracer = Tracer::none();
        tracer.scroll_sample(&ScrollSampleEvent {
            offset: 0.0,
            previous: 0.0,
            direction: ScrollDirection::Up,
        });
    }
}
