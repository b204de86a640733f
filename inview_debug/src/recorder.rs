// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording and JSON export.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores every event as a
//! [`RecordedEvent`]. [`RecorderSink::to_json`] exports the recording as a
//! JSON array (one object per event, tagged by `"type"`) for offline
//! inspection or diffing across sessions.

use inview_core::trace::{
    ScrollSampleEvent, TickFireEvent, TickRequestEvent, TraceSink, TransitionEvent,
    TransitionPhase,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`TickRequestEvent`].
    TickRequest(TickRequestEvent),
    /// A [`TickFireEvent`].
    TickFire(TickFireEvent),
    /// A [`ScrollSampleEvent`].
    ScrollSample(ScrollSampleEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
}

/// A [`TraceSink`] that stores events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Exports the recording as a JSON array, one object per event.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let items: Vec<serde_json::Value> = self.events.iter().map(event_to_json).collect();
        serde_json::Value::Array(items)
    }
}

fn phase_name(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Enter => "enter",
        TransitionPhase::Leave => "leave",
    }
}

fn event_to_json(event: &RecordedEvent) -> serde_json::Value {
    match event {
        RecordedEvent::TickRequest(e) => serde_json::json!({
            "type": "request",
            "kind": e.kind.event_name(),
            "id": e.id.0,
        }),
        RecordedEvent::TickFire(e) => serde_json::json!({
            "type": "tick",
            "kind": e.kind.event_name(),
            "id": e.id.0,
        }),
        RecordedEvent::ScrollSample(e) => serde_json::json!({
            "type": "scroll",
            "offset": e.offset,
            "previous": e.previous,
            "direction": e.direction.as_str(),
        }),
        RecordedEvent::Transition(e) => serde_json::json!({
            "type": "transition",
            "stage": e.stage,
            "element": e.element,
            "phase": phase_name(e.phase),
            "delayed": e.delayed,
        }),
    }
}

impl TraceSink for RecorderSink {
    fn on_tick_request(&mut self, e: &TickRequestEvent) {
        self.events.push(RecordedEvent::TickRequest(*e));
    }

    fn on_tick_fire(&mut self, e: &TickFireEvent) {
        self.events.push(RecordedEvent::TickFire(*e));
    }

    fn on_scroll_sample(&mut self, e: &ScrollSampleEvent) {
        self.events.push(RecordedEvent::ScrollSample(*e));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.events.push(RecordedEvent::Transition(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inview_core::host::RequestId;
    use inview_core::tracker::ScrollDirection;
    use inview_core::trigger::TriggerKind;

    fn record_sample_session() -> RecorderSink {
        let mut rec = RecorderSink::new();
        rec.on_tick_request(&TickRequestEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(0),
        });
        rec.on_tick_fire(&TickFireEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(0),
        });
        rec.on_scroll_sample(&ScrollSampleEvent {
            offset: 640.0,
            previous: 0.0,
            direction: ScrollDirection::Down,
        });
        rec.on_transition(&TransitionEvent {
            stage: 0,
            element: 1,
            phase: TransitionPhase::Enter,
            delayed: false,
        });
        rec
    }

    #[test]
    fn events_arrive_in_order() {
        let rec = record_sample_session();
        let events = rec.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::TickRequest(_)));
        assert!(matches!(events[1], RecordedEvent::TickFire(_)));
        assert!(matches!(events[2], RecordedEvent::ScrollSample(_)));
        assert!(matches!(events[3], RecordedEvent::Transition(_)));
    }

    #[test]
    fn json_export_tags_every_event() {
        let rec = record_sample_session();
        let json = rec.to_json();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0]["type"], "request");
        assert_eq!(items[0]["kind"], "scroll");
        assert_eq!(items[1]["type"], "tick");
        assert_eq!(items[2]["type"], "scroll");
        assert_eq!(items[2]["direction"], "down");
        assert_eq!(items[3]["type"], "transition");
        assert_eq!(items[3]["phase"], "enter");
        assert_eq!(items[3]["delayed"], false);
    }

    #[test]
    fn empty_recorder_exports_empty_array() {
        let rec = RecorderSink::new();
        assert_eq!(rec.to_json(), serde_json::json!([]));
    }
}
