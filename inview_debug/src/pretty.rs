// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use inview_core::trace::{
    ScrollSampleEvent, TickFireEvent, TickRequestEvent, TraceSink, TransitionEvent,
    TransitionPhase,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn phase_name(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Enter => "enter",
        TransitionPhase::Leave => "leave",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick_request(&mut self, e: &TickRequestEvent) {
        let _ = writeln!(
            self.writer,
            "[request] {} id={}",
            e.kind.event_name(),
            e.id.0,
        );
    }

    fn on_tick_fire(&mut self, e: &TickFireEvent) {
        let _ = writeln!(self.writer, "[tick] {} id={}", e.kind.event_name(), e.id.0);
    }

    fn on_scroll_sample(&mut self, e: &ScrollSampleEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll] offset={:.1} prev={:.1} dir={}",
            e.offset,
            e.previous,
            e.direction.as_str(),
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] stage={} element={} {}{}",
            e.stage,
            e.element,
            phase_name(e.phase),
            if e.delayed { " (delayed)" } else { "" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inview_core::host::RequestId;
    use inview_core::tracker::ScrollDirection;
    use inview_core::trigger::TriggerKind;

    fn lines(sink: PrettyPrintSink<Vec<u8>>) -> Vec<String> {
        String::from_utf8(sink.into_writer())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        sink.on_tick_request(&TickRequestEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(4),
        });
        sink.on_tick_fire(&TickFireEvent {
            kind: TriggerKind::Scroll,
            id: RequestId(4),
        });
        sink.on_scroll_sample(&ScrollSampleEvent {
            offset: 420.0,
            previous: 0.0,
            direction: ScrollDirection::Down,
        });
        sink.on_transition(&TransitionEvent {
            stage: 0,
            element: 2,
            phase: TransitionPhase::Enter,
            delayed: true,
        });

        let lines = lines(sink);
        assert_eq!(
            lines,
            vec![
                "[request] scroll id=4",
                "[tick] scroll id=4",
                "[scroll] offset=420.0 prev=0.0 dir=down",
                "[transition] stage=0 element=2 enter (delayed)",
            ]
        );
    }

    #[test]
    fn immediate_transition_has_no_delay_marker() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        sink.on_transition(&TransitionEvent {
            stage: 1,
            element: 0,
            phase: TransitionPhase::Leave,
            delayed: false,
        });
        assert_eq!(lines(sink), vec!["[transition] stage=1 element=0 leave"]);
    }
}
