// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll session that exercises the tracking and diagnostics
//! pipeline.
//!
//! Drives a scripted page through the scheduler and tracker, recording events
//! to both a [`PrettyPrintSink`](inview_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](inview_debug::recorder::RecorderSink), then exports the
//! recording as JSON.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use inview_core::host::DomHost as _;
use inview_core::scheduler::FrameScheduler;
use inview_core::stage::StageConfig;
use inview_core::trace::{
    ScrollSampleEvent, TickFireEvent, TickRequestEvent, TraceSink, Tracer, TransitionEvent,
    TransitionPhase,
};
use inview_core::tracker::{ViewportTracker, ROOT_DIRECTION_ATTR};
use inview_core::trigger::TriggerKind;
use inview_harness::{ElementId, FakeDom, FramePump};

use inview_debug::pretty::PrettyPrintSink;
use inview_debug::recorder::RecorderSink;

/// Stage 0: the hero banner, immediate transitions.
const HERO_STAGE: u32 = 0;
/// Stage 1: content panels, 150 ms entry delay.
const PANEL_STAGE: u32 = 1;
const PANEL_DELAY_MS: u64 = 150;

/// Scripted scroll positions with the raw-event burst size at each stop.
const SCRIPT: &[(f64, u32)] = &[(350.0, 4), (700.0, 3), (1400.0, 2), (100.0, 1)];

type TransitionLog = Rc<RefCell<Vec<(u32, u32, TransitionPhase)>>>;

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- scripted page -----------------------------------------------------
    let dom = FakeDom::new(600.0);
    let _ = dom.add_element(".hero", 200.0, 300.0);
    let _ = dom.add_element(".panel", 800.0, 400.0);
    let _ = dom.add_element(".panel", 1600.0, 400.0);

    // -- scheduler + tracker ----------------------------------------------
    let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
    let tracker = Rc::new(RefCell::new(ViewportTracker::new(dom.clone())));
    ViewportTracker::attach(&mut scheduler.borrow_mut(), &tracker);

    let log: TransitionLog = Rc::new(RefCell::new(Vec::new()));
    tracker.borrow_mut().add_stage(stage_config(
        HERO_STAGE,
        StageConfig::new(".hero"),
        &log,
    ));
    tracker.borrow_mut().add_stage(stage_config(
        PANEL_STAGE,
        StageConfig::new(".panel")
            .delays(Duration::from_millis(PANEL_DELAY_MS), Duration::ZERO),
        &log,
    ));
    // Registration forced an evaluation pass; surface those transitions too.
    drain_transitions(&mut pretty, &mut recorder, &log);

    // -- simulated session -------------------------------------------------
    let mut pump = FramePump::new();
    let mut previous = 0.0;

    for &(offset, burst) in SCRIPT {
        dom.set_scroll(offset);

        // A burst of raw events coalesces to a single repaint request.
        for _ in 0..burst {
            let requests = scheduler.borrow_mut().on_event(TriggerKind::Scroll);
            for request in &requests {
                emit_request(
                    &mut pretty,
                    &mut recorder,
                    &TickRequestEvent {
                        kind: request.kind,
                        id: request.id,
                    },
                );
            }
            pump.submit(requests);
        }

        while let Some(request) = pump.fire_next(&mut scheduler.borrow_mut()) {
            emit_fire(
                &mut pretty,
                &mut recorder,
                &TickFireEvent {
                    kind: request.kind,
                    id: request.id,
                },
            );
        }

        if let Some(direction) = tracker.borrow().scroll_direction() {
            let sample = ScrollSampleEvent {
                offset,
                previous,
                direction,
            };
            pretty.on_scroll_sample(&sample);
            recorder.on_scroll_sample(&sample);

            // Also exercise the Tracer wrapper (proves it dispatches).
            if previous == 0.0 {
                let mut tracer = Tracer::new(&mut recorder);
                tracer.scroll_sample(&sample);
            }
        }
        previous = offset;

        drain_transitions(&mut pretty, &mut recorder, &log);

        // Let delayed attribute changes land before the next stop.
        dom.advance(PANEL_DELAY_MS + 50);
    }

    // One viewport resize at the end of the session.
    dom.set_viewport(900.0);
    let requests = scheduler.borrow_mut().on_event(TriggerKind::Resize);
    for request in &requests {
        emit_request(
            &mut pretty,
            &mut recorder,
            &TickRequestEvent {
                kind: request.kind,
                id: request.id,
            },
        );
    }
    pump.submit(requests);
    while let Some(request) = pump.fire_next(&mut scheduler.borrow_mut()) {
        emit_fire(
            &mut pretty,
            &mut recorder,
            &TickFireEvent {
                kind: request.kind,
                id: request.id,
            },
        );
    }
    drain_transitions(&mut pretty, &mut recorder, &log);

    // -- teardown ----------------------------------------------------------
    let outstanding = scheduler.borrow_mut().cancel_all();
    pump.cancel(&outstanding);

    // -- summary -----------------------------------------------------------
    let direction = dom
        .root_attr(ROOT_DIRECTION_ATTR)
        .unwrap_or_else(|| String::from("?"));
    println!("final direction: {direction}");
    for element in tracker.borrow().dom().query(".panel") {
        let state = dom
            .attr(&element, StageConfig::<ElementId>::DEFAULT_ATTR)
            .unwrap_or_else(|| String::from("?"));
        println!("panel #{}: {state}", element.0);
    }

    // -- export recording --------------------------------------------------
    let path = "session.json";
    let json = serde_json::to_string_pretty(&recorder.to_json())
        .expect("failed to serialize session recording");
    std::fs::write(path, json).expect("failed to write session.json");
    println!("Wrote {path} ({} events)", recorder.events().len());
}

/// Wires the shared transition log into a stage's enter/leave callbacks.
fn stage_config(
    stage: u32,
    config: StageConfig<ElementId>,
    log: &TransitionLog,
) -> StageConfig<ElementId> {
    let enter_log = Rc::clone(log);
    let leave_log = Rc::clone(log);
    config
        .on_enter(move |element: &ElementId| {
            enter_log
                .borrow_mut()
                .push((stage, element.0, TransitionPhase::Enter));
        })
        .on_leave(move |element: &ElementId| {
            leave_log
                .borrow_mut()
                .push((stage, element.0, TransitionPhase::Leave));
        })
}

/// Emits every logged transition to both sinks and clears the log.
fn drain_transitions(
    pretty: &mut PrettyPrintSink,
    recorder: &mut RecorderSink,
    log: &TransitionLog,
) {
    for (stage, element, phase) in log.borrow_mut().drain(..) {
        let delayed = stage == PANEL_STAGE && phase == TransitionPhase::Enter;
        let event = TransitionEvent {
            stage,
            element,
            phase,
            delayed,
        };
        pretty.on_transition(&event);
        recorder.on_transition(&event);
    }
}

fn emit_request(pretty: &mut PrettyPrintSink, recorder: &mut RecorderSink, e: &TickRequestEvent) {
    pretty.on_tick_request(e);
    recorder.on_tick_request(e);
}

fn emit_fire(pretty: &mut PrettyPrintSink, recorder: &mut RecorderSink, e: &TickFireEvent) {
    pretty.on_tick_fire(e);
    recorder.on_tick_fire(e);
}
