// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalesced scroll/resize scheduling and viewport visibility tracking.
//!
//! `inview_core` watches the host environment's scroll and resize events and
//! toggles a state attribute on registered elements as they enter or leave the
//! viewport, optionally after a delay, optionally invoking a callback. It is
//! `no_std` compatible (with `alloc`) and talks to the page through a single
//! capability trait, so it runs unchanged against a real DOM or a scripted
//! fake.
//!
//! # Architecture
//!
//! The crate is organized around a per-frame loop that turns raw environment
//! events into attribute transitions:
//!
//! ```text
//!   Host glue (event source)
//!       │  raw scroll / resize
//!       ▼
//!   FrameScheduler::on_event() ──► FrameRequest ──► host repaint primitive
//!                                                        │ fires
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   FrameScheduler::on_frame() ──► registered callback
//!                                       │
//!                                       ▼
//!   ViewportTracker::handle_scroll() / handle_resize()
//!       │  geometry + transition pass
//!       ▼
//!   DomHost attribute writes, delayed actions, stage callbacks
//! ```
//!
//! **[`trigger`]** — Closed [`TriggerKind`](trigger::TriggerKind) enum over
//! the coalesced event classes. Unsupported kinds are unrepresentable.
//!
//! **[`scheduler`]** — [`FrameScheduler`](scheduler::FrameScheduler), which
//! guarantees at most one callback invocation per trigger kind per repaint
//! interval no matter how often the raw events fire.
//!
//! **[`stage`]** — Immutable [`StageConfig`](stage::StageConfig) describing
//! one group of tracked elements, with explicit defaulting at construction.
//!
//! **[`tracker`]** — [`ViewportTracker`](tracker::ViewportTracker), which
//! owns the stage collection, recomputes scroll position, direction, and
//! viewport height, and drives in/out transitions.
//!
//! **[`host`]** — The [`DomHost`](host::DomHost) capability trait that
//! platform backends implement: query by selector, attribute access, element
//! geometry, and per-element keyed delayed actions.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod host;
pub mod scheduler;
pub mod stage;
pub mod trace;
pub mod tracker;
pub mod trigger;
