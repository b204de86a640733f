// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw browser timing bindings.
//!
//! Direct global bindings instead of `web_sys::Window` methods — avoids
//! fetching (and unwrapping) the Window object on every event and every
//! delayed attribute change.
//!
//! [`submit_frame`] prefers `requestAnimationFrame` and falls back to a
//! `setTimeout(…, 16)` approximation in contexts without it (e.g. workers).

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> Result<i32, JsValue>;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    pub(crate) fn set_timeout(callback: &JsValue, ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    pub(crate) fn clear_timeout(id: i32);
}

/// Interval used by the `setTimeout` fallback, approximating one 60 Hz frame.
const FALLBACK_FRAME_MS: i32 = 16;

/// Handle to one submitted before-repaint callback.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FrameHandle {
    Raf(i32),
    Timeout(i32),
}

/// Schedules `callback` to run before the next repaint.
pub(crate) fn submit_frame(callback: &JsValue) -> FrameHandle {
    match request_animation_frame(callback) {
        Ok(id) => FrameHandle::Raf(id),
        Err(_) => FrameHandle::Timeout(set_timeout(callback, FALLBACK_FRAME_MS)),
    }
}

/// Cancels a callback scheduled with [`submit_frame`].
pub(crate) fn cancel_frame(handle: FrameHandle) {
    match handle {
        FrameHandle::Raf(id) => cancel_animation_frame(id),
        FrameHandle::Timeout(id) => clear_timeout(id),
    }
}
