// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live-page [`DomHost`] implementation.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, Window};

use inview_core::host::{DelayKey, DomHost};

use crate::raf::{clear_timeout, set_timeout};

/// One scheduled delayed attribute change.
///
/// The closure must stay alive until the timer fires; dropping it after the
/// timer has fired is harmless, as is `clearTimeout` on an expired handle.
struct DelayTimer {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

/// [`DomHost`] backed by the live browser page.
///
/// Element handles are [`web_sys::Element`] references; geometry reads combine
/// `getBoundingClientRect` with the window scroll offsets to produce document
/// coordinates. Delayed attribute changes run on `setTimeout`.
pub struct WebDom {
    window: Window,
    document: Document,
    timers: BTreeMap<DelayKey, DelayTimer>,
}

impl WebDom {
    /// Creates a host over the global `window` and its document.
    ///
    /// Returns `None` outside a browser main thread (no global window or no
    /// document on it).
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            timers: BTreeMap::new(),
        })
    }

    /// Returns the number of delayed attribute changes whose timers have been
    /// set and not yet cancelled or replaced.
    ///
    /// Entries whose timers have already fired still count until the key is
    /// reused or cancelled, mirroring `setTimeout` handle semantics.
    #[must_use]
    pub fn scheduled_len(&self) -> usize {
        self.timers.len()
    }

    fn horizontal_scroll(&self) -> f64 {
        self.window.scroll_x().unwrap_or(0.0)
    }
}

impl core::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebDom")
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl DomHost for WebDom {
    type Element = Element;

    fn query(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            // Invalid selector: matches nothing rather than erroring.
            return Vec::new();
        };
        let mut out = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(element) = list.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                out.push(element);
            }
        }
        out
    }

    fn attr(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attr(&mut self, element: &Element, name: &str, value: &str) {
        let _ = element.set_attribute(name, value);
    }

    fn remove_attr(&mut self, element: &Element, name: &str) {
        let _ = element.remove_attribute(name);
    }

    fn bounds(&self, element: &Element) -> Rect {
        // getBoundingClientRect is viewport-relative; shift by the scroll
        // offsets to get document coordinates.
        let rect = element.get_bounding_client_rect();
        let x = self.horizontal_scroll();
        let y = self.scroll_offset();
        Rect::new(rect.left() + x, rect.top() + y, rect.right() + x, rect.bottom() + y)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn set_root_attr(&mut self, name: &str, value: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(name, value);
        }
    }

    fn schedule_attr_set(
        &mut self,
        element: &Element,
        key: DelayKey,
        delay: Duration,
        name: &str,
        value: &str,
    ) {
        if let Some(old) = self.timers.remove(&key) {
            clear_timeout(old.handle);
        }

        let element = element.clone();
        let name = String::from(name);
        let value = String::from(value);
        let closure = Closure::wrap(Box::new(move || {
            let _ = element.set_attribute(&name, &value);
        }) as Box<dyn FnMut()>);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "transition delays are small millisecond values"
        )]
        let ms = delay.as_millis() as i32;
        let handle = set_timeout(closure.as_ref().unchecked_ref(), ms);
        self.timers.insert(
            key,
            DelayTimer {
                handle,
                _closure: closure,
            },
        );
    }

    fn cancel_scheduled(&mut self, _element: &Element, key: DelayKey) {
        if let Some(timer) = self.timers.remove(&key) {
            clear_timeout(timer.handle);
        }
    }
}

impl Drop for WebDom {
    fn drop(&mut self) {
        for timer in self.timers.values() {
            clear_timeout(timer.handle);
        }
    }
}
