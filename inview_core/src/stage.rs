// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage configuration.
//!
//! A *stage* describes one group of elements to track: which elements, which
//! attribute carries the in/out state, the pixel offsets that shrink the
//! element's effective region, the transition delays, and the optional
//! enter/leave callbacks.
//!
//! [`StageConfig`] is an immutable value object. Defaults are applied
//! explicitly at construction by [`StageConfig::new`] and individual fields
//! are overridden through consuming setters — there is no shared mutable
//! default that later registrations could observe.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::time::Duration;

/// Callback invoked with the element handle when a transition is initiated.
pub type StageCallback<E> = Box<dyn FnMut(&E)>;

/// Configuration for one group of tracked elements.
///
/// Generic over the host's element handle type `E` (see
/// [`DomHost::Element`](crate::host::DomHost::Element)) so that callbacks
/// receive the concrete handle.
pub struct StageConfig<E> {
    /// Selector for the elements to track.
    pub selector: String,
    /// Name of the attribute carrying the in/out state.
    pub attr: String,
    /// Attribute value while the element is in view.
    pub in_value: String,
    /// Attribute value while the element is out of view.
    pub out_value: String,
    /// Pixels added to the element's top edge before the in-view test.
    pub offset_top: f64,
    /// Pixels subtracted from the element's bottom edge before the test.
    pub offset_bottom: f64,
    /// Delay before the in-value lands after entry is detected.
    pub delay_in: Duration,
    /// Delay before the out-value lands after exit is detected.
    pub delay_out: Duration,
    /// Invoked when entry is initiated (at detection time, not after
    /// `delay_in` elapses).
    pub in_callback: Option<StageCallback<E>>,
    /// Invoked when exit is initiated (at detection time, not after
    /// `delay_out` elapses).
    pub out_callback: Option<StageCallback<E>>,
}

impl<E> StageConfig<E> {
    /// Default selector used by [`Default::default`].
    pub const DEFAULT_SELECTOR: &'static str = "section";
    /// Default state attribute name.
    pub const DEFAULT_ATTR: &'static str = "data-inview";
    /// Default in-view attribute value.
    pub const DEFAULT_IN_VALUE: &'static str = "in";
    /// Default out-of-view attribute value.
    pub const DEFAULT_OUT_VALUE: &'static str = "out";

    /// Creates a configuration for `selector` with all other fields at their
    /// documented defaults: `data-inview` attribute, `in`/`out` values, zero
    /// offsets, zero delays, no callbacks.
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self {
            selector: String::from(selector),
            attr: String::from(Self::DEFAULT_ATTR),
            in_value: String::from(Self::DEFAULT_IN_VALUE),
            out_value: String::from(Self::DEFAULT_OUT_VALUE),
            offset_top: 0.0,
            offset_bottom: 0.0,
            delay_in: Duration::ZERO,
            delay_out: Duration::ZERO,
            in_callback: None,
            out_callback: None,
        }
    }

    /// Overrides the state attribute name.
    #[must_use]
    pub fn attr(mut self, name: &str) -> Self {
        self.attr = String::from(name);
        self
    }

    /// Overrides the in/out attribute values.
    #[must_use]
    pub fn values(mut self, in_value: &str, out_value: &str) -> Self {
        self.in_value = String::from(in_value);
        self.out_value = String::from(out_value);
        self
    }

    /// Overrides the top/bottom pixel offsets.
    #[must_use]
    pub fn offsets(mut self, top: f64, bottom: f64) -> Self {
        self.offset_top = top;
        self.offset_bottom = bottom;
        self
    }

    /// Overrides the in/out transition delays.
    #[must_use]
    pub fn delays(mut self, delay_in: Duration, delay_out: Duration) -> Self {
        self.delay_in = delay_in;
        self.delay_out = delay_out;
        self
    }

    /// Sets the callback invoked when entry is initiated.
    #[must_use]
    pub fn on_enter(mut self, callback: impl FnMut(&E) + 'static) -> Self {
        self.in_callback = Some(Box::new(callback));
        self
    }

    /// Sets the callback invoked when exit is initiated.
    #[must_use]
    pub fn on_leave(mut self, callback: impl FnMut(&E) + 'static) -> Self {
        self.out_callback = Some(Box::new(callback));
        self
    }
}

impl<E> Default for StageConfig<E> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SELECTOR)
    }
}

impl<E> fmt::Debug for StageConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageConfig")
            .field("selector", &self.selector)
            .field("attr", &self.attr)
            .field("in_value", &self.in_value)
            .field("out_value", &self.out_value)
            .field("offset_top", &self.offset_top)
            .field("offset_bottom", &self.offset_bottom)
            .field("delay_in", &self.delay_in)
            .field("delay_out", &self.delay_out)
            .field("in_callback", &self.in_callback.is_some())
            .field("out_callback", &self.out_callback.is_some())
            .finish()
    }
}
