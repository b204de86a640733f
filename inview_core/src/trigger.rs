// Copyright 2026 the Inview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger kind identification.
//!
//! [`TriggerKind`] names a class of environment events that the
//! [`FrameScheduler`](crate::scheduler::FrameScheduler) coalesces
//! independently of other classes. The enum is closed, so an unsupported
//! kind cannot be expressed at all.

use core::fmt;

/// A class of environment events coalesced independently of other classes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriggerKind {
    /// The viewport was resized.
    Resize,
    /// The document scrolled.
    Scroll,
}

impl TriggerKind {
    /// All supported trigger kinds, in subscription order.
    pub const ALL: [Self; 2] = [Self::Resize, Self::Scroll];

    /// The host event name this kind subscribes to (`"resize"`/`"scroll"`).
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Scroll => "scroll",
        }
    }
}

impl fmt::Debug for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}
