#![deny(unsafe_code)]

//! Toolkit-free chat screen domain.
//!
//! Everything here is plain data and deterministic state transitions so the
//! gpui application crate only wires events to a [`ChatScreen`] and applies
//! the [`ScreenUpdate`] it gets back.

/// Bubble layout contract for one message row.
pub mod bubble;
pub mod error;
/// Event payloads crossing the input bar and keyboard boundaries.
pub mod events;
/// Keyboard inset math and subscription lifecycle.
pub mod keyboard;
pub mod message;
/// Screen controller state.
pub mod screen;

pub use bubble::{
    BubbleAlignment, BubbleLayout, BubblePalette, BubbleStyle, layout_bubble,
    normalize_width_fraction,
};
pub use error::{ChatError, ChatResult};
pub use events::{KeyboardDirection, KeyboardVisibilityChanged, SendRequested};
pub use keyboard::{InsetAnimation, KeyboardSubscription, ease_in_out, keyboard_inset};
pub use message::{Message, MessageId, Role};
pub use screen::{ChatScreen, ScreenUpdate};
