use std::time::Duration;

/// Emitted when the user asks to send the current input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequested {
    pub text: String,
}

impl SendRequested {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardDirection {
    Shown,
    Hidden,
}

/// Emitted by the keyboard source when the on-screen keyboard starts moving.
///
/// `height` is the keyboard's target height in logical pixels and is ignored
/// for [`KeyboardDirection::Hidden`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardVisibilityChanged {
    pub height: f32,
    pub duration: Duration,
    pub direction: KeyboardDirection,
}

impl KeyboardVisibilityChanged {
    pub fn shown(height: f32, duration: Duration) -> Self {
        Self {
            height,
            duration,
            direction: KeyboardDirection::Shown,
        }
    }

    pub fn hidden(duration: Duration) -> Self {
        Self {
            height: 0.0,
            duration,
            direction: KeyboardDirection::Hidden,
        }
    }
}
