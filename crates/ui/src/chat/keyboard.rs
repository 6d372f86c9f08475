use std::time::Duration;

use gpui::*;
use miniai_chat::KeyboardVisibilityChanged;

/// Source of on-screen keyboard visibility events.
///
/// Desktop platforms have no soft keyboard, so the input bar drives this from
/// focus changes using the configured metrics. Touch platform glue calls
/// [`VirtualKeyboard::show`] and [`VirtualKeyboard::hide`] with the real ones.
pub struct VirtualKeyboard {
    simulated_height: f32,
    animation_duration: Duration,
    visible: bool,
    height: f32,
}

impl EventEmitter<KeyboardVisibilityChanged> for VirtualKeyboard {}

impl VirtualKeyboard {
    pub fn new(simulated_height: f32, animation_duration: Duration) -> Self {
        Self {
            simulated_height,
            animation_duration,
            visible: false,
            height: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn configure(&mut self, simulated_height: f32, animation_duration: Duration) {
        self.simulated_height = simulated_height;
        self.animation_duration = animation_duration;
    }

    /// Announces a keyboard moving to `height`. Re-emits while visible so
    /// height changes (e.g. switching layouts) reach subscribers.
    pub fn show(&mut self, height: f32, duration: Duration, cx: &mut Context<Self>) {
        self.visible = true;
        self.height = height;
        cx.emit(KeyboardVisibilityChanged::shown(height, duration));
    }

    pub fn hide(&mut self, duration: Duration, cx: &mut Context<Self>) {
        if !self.visible {
            return;
        }

        self.visible = false;
        cx.emit(KeyboardVisibilityChanged::hidden(duration));
    }

    /// Re-emits the current state for a subscriber that missed earlier
    /// events. Nothing is emitted while hidden.
    pub fn announce(&mut self, cx: &mut Context<Self>) {
        if self.visible {
            cx.emit(KeyboardVisibilityChanged::shown(
                self.height,
                self.animation_duration,
            ));
        }
    }

    /// Maps text input focus onto simulated keyboard visibility.
    pub fn focus_changed(&mut self, focused: bool, cx: &mut Context<Self>) {
        match (focused, self.visible) {
            (true, false) => self.show(self.simulated_height, self.animation_duration, cx),
            (false, true) => self.hide(self.animation_duration, cx),
            _ => {}
        }
    }
}
