use crate::events::{KeyboardDirection, KeyboardVisibilityChanged, SendRequested};
use crate::keyboard::{InsetAnimation, KeyboardSubscription, keyboard_inset};
use crate::message::Message;

/// Effects a view must apply after one screen operation.
///
/// When both `inset` and `scroll_to_row` are set, the scroll runs once the
/// inset animation has finished.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenUpdate {
    /// Re-render every row of the message list.
    pub reload: bool,
    /// Clear the input bar's text field.
    pub clear_input: bool,
    /// Row to bring into view at the bottom edge.
    pub scroll_to_row: Option<usize>,
    pub inset: Option<InsetAnimation>,
}

impl ScreenUpdate {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// State of one chat screen: message list, pending input and input bar inset.
#[derive(Debug, Default)]
pub struct ChatScreen {
    messages: Vec<Message>,
    input: String,
    bottom_inset: f32,
    safe_area_bottom: f32,
    keyboard_visible: bool,
    keyboard: KeyboardSubscription,
}

impl ChatScreen {
    pub fn new(safe_area_bottom: f32) -> Self {
        Self {
            safe_area_bottom: safe_area_bottom.max(0.0),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Inset the input bar settles at once any running animation ends.
    pub fn bottom_inset(&self) -> f32 {
        self.bottom_inset
    }

    pub fn safe_area_bottom(&self) -> f32 {
        self.safe_area_bottom
    }

    pub fn set_safe_area_bottom(&mut self, safe_area_bottom: f32) {
        self.safe_area_bottom = safe_area_bottom.max(0.0);
    }

    pub fn is_keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    pub fn is_subscribed(&self) -> bool {
        self.keyboard.is_active()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Appends the pending input as a user message.
    ///
    /// Input that trims to empty is ignored without touching any state.
    pub fn submit(&mut self) -> ScreenUpdate {
        let message = match Message::user(self.input.as_str()) {
            Ok(message) => message,
            Err(error) => {
                tracing::debug!("ignoring submit: {error}");
                return ScreenUpdate::default();
            }
        };

        let (id, role) = (message.id(), message.role());
        self.messages.push(message);
        self.input.clear();
        tracing::debug!(
            message_id = %id,
            role = role.label(),
            count = self.messages.len(),
            "appended message"
        );

        ScreenUpdate {
            reload: true,
            clear_input: true,
            scroll_to_row: self.last_row(),
            inset: None,
        }
    }

    pub fn handle_send(&mut self, event: SendRequested) -> ScreenUpdate {
        self.set_input(event.text);
        self.submit()
    }

    /// Registers for keyboard events. Returns false when already registered.
    pub fn appear(&mut self) -> bool {
        let acquired = self.keyboard.acquire();
        if acquired {
            tracing::info!("chat screen appeared, keyboard events subscribed");
        }
        acquired
    }

    /// Drops the keyboard registration. Returns false when none was held.
    ///
    /// Keyboard events are not seen while hidden, so the inset is reset to
    /// the resting position instead of being left at a stale height.
    pub fn disappear(&mut self) -> bool {
        let released = self.keyboard.release();
        if released {
            self.bottom_inset = 0.0;
            self.keyboard_visible = false;
            tracing::info!("chat screen hidden, keyboard events unsubscribed");
        }
        released
    }

    pub fn handle_keyboard(&mut self, event: KeyboardVisibilityChanged) -> ScreenUpdate {
        if !self.keyboard.is_active() {
            tracing::debug!(?event.direction, "keyboard event without subscription, ignoring");
            return ScreenUpdate::default();
        }

        match event.direction {
            KeyboardDirection::Shown => {
                let target = keyboard_inset(event.height, self.safe_area_bottom);
                self.keyboard_visible = true;
                tracing::debug!(height = event.height, inset = target, "keyboard shown");

                ScreenUpdate {
                    scroll_to_row: self.last_row(),
                    inset: Some(self.move_inset_to(target, event)),
                    ..ScreenUpdate::default()
                }
            }
            KeyboardDirection::Hidden => {
                self.keyboard_visible = false;
                tracing::debug!("keyboard hidden");

                ScreenUpdate {
                    inset: Some(self.move_inset_to(0.0, event)),
                    ..ScreenUpdate::default()
                }
            }
        }
    }

    fn move_inset_to(&mut self, target: f32, event: KeyboardVisibilityChanged) -> InsetAnimation {
        let animation = InsetAnimation::new(self.bottom_inset, target, event.duration);
        self.bottom_inset = target;
        animation
    }

    fn last_row(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }
}
