use std::time::Instant;

use gpui::*;
use gpui_component::{ActiveTheme, v_flex};
use miniai_chat::{
    ChatScreen, InsetAnimation, KeyboardVisibilityChanged, ScreenUpdate, SendRequested,
};

use crate::chat::keyboard::VirtualKeyboard;
use crate::chat::message_input::{InputChanged, InputFocusChanged, MessageInput};
use crate::chat::message_list::{ListScrolled, MessageList};
use crate::settings::SettingsStore;

/// Inset animation currently driving the input bar.
#[derive(Debug, Clone, Copy)]
struct RunningInset {
    animation: InsetAnimation,
    started_at: Instant,
}

impl RunningInset {
    fn current(&self) -> f32 {
        self.animation.at(self.started_at.elapsed())
    }
}

/// The chat screen: message list above an input bar that rides on top of the
/// keyboard.
///
/// State changes go through [`ChatScreen`]; this view only applies the
/// returned [`ScreenUpdate`]s to its child entities.
pub struct ChatView {
    screen: ChatScreen,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    keyboard: Entity<VirtualKeyboard>,
    keyboard_subscription: Option<Subscription>,
    inset: Option<RunningInset>,
    inset_generation: usize,
    pending_scroll_task: Option<Task<()>>,
}

impl ChatView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let settings = cx.global::<SettingsStore>().settings();

        let message_list = cx.new(|cx| MessageList::new(settings.bubble_width_fraction, cx));
        let message_input = cx.new(|cx| MessageInput::new(window, cx));
        let keyboard = cx.new(|_| {
            VirtualKeyboard::new(
                settings.keyboard.simulated_height,
                settings.keyboard.animation_duration(),
            )
        });

        cx.subscribe_in(
            &message_input,
            window,
            |this, _, event: &SendRequested, window, cx| {
                this.handle_send(event.clone(), window, cx);
            },
        )
        .detach();

        cx.subscribe(&message_input, |this, _, event: &InputChanged, _cx| {
            this.screen.set_input(event.text.clone());
        })
        .detach();

        cx.subscribe(&message_input, |this, _, event: &InputFocusChanged, cx| {
            let focused = event.focused;
            this.keyboard
                .update(cx, |keyboard, cx| keyboard.focus_changed(focused, cx));
        })
        .detach();

        cx.subscribe_in(
            &message_list,
            window,
            |this, _, _: &ListScrolled, window, cx| {
                this.dismiss_keyboard(window, cx);
            },
        )
        .detach();

        Self {
            screen: ChatScreen::new(settings.safe_area_bottom),
            message_list,
            message_input,
            keyboard,
            keyboard_subscription: None,
            inset: None,
            inset_generation: 0,
            pending_scroll_task: None,
        }
    }

    /// Subscribes to keyboard events while the screen is visible.
    ///
    /// A keyboard that came up while the screen was hidden is replayed so the
    /// input bar catches up with it.
    pub fn appear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.screen.appear() {
            return;
        }

        self.keyboard_subscription = Some(cx.subscribe_in(
            &self.keyboard,
            window,
            |this, _, event: &KeyboardVisibilityChanged, window, cx| {
                this.handle_keyboard(*event, window, cx);
            },
        ));

        if self.keyboard.read(cx).is_visible() {
            self.keyboard.update(cx, |keyboard, cx| keyboard.announce(cx));
        }
    }

    pub fn disappear(&mut self, cx: &mut Context<Self>) {
        if !self.screen.disappear() {
            return;
        }

        self.keyboard_subscription = None;
        self.inset = None;
        self.pending_scroll_task = None;
        cx.notify();
    }

    /// Re-reads live settings into the screen and its children.
    pub fn apply_settings(&mut self, cx: &mut Context<Self>) {
        let settings = cx.global::<SettingsStore>().settings();

        self.screen.set_safe_area_bottom(settings.safe_area_bottom);
        self.message_list.update(cx, |list, cx| {
            list.set_width_fraction(settings.bubble_width_fraction, cx);
        });
        self.keyboard.update(cx, |keyboard, _cx| {
            keyboard.configure(
                settings.keyboard.simulated_height,
                settings.keyboard.animation_duration(),
            );
        });
        cx.notify();
    }

    fn handle_send(&mut self, event: SendRequested, window: &mut Window, cx: &mut Context<Self>) {
        let update = self.screen.handle_send(event);
        self.apply_update(update, window, cx);
    }

    fn handle_keyboard(
        &mut self,
        event: KeyboardVisibilityChanged,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let update = self.screen.handle_keyboard(event);
        self.apply_update(update, window, cx);
    }

    /// Scrolling the list while the keyboard is up dismisses it.
    fn dismiss_keyboard(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.screen.is_keyboard_visible() {
            return;
        }

        window.blur();
        self.keyboard
            .update(cx, |keyboard, cx| keyboard.focus_changed(false, cx));
    }

    fn apply_update(&mut self, update: ScreenUpdate, window: &mut Window, cx: &mut Context<Self>) {
        if update.is_noop() {
            return;
        }

        if update.reload {
            let messages = self.screen.messages().to_vec();
            self.message_list
                .update(cx, |list, cx| list.set_messages(messages, cx));
        }

        if update.clear_input {
            self.message_input
                .update(cx, |input, cx| input.clear(window, cx));
        }

        match (update.inset, update.scroll_to_row) {
            (Some(animation), scroll_to_row) => {
                self.start_inset_animation(animation, scroll_to_row, cx);
            }
            (None, Some(row)) => self.scroll_to_row(row, cx),
            (None, None) => {}
        }

        cx.notify();
    }

    /// Starts moving the input bar, then scrolls once it has settled.
    ///
    /// An animation already in flight is interrupted and the new one starts
    /// from wherever the bar currently is.
    fn start_inset_animation(
        &mut self,
        animation: InsetAnimation,
        scroll_to_row: Option<usize>,
        cx: &mut Context<Self>,
    ) {
        let animation = animation.starting_from(self.current_inset());
        self.inset_generation = self.inset_generation.wrapping_add(1);
        self.inset = Some(RunningInset {
            animation,
            started_at: Instant::now(),
        });
        self.pending_scroll_task = None;

        let Some(row) = scroll_to_row else {
            return;
        };

        if animation.is_instant() {
            self.scroll_to_row(row, cx);
            return;
        }

        let duration = animation.duration;
        self.pending_scroll_task = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(duration).await;

            let _ = this.update(cx, |this, cx| {
                this.pending_scroll_task = None;
                this.scroll_to_row(row, cx);
            });
        }));
    }

    fn scroll_to_row(&mut self, row: usize, cx: &mut Context<Self>) {
        self.message_list
            .update(cx, |list, cx| list.scroll_to_row(row, cx));
    }

    fn current_inset(&self) -> f32 {
        self.inset
            .map(|running| running.current())
            .unwrap_or_else(|| self.screen.bottom_inset())
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        let content = v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            );

        match self.inset {
            Some(running) if !running.animation.is_instant() => {
                let animation = running.animation;
                content
                    .with_animation(
                        ("keyboard-inset", self.inset_generation),
                        Animation::new(animation.duration),
                        move |el, delta| el.pb(px(animation.sample(delta))),
                    )
                    .into_any_element()
            }
            _ => content
                .pb(px(self.screen.bottom_inset()))
                .into_any_element(),
        }
    }
}
