use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};
use miniai_chat::SendRequested;

pub const INPUT_PLACEHOLDER: &str = "Ask away...";
pub const SEND_BUTTON_LABEL: &str = "↑";
const INPUT_MIN_HEIGHT: Pixels = px(36.);
const SEND_BUTTON_WIDTH: Pixels = px(32.);

/// Emitted on every edit so the screen mirrors the pending text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChanged {
    pub text: String,
}

/// Emitted when the text field gains or loses focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFocusChanged {
    pub focused: bool,
}

/// Bottom input bar: a single-line text field plus the send button.
///
/// The bar never validates text itself; the screen decides whether a send is
/// accepted and asks for [`MessageInput::clear`] when it is.
pub struct MessageInput {
    input_state: Entity<InputState>,
}

impl EventEmitter<SendRequested> for MessageInput {}
impl EventEmitter<InputChanged> for MessageInput {}
impl EventEmitter<InputFocusChanged> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(INPUT_PLACEHOLDER)
                .clean_on_escape()
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, state, event: &InputEvent, _window, cx| match event {
                InputEvent::PressEnter { secondary: false } => this.request_send(cx),
                InputEvent::Change => {
                    let text = state.read(cx).value().to_string();
                    cx.emit(InputChanged { text });
                }
                InputEvent::Focus => cx.emit(InputFocusChanged { focused: true }),
                InputEvent::Blur => cx.emit(InputFocusChanged { focused: false }),
                _ => {}
            },
        )
        .detach();

        Self { input_state }
    }

    pub fn value(&self, cx: &App) -> String {
        self.input_state.read(cx).value().to_string()
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    fn request_send(&mut self, cx: &mut Context<Self>) {
        let text = self.value(cx);
        cx.emit(SendRequested::new(text));
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .gap_2()
            .px_3()
            .py(px(6.))
            .items_center()
            .bg(theme.secondary)
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .min_h(INPUT_MIN_HEIGHT)
                    .rounded_lg()
                    .overflow_hidden()
                    .child(Input::new(&self.input_state).w_full()),
            )
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .w(SEND_BUTTON_WIDTH)
                    .label(SEND_BUTTON_LABEL)
                    .tooltip("Send")
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.request_send(cx);
                    })),
            )
    }
}
