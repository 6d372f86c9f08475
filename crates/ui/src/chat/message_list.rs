use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use gpui::*;
use gpui_component::{ActiveTheme, Theme, h_flex, v_flex, v_virtual_list};
use miniai_chat::bubble::{
    CORNER_RADIUS, FONT_SIZE, LINE_HEIGHT, ROW_EDGE_INSET, ROW_MARGIN_Y, TEXT_PADDING_X,
    TEXT_PADDING_Y,
};
use miniai_chat::{
    BubbleAlignment, BubbleLayout, BubblePalette, Message, MessageId, layout_bubble,
    normalize_width_fraction,
};

use crate::chat::scroll_manager::ScrollManager;

/// Row width assumed before the list has been laid out once.
const DEFAULT_ROW_WIDTH: Pixels = px(390.);
const ROW_WIDTH_CHANGE_EPSILON: f32 = 1.0;

/// Emitted when the user scrolls the list by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListScrolled;

struct RowHeight {
    height: Pixels,
    measured: bool,
}

/// Virtualized list of message bubbles.
///
/// Messages never change after creation, so cached row heights only go stale
/// when the row width or the bubble width fraction changes.
pub struct MessageList {
    messages: Vec<Message>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_manager: ScrollManager,
    row_heights: HashMap<MessageId, RowHeight>,
    row_width: Option<Pixels>,
    width_fraction: f32,
}

impl EventEmitter<ListScrolled> for MessageList {}

impl MessageList {
    pub fn new(width_fraction: f32, _cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_manager: ScrollManager::new(),
            row_heights: HashMap::new(),
            row_width: None,
            width_fraction: normalize_width_fraction(width_fraction),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Replaces every row. The list is always reloaded in full.
    pub fn set_messages(&mut self, messages: Vec<Message>, cx: &mut Context<Self>) {
        self.messages = messages;
        self.scroll_manager.discard_out_of_range(self.messages.len());
        self.rebuild_item_sizes();
        cx.notify();
    }

    pub fn set_width_fraction(&mut self, width_fraction: f32, cx: &mut Context<Self>) {
        let width_fraction = normalize_width_fraction(width_fraction);
        if width_fraction == self.width_fraction {
            return;
        }

        self.width_fraction = width_fraction;
        self.invalidate_measurements();
        cx.notify();
    }

    pub fn scroll_to_row(&mut self, row: usize, cx: &mut Context<Self>) {
        if row >= self.messages.len() {
            return;
        }

        self.scroll_manager.request_scroll_to_row(row);
        cx.notify();
    }

    fn update_row_width(&mut self, cx: &mut Context<Self>) {
        let list_width = self.scroll_manager.bounds().size.width;
        if list_width <= Pixels::ZERO {
            return;
        }

        let width_changed = self.row_width.is_none_or(|current| {
            (f32::from(current) - f32::from(list_width)).abs() > ROW_WIDTH_CHANGE_EPSILON
        });

        if width_changed {
            self.row_width = Some(list_width);
            self.invalidate_measurements();
            cx.notify();
        }
    }

    fn invalidate_measurements(&mut self) {
        for entry in self.row_heights.values_mut() {
            entry.measured = false;
        }
        self.rebuild_item_sizes();
    }

    fn rebuild_item_sizes(&mut self) {
        let row_width = self.row_width.unwrap_or(DEFAULT_ROW_WIDTH);
        let mut active_ids = HashSet::with_capacity(self.messages.len());
        let mut sizes = Vec::with_capacity(self.messages.len());

        for message in &self.messages {
            let estimated_height = estimated_row_height(message, row_width, self.width_fraction);
            let entry = self.row_heights.entry(message.id()).or_insert(RowHeight {
                height: estimated_height,
                measured: false,
            });

            if !entry.measured {
                entry.height = estimated_height;
            }

            sizes.push(size(px(0.), entry.height));
            active_ids.insert(message.id());
        }

        self.row_heights.retain(|id, _| active_ids.contains(id));
        self.item_sizes = Rc::new(sizes);
    }

    fn measure_visible_items(
        &mut self,
        visible_range: Range<usize>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let row_width = self.row_width.unwrap_or(DEFAULT_ROW_WIDTH);
        let available_space = size(
            AvailableSpace::Definite(row_width),
            AvailableSpace::MinContent,
        );
        let mut updated = false;

        for index in visible_range {
            let Some(message) = self.messages.get(index).cloned() else {
                continue;
            };
            if self
                .row_heights
                .get(&message.id())
                .is_some_and(|entry| entry.measured)
            {
                continue;
            }

            let mut row = self.render_message_row(&message, cx);
            let measured_height = row.layout_as_root(available_space, window, cx).height;
            let Some(entry) = self.row_heights.get_mut(&message.id()) else {
                continue;
            };
            if pixels_changed(entry.height, measured_height) {
                entry.height = measured_height;
                updated = true;
            }
            entry.measured = true;
        }

        if updated {
            self.rebuild_item_sizes();
            cx.notify();
        }
    }

    fn render_message_row(&self, message: &Message, cx: &mut Context<Self>) -> AnyElement {
        let row_width = self.row_width.unwrap_or(DEFAULT_ROW_WIDTH);
        let layout = layout_bubble(message, f32::from(row_width), self.width_fraction);
        render_bubble(layout, cx.theme())
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.update_row_width(cx);
        self.scroll_manager.apply_pending_scroll();

        v_flex()
            .id("message-list-container")
            .size_full()
            .min_h_0()
            .on_scroll_wheel(cx.listener(|_, _: &ScrollWheelEvent, _window, cx| {
                cx.emit(ListScrolled);
            }))
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "message-list",
                    self.item_sizes.clone(),
                    |this, visible_range, window, cx| {
                        // Measure only visible rows so long histories keep O(visible) layout work.
                        this.update_row_width(cx);
                        this.measure_visible_items(visible_range.clone(), window, cx);
                        visible_range
                            .filter_map(|index| {
                                this.messages
                                    .get(index)
                                    .cloned()
                                    .map(|message| this.render_message_row(&message, cx))
                            })
                            .collect::<Vec<_>>()
                    },
                )
                .size_full()
                .track_scroll(self.scroll_manager.handle()),
            )
    }
}

/// Builds one non-selectable row with the bubble hugging its aligned side.
fn render_bubble(layout: BubbleLayout<'_>, theme: &Theme) -> AnyElement {
    let (fill, foreground) = match layout.style.palette {
        BubblePalette::Accent => (theme.primary, theme.primary_foreground),
        BubblePalette::Neutral => (theme.secondary, theme.secondary_foreground),
    };

    let row = h_flex()
        .w_full()
        .px(px(ROW_EDGE_INSET))
        .py(px(ROW_MARGIN_Y));
    let row = match layout.style.alignment {
        BubbleAlignment::Leading => row.justify_start(),
        BubbleAlignment::Trailing => row.justify_end(),
    };

    row.child(
        div()
            .max_w(px(layout.max_width))
            .px(px(TEXT_PADDING_X))
            .py(px(TEXT_PADDING_Y))
            .rounded(px(CORNER_RADIUS))
            .bg(fill)
            .text_color(foreground)
            .text_size(px(FONT_SIZE))
            .line_height(px(LINE_HEIGHT))
            .child(SharedString::from(layout.text.to_string())),
    )
    .into_any_element()
}

fn estimated_row_height(message: &Message, row_width: Pixels, width_fraction: f32) -> Pixels {
    px(layout_bubble(message, f32::from(row_width), width_fraction).estimated_height)
}

fn pixels_changed(a: Pixels, b: Pixels) -> bool {
    (f32::from(a) - f32::from(b)).abs() > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[::core::prelude::v1::test]
    fn row_height_tracks_bubble_estimate() {
        let short = Message::user("Hello").unwrap();
        let long = Message::user("lorem ipsum ".repeat(120)).unwrap();

        let short_height = estimated_row_height(&short, DEFAULT_ROW_WIDTH, 0.75);
        let long_height = estimated_row_height(&long, DEFAULT_ROW_WIDTH, 0.75);

        assert_eq!(
            f32::from(short_height),
            LINE_HEIGHT + TEXT_PADDING_Y * 2.0 + ROW_MARGIN_Y * 2.0
        );
        assert!(long_height > short_height);
    }

    #[::core::prelude::v1::test]
    fn narrower_bubbles_wrap_into_taller_rows() {
        let message = Message::user("lorem ipsum ".repeat(40)).unwrap();

        let wide = estimated_row_height(&message, DEFAULT_ROW_WIDTH, 1.0);
        let narrow = estimated_row_height(&message, DEFAULT_ROW_WIDTH, 0.3);

        assert!(narrow > wide);
    }

    #[::core::prelude::v1::test]
    fn height_changes_below_half_pixel_are_ignored() {
        assert!(!pixels_changed(px(40.), px(40.4)));
        assert!(pixels_changed(px(40.), px(41.)));
    }
}
