use crate::message::{Message, Role};

/// Share of the row width a bubble may occupy.
pub const DEFAULT_WIDTH_FRACTION: f32 = 0.75;
pub const MIN_WIDTH_FRACTION: f32 = 0.2;
pub const MAX_WIDTH_FRACTION: f32 = 1.0;

pub const CORNER_RADIUS: f32 = 16.0;
pub const TEXT_PADDING_X: f32 = 12.0;
pub const TEXT_PADDING_Y: f32 = 8.0;
/// Gap between the bubble and the row edge on its aligned side.
pub const ROW_EDGE_INSET: f32 = 16.0;
pub const ROW_MARGIN_Y: f32 = 8.0;
pub const FONT_SIZE: f32 = 16.0;
pub const LINE_HEIGHT: f32 = 20.0;

const ESTIMATED_CHAR_WIDTH: f32 = 8.5;

const _: () = {
    assert!(MIN_WIDTH_FRACTION > 0.0);
    assert!(MIN_WIDTH_FRACTION <= DEFAULT_WIDTH_FRACTION);
    assert!(DEFAULT_WIDTH_FRACTION <= MAX_WIDTH_FRACTION);
};

/// Horizontal side of the row a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleAlignment {
    Leading,
    Trailing,
}

/// Color scheme slot; the view maps these onto theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubblePalette {
    /// Accent fill with light foreground text.
    Accent,
    /// Neutral fill with standard foreground text.
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleStyle {
    pub alignment: BubbleAlignment,
    pub palette: BubblePalette,
}

impl BubbleStyle {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => Self {
                alignment: BubbleAlignment::Trailing,
                palette: BubblePalette::Accent,
            },
            Role::Assistant => Self {
                alignment: BubbleAlignment::Leading,
                palette: BubblePalette::Neutral,
            },
        }
    }
}

/// Resolved visual contract for one message row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleLayout<'a> {
    pub text: &'a str,
    pub style: BubbleStyle,
    /// Upper bound on the bubble width; the bubble shrinks to fit short text.
    pub max_width: f32,
    /// Estimated row height including vertical margins, used for virtualization.
    pub estimated_height: f32,
}

/// Clamps a configured width fraction into the supported range.
pub fn normalize_width_fraction(fraction: f32) -> f32 {
    if !fraction.is_finite() {
        return DEFAULT_WIDTH_FRACTION;
    }
    fraction.clamp(MIN_WIDTH_FRACTION, MAX_WIDTH_FRACTION)
}

pub fn layout_bubble(message: &Message, row_width: f32, width_fraction: f32) -> BubbleLayout<'_> {
    let row_width = if row_width.is_finite() {
        row_width.max(1.0)
    } else {
        1.0
    };
    let max_width = row_width * normalize_width_fraction(width_fraction);
    let text_width = (max_width - TEXT_PADDING_X * 2.0).max(1.0);
    let text_height = estimate_text_height(message.text(), text_width);

    BubbleLayout {
        text: message.text(),
        style: BubbleStyle::for_role(message.role()),
        max_width,
        estimated_height: text_height + TEXT_PADDING_Y * 2.0 + ROW_MARGIN_Y * 2.0,
    }
}

fn estimate_text_height(content: &str, width: f32) -> f32 {
    let chars_per_line = (width / ESTIMATED_CHAR_WIDTH).floor().max(1.0) as usize;

    let mut line_count = 0usize;
    for line in content.lines() {
        let char_count = line.chars().count().max(1);
        line_count += char_count.div_ceil(chars_per_line);
    }

    // `lines()` drops the trailing empty line of newline-terminated text.
    if content.ends_with('\n') {
        line_count += 1;
    }

    LINE_HEIGHT * line_count.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_WIDTH: f32 = 400.0;

    #[test]
    fn user_bubbles_are_trailing_accent() {
        for text in ["Hello", "  spaced  ", "🦀 crab", "a\nb\nc", "x".repeat(5_000).as_str()] {
            let message = Message::user(text).unwrap();
            let layout = layout_bubble(&message, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);

            assert_eq!(layout.style.alignment, BubbleAlignment::Trailing);
            assert_eq!(layout.style.palette, BubblePalette::Accent);
            assert_eq!(layout.text, text);
        }
    }

    #[test]
    fn assistant_bubbles_are_leading_neutral() {
        for text in ["Hi there", "\tindent", "multi\nline"] {
            let message = Message::assistant(text).unwrap();
            let layout = layout_bubble(&message, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);

            assert_eq!(layout.style.alignment, BubbleAlignment::Leading);
            assert_eq!(layout.style.palette, BubblePalette::Neutral);
            assert_eq!(layout.text, text);
        }
    }

    #[test]
    fn width_is_capped_at_fraction_of_row() {
        let message = Message::user("short").unwrap();

        let layout = layout_bubble(&message, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);
        assert_eq!(layout.max_width, 300.0);

        let layout = layout_bubble(&message, ROW_WIDTH, 0.5);
        assert_eq!(layout.max_width, 200.0);
    }

    #[test]
    fn width_fraction_is_normalized() {
        assert_eq!(normalize_width_fraction(0.01), MIN_WIDTH_FRACTION);
        assert_eq!(normalize_width_fraction(3.0), MAX_WIDTH_FRACTION);
        assert_eq!(normalize_width_fraction(f32::NAN), DEFAULT_WIDTH_FRACTION);
        assert_eq!(normalize_width_fraction(0.6), 0.6);
    }

    #[test]
    fn height_grows_with_wrapped_lines() {
        let short = Message::user("one line").unwrap();
        let long = Message::user("word ".repeat(200)).unwrap();

        let short_layout = layout_bubble(&short, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);
        let long_layout = layout_bubble(&long, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);

        let single_line = LINE_HEIGHT + TEXT_PADDING_Y * 2.0 + ROW_MARGIN_Y * 2.0;
        assert_eq!(short_layout.estimated_height, single_line);
        assert!(long_layout.estimated_height > single_line * 10.0);
    }

    #[test]
    fn explicit_newlines_count_as_lines() {
        let message = Message::user("a\nb\nc\n").unwrap();
        let layout = layout_bubble(&message, ROW_WIDTH, DEFAULT_WIDTH_FRACTION);

        let expected = LINE_HEIGHT * 4.0 + TEXT_PADDING_Y * 2.0 + ROW_MARGIN_Y * 2.0;
        assert_eq!(layout.estimated_height, expected);
    }

    #[test]
    fn degenerate_row_width_still_lays_out() {
        let message = Message::user("text").unwrap();
        let layout = layout_bubble(&message, 0.0, DEFAULT_WIDTH_FRACTION);

        assert!(layout.max_width > 0.0);
        assert!(layout.estimated_height > 0.0);
    }
}
