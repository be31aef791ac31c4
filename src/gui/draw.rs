use eframe::egui::{CornerRadius, Painter, Pos2, Rect, Vec2, pos2, vec2};
use eframe::epaint::{Color32, FontId};

const OUTLINE_THICKNESS: f32 = 2.0;
const OUTLINE_OFFSETS: [Vec2; 8] = [
    vec2(-1.0, 0.0),
    vec2(1.0, 0.0),
    vec2(0.0, -1.0),
    vec2(0.0, 1.0),
    vec2(-1.0, -1.0),
    vec2(-1.0, 1.0),
    vec2(1.0, -1.0),
    vec2(1.0, 1.0),
];
const CARET_GAP: f32 = 4.0;
const CARET_WIDTH: f32 = 2.0;
const BADGE_PADDING: Vec2 = vec2(12.0, 4.0);

/// Draws `text` with a black outline, top-left at `pos`. Returns the text rect.
pub(crate) fn draw_text_with_shadow(
    painter: &Painter,
    pos: Pos2,
    text: &str,
    font: FontId,
    text_color: Color32,
    wrap_width: f32,
) -> Rect {
    let outline_color = Color32::BLACK;
    let galley = painter.layout(text.to_owned(), font.clone(), text_color, wrap_width);
    let shadow_galley = painter.layout(text.to_owned(), font, outline_color, wrap_width);

    for offset in OUTLINE_OFFSETS {
        painter.galley(
            pos + offset * OUTLINE_THICKNESS,
            shadow_galley.clone(),
            outline_color,
        );
    }

    let rect = Rect::from_min_size(pos, galley.size());
    painter.galley(pos, galley, text_color);
    rect
}

/// Single-line typed text followed by the caret bar.
///
/// The caret keeps its place (and the line its height) even when the text is
/// still empty, so the layout does not jump while the task is pending.
pub(crate) fn draw_typed_line(
    painter: &Painter,
    pos: Pos2,
    text: &str,
    font: FontId,
    text_color: Color32,
    caret_opacity: f32,
) -> Rect {
    let height = font.size;
    let galley = painter.layout_no_wrap(text.to_owned(), font, text_color);
    let width = galley.size().x;
    painter.galley(pos, galley, text_color);

    if caret_opacity > 0.0 {
        let caret = Rect::from_min_size(
            pos2(pos.x + width + CARET_GAP, pos.y),
            vec2(CARET_WIDTH, height),
        );
        painter.rect_filled(
            caret,
            CornerRadius::ZERO,
            text_color.gamma_multiply(caret_opacity.min(1.0)),
        );
    }

    Rect::from_min_size(pos, vec2(width + CARET_GAP + CARET_WIDTH, height))
}

/// Pill-shaped label, e.g. the availability badge.
pub(crate) fn draw_badge(painter: &Painter, pos: Pos2, text: &str, font: FontId, color: Color32) -> Rect {
    let galley = painter.layout_no_wrap(text.to_owned(), font, color);
    let rect = Rect::from_min_size(pos, galley.size() + BADGE_PADDING * 2.0);
    painter.rect_filled(rect, CornerRadius::same(255), color.gamma_multiply(0.15));
    painter.galley(pos + BADGE_PADDING, galley, color);
    rect
}
