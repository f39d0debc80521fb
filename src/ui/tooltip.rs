use egui::{Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};

/// Painter-drawn tooltip box anchored next to a point, flipped to stay
/// inside `bounds`.
pub fn draw_tooltip(painter: &Painter, bounds: Rect, anchor: Pos2, accent: Color32, lines: &[String]) {
    if lines.is_empty() {
        return;
    }

    let font = FontId::proportional(11.0);
    let text_color = painter.ctx().style().visuals.text_color();
    let galley = painter.layout_no_wrap(lines.join("\n"), font, text_color);
    let size = galley.rect.size();

    let mut pos = Pos2::new(anchor.x + 12.0, anchor.y - size.y - 10.0);
    if pos.x + size.x + 8.0 > bounds.right() {
        pos.x = anchor.x - size.x - 12.0;
    }
    if pos.y < bounds.top() {
        pos.y = anchor.y + 12.0;
    }

    let bg_rect = Rect::from_min_size(pos - Vec2::new(4.0, 2.0), size + Vec2::new(8.0, 4.0));
    let bg_color = painter.ctx().style().visuals.window_fill;
    painter.rect_filled(bg_rect, 3.0, bg_color.gamma_multiply(0.95));
    painter.rect_stroke(bg_rect, 3.0, Stroke::new(0.5, accent), StrokeKind::Outside);
    painter.galley(pos, galley, text_color);
}

/// Filled dot with a white ring marking the hovered point.
pub fn highlight_point(painter: &Painter, pos: Pos2, color: Color32) {
    painter.circle_filled(pos, 5.0, color);
    painter.circle_stroke(pos, 5.0, Stroke::new(1.0, Color32::WHITE));
}
