use eframe::egui;

/// Width reserved on the right side of the hex view for the scrollbar
pub const SCROLLBAR_WIDTH: f32 = 16.0;

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
/// Draw a custom scrollbar that moves in whole rows.
/// Returns the new top row if the user clicked or dragged the bar.
pub fn draw_custom_scrollbar(
    ui: &egui::Ui,
    rect: egui::Rect,
    top_row: usize,
    total_rows: usize,
    visible_rows: usize,
    id: egui::Id,
) -> Option<usize> {
    if total_rows <= visible_rows {
        return None;
    }

    // Setup layout & margins
    let margin = 4.0;
    let bottom_margin = 12.0; // extra space from the bottom
    let scroll_area_rect = egui::Rect::from_min_max(
        egui::pos2(rect.right() - 14.0, rect.top() + margin),
        egui::pos2(rect.right() - 2.0, rect.bottom() - bottom_margin),
    );

    // Shrink when idle, expand on hover
    let is_hovered = ui.rect_contains_pointer(scroll_area_rect);
    let expansion = ui.ctx().animate_bool(id.with("anim"), is_hovered);
    let bar_width = egui::lerp(4.0..=10.0, expansion);
    let scrollbar_rect = scroll_area_rect.with_min_x(scroll_area_rect.right() - bar_width);

    // Handle size follows the share of visible rows, but never gets too small
    let max_top_row = total_rows.saturating_sub(visible_rows);
    let handle_height = ((visible_rows as f32 / total_rows as f32) * scrollbar_rect.height()).max(20.0);

    let travel_range = scrollbar_rect.height() - handle_height;
    let progress = top_row.min(max_top_row) as f32 / max_top_row as f32;
    let handle_y_offset = progress * travel_range;

    // Track scrollbar interactions
    let response = ui.interact(
        scrollbar_rect,
        id.with("bar"),
        egui::Sense::click_and_drag(),
    );
    let mut new_row = None;
    if (response.clicked() || response.dragged())
        && let Some(pointer_pos) = ui.input(|i| i.pointer.hover_pos())
    {
        // Center the handle on the pointer
        let click_y = pointer_pos.y - scrollbar_rect.top() - handle_height / 2.0;
        let t = if travel_range > 0.0 {
            (click_y / travel_range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        new_row = Some((t * max_top_row as f32).round() as usize);
    }

    // Paint the track
    let track_color = ui.visuals().extreme_bg_color;
    ui.painter()
        .rect_filled(scrollbar_rect, 2.0, track_color.gamma_multiply(expansion));

    // Paint the handle
    let handle_rect = egui::Rect::from_min_size(
        egui::pos2(
            scrollbar_rect.left(),
            scrollbar_rect.top() + handle_y_offset,
        ),
        egui::vec2(bar_width, handle_height),
    );
    let handle_color = if response.dragged() {
        ui.visuals().widgets.active.bg_fill
    } else if is_hovered {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };

    ui.painter().rect_filled(handle_rect, 2.0, handle_color);

    new_row
}
