use screen_recorder_core::{DragRect, RegionDrag, ScreenPoint, SelectionOutcome};

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Key, Pos2, Rect, Stroke, StrokeKind, ViewportId,
    WindowLevel,
};

pub(crate) const HINT: &str = "Click and drag to select area. Press ESC to cancel.";

/// Full-screen, see-through viewport for dragging out a capture region.
///
/// Exists only while a selection is in progress; once [`RegionOverlay::show`]
/// returns an outcome the owner drops it, which closes the viewport before
/// any capture can start.
pub(crate) struct RegionOverlay {
    viewport_id: ViewportId,
    drag: RegionDrag,
}

impl RegionOverlay {
    pub(crate) fn new() -> Self {
        Self {
            viewport_id: ViewportId::from_hash_of("region_overlay"),
            drag: RegionDrag::new(),
        }
    }

    /// Draw one frame of the overlay. Returns the outcome once the user
    /// releases the pointer or presses escape.
    pub(crate) fn show(&mut self, ctx: &egui::Context) -> Option<SelectionOutcome> {
        let viewport_id = self.viewport_id;
        let builder = egui::ViewportBuilder::default()
            .with_title("Select Screen Area")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_window_level(WindowLevel::AlwaysOnTop);

        ctx.show_viewport_immediate(viewport_id, builder, |ctx, _class| self.update(ctx))
    }

    fn update(&mut self, ctx: &egui::Context) -> Option<SelectionOutcome> {
        ctx.set_cursor_icon(CursorIcon::Crosshair);

        let (cancelled, pressed, released, pointer) = ctx.input(|i| {
            (
                i.key_pressed(Key::Escape) || i.viewport().close_requested(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        if cancelled {
            return Some(self.drag.cancel());
        }

        let pixels_per_point = ctx.pixels_per_point();
        let mut outcome = None;

        if let Some(pos) = pointer {
            let point = to_physical(pos, pixels_per_point);
            if pressed {
                self.drag.press(point);
            }
            if released {
                outcome = self.drag.release(point);
            } else if self.drag.is_active() {
                self.drag.drag(point);
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::from_black_alpha(77)))
            .show(ctx, |ui| {
                let painter = ui.painter();
                let screen = ui.max_rect();

                painter.text(
                    screen.center_top() + egui::vec2(0.0, 40.0),
                    Align2::CENTER_TOP,
                    HINT,
                    FontId::proportional(20.0),
                    Color32::WHITE,
                );

                if let Some(rect) = self.drag.rectangle() {
                    painter.rect_stroke(
                        to_logical(rect, pixels_per_point),
                        0.0,
                        Stroke::new(2.0, Color32::RED),
                        StrokeKind::Inside,
                    );
                }
            });

        outcome
    }
}

/// Pointer position in logical points to a physical screen pixel.
pub(crate) fn to_physical(pos: Pos2, pixels_per_point: f32) -> ScreenPoint {
    ScreenPoint::new(
        (pos.x * pixels_per_point).round().max(0.0) as u32,
        (pos.y * pixels_per_point).round().max(0.0) as u32,
    )
}

/// Drag rectangle in physical pixels back to logical points for painting.
pub(crate) fn to_logical(rect: DragRect, pixels_per_point: f32) -> Rect {
    let point = |p: ScreenPoint| {
        Pos2::new(
            p.x as f32 / pixels_per_point,
            p.y as f32 / pixels_per_point,
        )
    };
    Rect::from_min_max(point(rect.min), point(rect.max))
}
