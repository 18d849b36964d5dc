use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2, pos2, vec2};

use crate::app::ScreenGlossApp;
use crate::compose;
use crate::crop::CropHandle;

pub fn central_panel(app: &mut ScreenGlossApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if !app.has_image() {
            drop_zone(app, ui);
        } else if app.is_cropping() {
            crop_overlay(app, ui);
        } else {
            canvas(app, ui);
        }
    });
}

fn drop_zone(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        ui.heading("Drop a screenshot here");
        ui.label("drag a file anywhere into the window");
        ui.add_space(12.0);
        let fetching = app.file_handler.demo_fetch_in_progress();
        let label = if fetching {
            "Loading demo\u{2026}"
        } else {
            "Try demo image"
        };
        if ui
            .add_enabled(!fetching, egui::Button::new(label))
            .clicked()
        {
            app.file_handler.start_demo_fetch(ui.ctx());
        }
    });
}

fn canvas(app: &mut ScreenGlossApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if ui.button("\u{2702} Crop").clicked() {
            app.enter_crop_mode();
        }
        if ui.button("Reset style").clicked() {
            app.style.reset_controls();
        }
    });
    ui.separator();

    let Some(image) = app.source.clone() else {
        return;
    };
    let viewport = ui.available_size();
    let layers = compose::compose(&app.style, &image, viewport);
    let canvas_rect = app.renderer.paint(
        ui,
        &layers,
        &image,
        app.style.ai_background(),
        &mut app.textures,
    );
    app.last_canvas_rect = Some(canvas_rect);
}

fn crop_overlay(app: &mut ScreenGlossApp, ui: &mut Ui) {
    let Some(image) = app.source.clone() else {
        return;
    };

    ui.horizontal(|ui| {
        if ui.button("Apply Crop").clicked() {
            app.apply_crop();
        }
        if ui.button("Cancel").clicked() {
            app.cancel_crop();
        }
        if let Some(region) = app.crop.as_ref().and_then(|c| c.region()) {
            ui.label(
                egui::RichText::new(format!(
                    "{} \u{d7} {}",
                    region.width.round(),
                    region.height.round()
                ))
                .monospace(),
            );
        }
    });
    ui.separator();

    // The crop session may have just ended via the buttons above.
    let avail = ui.available_rect_before_wrap().shrink(16.0);
    if avail.width() <= 0.0 || avail.height() <= 0.0 {
        return;
    }

    let fit = (avail.width() / image.size().x)
        .min(avail.height() / image.size().y)
        .min(1.0);
    let display_size = image.size() * fit;
    let display_rect = Rect::from_center_size(avail.center(), display_size);

    let texture = app.textures.get_or_upload(&image, ui.ctx());
    let painter = ui.painter().clone();
    painter.image(
        texture,
        display_rect,
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        Color32::WHITE,
    );

    let Some(engine) = app.crop.as_mut() else {
        return;
    };
    let Some(region) = engine.region() else {
        return;
    };

    let scale = vec2(
        display_size.x / image.size().x,
        display_size.y / image.size().y,
    );
    let region_rect = Rect::from_min_size(
        display_rect.min + vec2(region.x * scale.x, region.y * scale.y),
        vec2(region.width * scale.x, region.height * scale.y),
    );

    paint_crop_chrome(&painter, display_rect, region_rect);

    // Gesture handling: the whole preview is one drag surface; the grabbed
    // handle is decided at pointer-down.
    let response = ui.interact(
        display_rect.expand(8.0),
        ui.id().with("crop_overlay"),
        Sense::drag(),
    );
    if response.drag_started() {
        if let Some(pointer) = response.interact_pointer_pos() {
            if let Some(handle) = hit_test_handles(region_rect, pointer) {
                engine.begin_drag(handle, pointer);
            }
        }
    }
    if response.dragged() {
        if let Some(pointer) = response.interact_pointer_pos() {
            engine.update_drag(pointer, display_size);
        }
    }
    if response.drag_stopped() {
        engine.end_drag();
    }
}

const HANDLE_HIT: f32 = 14.0;

/// Which handle a pointer-down grabs, if any. Corners win over edges, edges
/// over the interior move surface.
fn hit_test_handles(region_rect: Rect, pointer: Pos2) -> Option<CropHandle> {
    let corners = [
        (region_rect.left_top(), CropHandle::NorthWest),
        (region_rect.right_top(), CropHandle::NorthEast),
        (region_rect.left_bottom(), CropHandle::SouthWest),
        (region_rect.right_bottom(), CropHandle::SouthEast),
    ];
    for (corner, handle) in corners {
        if corner.distance(pointer) <= HANDLE_HIT {
            return Some(handle);
        }
    }

    let edges = [
        (pos2(region_rect.center().x, region_rect.min.y), CropHandle::North),
        (pos2(region_rect.center().x, region_rect.max.y), CropHandle::South),
        (pos2(region_rect.min.x, region_rect.center().y), CropHandle::West),
        (pos2(region_rect.max.x, region_rect.center().y), CropHandle::East),
    ];
    for (edge, handle) in edges {
        if edge.distance(pointer) <= HANDLE_HIT {
            return Some(handle);
        }
    }

    region_rect.contains(pointer).then_some(CropHandle::Move)
}

fn paint_crop_chrome(painter: &egui::Painter, display_rect: Rect, region_rect: Rect) {
    let dim = Color32::from_black_alpha(153);

    // Dim everything outside the selection: top, bottom, left, right bands.
    let bands = [
        Rect::from_min_max(display_rect.min, pos2(display_rect.max.x, region_rect.min.y)),
        Rect::from_min_max(pos2(display_rect.min.x, region_rect.max.y), display_rect.max),
        Rect::from_min_max(
            pos2(display_rect.min.x, region_rect.min.y),
            pos2(region_rect.min.x, region_rect.max.y),
        ),
        Rect::from_min_max(
            pos2(region_rect.max.x, region_rect.min.y),
            pos2(display_rect.max.x, region_rect.max.y),
        ),
    ];
    for band in bands {
        if band.width() > 0.0 && band.height() > 0.0 {
            painter.rect_filled(band, Rounding::ZERO, dim);
        }
    }

    painter.rect_stroke(region_rect, Rounding::ZERO, Stroke::new(2.0, Color32::WHITE));

    // Rule-of-thirds guides.
    let guide = Stroke::new(1.0, Color32::from_white_alpha(77));
    for i in 1..3 {
        let x = region_rect.min.x + region_rect.width() * i as f32 / 3.0;
        painter.line_segment(
            [pos2(x, region_rect.min.y), pos2(x, region_rect.max.y)],
            guide,
        );
        let y = region_rect.min.y + region_rect.height() * i as f32 / 3.0;
        painter.line_segment(
            [pos2(region_rect.min.x, y), pos2(region_rect.max.x, y)],
            guide,
        );
    }

    // Corner and edge handles.
    let handle = |center: Pos2, size: Vec2| {
        painter.rect_filled(
            Rect::from_center_size(center, size),
            Rounding::same(2.0),
            Color32::WHITE,
        );
    };
    let square = Vec2::splat(12.0);
    handle(region_rect.left_top(), square);
    handle(region_rect.right_top(), square);
    handle(region_rect.left_bottom(), square);
    handle(region_rect.right_bottom(), square);
    handle(pos2(region_rect.center().x, region_rect.min.y), vec2(24.0, 12.0));
    handle(pos2(region_rect.center().x, region_rect.max.y), vec2(24.0, 12.0));
    handle(pos2(region_rect.min.x, region_rect.center().y), vec2(12.0, 24.0));
    handle(pos2(region_rect.max.x, region_rect.center().y), vec2(12.0, 24.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 100.0), vec2(200.0, 150.0))
    }

    #[test]
    fn corners_win_over_move() {
        let rect = region_rect();
        assert_eq!(
            hit_test_handles(rect, rect.left_top()),
            Some(CropHandle::NorthWest)
        );
        assert_eq!(
            hit_test_handles(rect, rect.right_bottom() + vec2(5.0, 5.0)),
            Some(CropHandle::SouthEast)
        );
    }

    #[test]
    fn interior_is_move_and_outside_is_nothing() {
        let rect = region_rect();
        assert_eq!(hit_test_handles(rect, rect.center()), Some(CropHandle::Move));
        assert_eq!(hit_test_handles(rect, pos2(500.0, 500.0)), None);
    }

    #[test]
    fn edge_midpoints_resolve_to_edge_handles() {
        let rect = region_rect();
        assert_eq!(
            hit_test_handles(rect, pos2(rect.center().x, rect.min.y)),
            Some(CropHandle::North)
        );
        assert_eq!(
            hit_test_handles(rect, pos2(rect.max.x, rect.center().y)),
            Some(CropHandle::East)
        );
    }
}
