//! Paints a [`RenderLayers`] stack with the egui painter.
//!
//! This is deliberately dumb: all decisions about what to draw were made by
//! the compositing engine; the renderer only translates layer descriptions
//! into egui shapes. Gradients become clipped strip meshes, blur becomes
//! feathered rect shapes, and the 3D tilt becomes a projected quad.
//! Corner rounding is dropped for shapes drawn under an active tilt.

use egui::epaint::{EllipseShape, Mesh, RectShape, Vertex, WHITE_UV};
use egui::{Color32, Painter, Pos2, Rect, Rounding, Shape, Stroke, Ui, Vec2, pos2, vec2};

use crate::compose::frame::{
    Backdrop, ChromeShadow, FrameDecoration, FrameFill, TRAFFIC_CLOSE, TRAFFIC_MAXIMIZE,
    TRAFFIC_MINIMIZE, TrafficLightStyle, WindowControls,
};
use crate::compose::gradients::{Gradient, sample};
use crate::compose::patterns::PatternPaint;
use crate::compose::{BackgroundLayer, ContentLayer, RenderLayers, Transform3d};
use crate::image::SourceImage;
use crate::texture_cache::TextureCache;

const GRADIENT_STRIPS: usize = 64;
const NOISE_CELL: f32 = 6.0;

/// Paints the canvas. Stateless; per-frame texture reuse lives in the
/// [`TextureCache`].
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    /// Paint `layers` into the available space of `ui` and return the
    /// on-screen canvas rectangle (the region an export capture crops to).
    pub fn paint(
        &self,
        ui: &mut Ui,
        layers: &RenderLayers,
        screenshot: &SourceImage,
        ai_background: Option<&SourceImage>,
        textures: &mut TextureCache,
    ) -> Rect {
        let avail = ui.available_rect_before_wrap();
        let layout = compute_layout(layers, avail);
        let painter = ui.painter().clone();

        self.paint_background(&painter, layers, &layout, ai_background, textures);
        self.paint_pattern(&painter, layers, &layout);
        self.paint_noise(&painter, layers, &layout);
        self.paint_content(&painter, &layers.content, &layout, screenshot, textures);

        layout.canvas_rect
    }

    fn paint_background(
        &self,
        painter: &Painter,
        layers: &RenderLayers,
        layout: &Layout,
        ai_background: Option<&SourceImage>,
        textures: &mut TextureCache,
    ) {
        let rect = layout.canvas_rect;
        let rounding = Rounding::same(layers.canvas.radius * layout.scale);
        match &layers.background {
            BackgroundLayer::Solid(color) => {
                painter.rect_filled(rect, rounding, *color);
            }
            BackgroundLayer::Gradient(gradient) => {
                paint_linear_gradient(painter, rect, gradient);
            }
            BackgroundLayer::Cover { image, image_size } => {
                let bitmap = ai_background.filter(|b| b.id() == *image);
                match bitmap {
                    Some(bitmap) => {
                        let uv = cover_uv(*image_size, rect.size());
                        let texture = textures.get_or_upload(bitmap, painter.ctx());
                        let mut shape = RectShape::new(rect, rounding, Color32::WHITE, Stroke::NONE);
                        shape.fill_texture_id = texture;
                        shape.uv = uv;
                        painter.add(shape);
                    }
                    None => {
                        painter.rect_filled(rect, rounding, crate::compose::FALLBACK_BACKGROUND);
                    }
                }
            }
        }
    }

    fn paint_pattern(&self, painter: &Painter, layers: &RenderLayers, layout: &Layout) {
        let Some(pattern) = &layers.pattern else {
            return;
        };
        let Some(tile) = pattern.kind.tile() else {
            return;
        };
        let rect = layout.canvas_rect;
        let clipped = painter.with_clip_rect(rect);
        let tint =
            |opacity: f32| Color32::from_rgba_unmultiplied(255, 255, 255, (opacity * 255.0) as u8);

        let mut y = rect.min.y;
        while y < rect.max.y {
            let mut x = rect.min.x;
            while x < rect.max.x {
                let origin = pos2(x, y);
                match tile.paint {
                    PatternPaint::Wave {
                        stroke_width,
                        opacity,
                    } => {
                        // One wavelength per tile, sampled as a polyline.
                        let mid = origin.y + tile.size.y / 2.0;
                        let points: Vec<Pos2> = (0..=16)
                            .map(|i| {
                                let t = i as f32 / 16.0;
                                let phase = t * std::f32::consts::TAU;
                                pos2(
                                    origin.x + t * tile.size.x,
                                    mid - phase.sin() * tile.size.y * 0.45,
                                )
                            })
                            .collect();
                        clipped.add(Shape::line(points, Stroke::new(stroke_width, tint(opacity))));
                    }
                    PatternPaint::Dot { radius, opacity } => {
                        clipped.circle_filled(origin + tile.size / 2.0, radius, tint(opacity));
                    }
                    PatternPaint::GridLines {
                        stroke_width,
                        opacity,
                    } => {
                        let stroke = Stroke::new(stroke_width, tint(opacity));
                        clipped.line_segment(
                            [
                                pos2(origin.x + tile.size.x, origin.y),
                                pos2(origin.x + tile.size.x, origin.y + tile.size.y),
                            ],
                            stroke,
                        );
                        clipped.line_segment(
                            [
                                pos2(origin.x, origin.y + tile.size.y),
                                pos2(origin.x + tile.size.x, origin.y + tile.size.y),
                            ],
                            stroke,
                        );
                    }
                    PatternPaint::DiagonalLine {
                        stroke_width,
                        opacity,
                    } => {
                        clipped.line_segment(
                            [
                                pos2(origin.x, origin.y + tile.size.y),
                                pos2(origin.x + tile.size.x, origin.y),
                            ],
                            Stroke::new(stroke_width, tint(opacity)),
                        );
                    }
                }
                x += tile.size.x;
            }
            y += tile.size.y;
        }
    }

    fn paint_noise(&self, painter: &Painter, layers: &RenderLayers, layout: &Layout) {
        let Some(noise) = &layers.noise else { return };
        let rect = layout.canvas_rect;
        let clipped = painter.with_clip_rect(rect);
        let alpha = (noise.opacity * 255.0) as u8;

        // Deterministic speckle: one dot per cell, position and tone from an
        // integer hash of the cell coordinates.
        let cols = (rect.width() / NOISE_CELL).ceil() as u32;
        let rows = (rect.height() / NOISE_CELL).ceil() as u32;
        for cy in 0..rows {
            for cx in 0..cols {
                let h = cell_hash(cx, cy);
                let jitter =
                    vec2((h & 0xff) as f32 / 255.0, ((h >> 8) & 0xff) as f32 / 255.0) * NOISE_CELL;
                let tone = ((h >> 16) & 0xff) as u8;
                let center = rect.min + vec2(cx as f32, cy as f32) * NOISE_CELL + jitter;
                let color = Color32::from_rgba_unmultiplied(tone, tone, tone, alpha);
                clipped.circle_filled(center, 0.7, color);
            }
        }
    }

    fn paint_content(
        &self,
        painter: &Painter,
        content: &ContentLayer,
        layout: &Layout,
        screenshot: &SourceImage,
        textures: &mut TextureCache,
    ) {
        let proj = Proj::new(layout.frame_rect.center(), content.transform);
        let s = layout.scale;
        let outer_rect = layout.frame_rect;
        let outer_radius = content
            .frame
            .as_ref()
            .map(|f| f.outer_radius * s)
            .unwrap_or(content.image_radius * s);

        // User shadow wraps the whole (possibly framed) content.
        if let Some(shadow) = &content.shadow {
            for spec in [&shadow.secondary, &shadow.primary] {
                let rect = outer_rect.translate(spec.offset * s);
                let rect = proj.map_rect_bounds(rect);
                let mut shape = RectShape::filled(rect, Rounding::same(outer_radius), spec.color);
                shape.blur_width = spec.blur * s;
                painter.add(shape);
            }
        }

        if let Some(frame) = &content.frame {
            self.paint_frame(painter, frame, layout, &proj);
        }

        // The screenshot itself.
        let texture = textures.get_or_upload(screenshot, painter.ctx());
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        if proj.active {
            let corners = proj.corners(layout.image_rect);
            let mut mesh = Mesh::with_texture(texture);
            let uvs = [
                uv.left_top(),
                uv.right_top(),
                uv.right_bottom(),
                uv.left_bottom(),
            ];
            for (pos, uv) in corners.iter().zip(uvs) {
                mesh.vertices.push(Vertex {
                    pos: *pos,
                    uv,
                    color: Color32::WHITE,
                });
            }
            mesh.add_triangle(0, 1, 2);
            mesh.add_triangle(0, 2, 3);
            painter.add(Shape::mesh(mesh));
        } else {
            let mut shape = RectShape::new(
                layout.image_rect,
                Rounding::same(content.image_radius * s),
                Color32::WHITE,
                Stroke::NONE,
            );
            shape.fill_texture_id = texture;
            shape.uv = uv;
            painter.add(shape);
        }

        // Frame border goes over the image edge.
        if let Some(frame) = &content.frame {
            if let Some(border) = &frame.border {
                let rect = layout.frame_body_rect;
                let stroke = Stroke::new(border.width * s, border.color);
                if border.dashed {
                    let corners = proj.corners(rect);
                    let mut outline: Vec<Pos2> = corners.to_vec();
                    outline.push(corners[0]);
                    painter.extend(Shape::dashed_line(&outline, stroke, 6.0, 4.0));
                } else if proj.active {
                    painter.add(Shape::closed_line(proj.corners(rect).to_vec(), stroke));
                } else {
                    painter.rect_stroke(rect, Rounding::same(outer_radius), stroke);
                }
            }
        }

        // Inset ring, outermost.
        if let Some(inset) = &content.inset {
            let t = inset.thickness * s;
            let rect = outer_rect.expand(t / 2.0);
            let stroke = Stroke::new(t, inset.color);
            if proj.active {
                painter.add(Shape::closed_line(proj.corners(rect).to_vec(), stroke));
            } else {
                painter.rect_stroke(rect, Rounding::same(outer_radius + t / 2.0), stroke);
            }
        }
    }

    fn paint_frame(&self, painter: &Painter, frame: &FrameDecoration, layout: &Layout, proj: &Proj) {
        let s = layout.scale;
        let body = layout.frame_body_rect;
        let radius = frame.outer_radius * s;

        if let Some(backdrop) = &frame.backdrop {
            match backdrop {
                Backdrop::StackedCards { back, mid } => {
                    let back_rect = body
                        .shrink2(vec2(12.0 * s, 0.0))
                        .translate(vec2(0.0, -12.0 * s));
                    let mid_rect = body
                        .shrink2(vec2(6.0 * s, 0.0))
                        .translate(vec2(0.0, -6.0 * s));
                    fill_rect(
                        painter,
                        proj.map_rect_bounds(back_rect),
                        radius,
                        FrameFill::Solid(*back),
                    );
                    fill_rect(
                        painter,
                        proj.map_rect_bounds(mid_rect),
                        radius,
                        FrameFill::Solid(*mid),
                    );
                }
                Backdrop::EclipseShadow { color } => {
                    painter.add(EllipseShape {
                        center: proj.map(pos2(body.center().x, body.max.y + 8.0 * s)),
                        radius: vec2((body.width() / 2.0 - 24.0 * s).max(4.0), 10.0 * s),
                        fill: *color,
                        stroke: Stroke::NONE,
                    });
                }
                Backdrop::BlurSheet { color } => {
                    let rect = body
                        .shrink2(vec2(16.0 * s, 0.0))
                        .translate(vec2(0.0, 12.0 * s));
                    let mut shape = RectShape::filled(
                        proj.map_rect_bounds(rect),
                        Rounding::same(12.0 * s),
                        *color,
                    );
                    shape.blur_width = 24.0 * s;
                    painter.add(shape);
                }
            }
        }

        // The frame's own chrome shadow under the card.
        if let Some(chrome) = &frame.shadow {
            let specs: &[(f32, f32, f32)] = match chrome {
                // (offset_y, blur, alpha)
                ChromeShadow::Layered => &[
                    (1.0, 2.0, 0.07),
                    (2.0, 4.0, 0.07),
                    (4.0, 8.0, 0.07),
                    (8.0, 16.0, 0.07),
                ],
                ChromeShadow::Subtle => &[(2.0, 8.0, 0.08), (4.0, 16.0, 0.06)],
            };
            for (offset_y, blur, alpha) in specs {
                let rect = body.translate(vec2(0.0, offset_y * s));
                let mut shape = RectShape::filled(
                    proj.map_rect_bounds(rect),
                    Rounding::same(radius),
                    Color32::from_black_alpha((alpha * 255.0) as u8),
                );
                shape.blur_width = blur * s;
                painter.add(shape);
            }
        }

        if let Some(mat) = &frame.mat {
            fill_rect(
                painter,
                proj.map_rect_bounds(layout.frame_rect),
                mat.radius * s,
                mat.fill,
            );
        }

        fill_rect(painter, proj.map_rect_bounds(body), radius, frame.body);

        if let Some(bar) = &frame.title_bar {
            let bar_rect =
                Rect::from_min_max(body.min, pos2(body.max.x, body.min.y + bar.height * s));
            let bar_rounding = Rounding {
                nw: radius,
                ne: radius,
                sw: 0.0,
                se: 0.0,
            };
            match bar.fill {
                FrameFill::Solid(color) => {
                    painter.rect_filled(proj.map_rect_bounds(bar_rect), bar_rounding, color);
                }
                FrameFill::Gradient(top, bottom) => {
                    paint_vertical_gradient(painter, proj.map_rect_bounds(bar_rect), top, bottom);
                }
            }
            if let Some(separator) = bar.separator {
                painter.line_segment(
                    [
                        proj.map(pos2(bar_rect.min.x, bar_rect.max.y)),
                        proj.map(pos2(bar_rect.max.x, bar_rect.max.y)),
                    ],
                    Stroke::new(1.0, separator),
                );
            }
            self.paint_controls(painter, &bar.controls, bar_rect, s, proj);
        }
    }

    fn paint_controls(
        &self,
        painter: &Painter,
        controls: &WindowControls,
        bar_rect: Rect,
        s: f32,
        proj: &Proj,
    ) {
        match controls {
            WindowControls::TrafficLights(style) => {
                let radius = 6.0 * s;
                let gap = 8.0 * s;
                let mut center = pos2(bar_rect.min.x + 16.0 * s + radius, bar_rect.center().y);
                let colors: [Option<Color32>; 3] = match style {
                    TrafficLightStyle::Classic => [
                        Some(TRAFFIC_CLOSE),
                        Some(TRAFFIC_MINIMIZE),
                        Some(TRAFFIC_MAXIMIZE),
                    ],
                    TrafficLightStyle::Rose => [Some(Color32::from_rgb(0xfb, 0x71, 0x85)); 3],
                    TrafficLightStyle::Muted => [Some(Color32::from_rgb(0xd4, 0xd4, 0xd8)); 3],
                    TrafficLightStyle::Adaptive => [None; 3],
                };
                for color in colors {
                    match color {
                        Some(fill) => painter.circle_filled(proj.map(center), radius, fill),
                        // Outline-only style.
                        None => painter.circle_stroke(
                            proj.map(center),
                            radius,
                            Stroke::new(1.5 * s, Color32::from_rgb(0xa1, 0xa1, 0xaa)),
                        ),
                    };
                    center.x += radius * 2.0 + gap;
                }
            }
            WindowControls::Windows { dark } => {
                let glyph_color = if *dark {
                    Color32::from_rgb(0xa1, 0xa1, 0xaa)
                } else {
                    Color32::from_rgb(0x71, 0x71, 0x7a)
                };
                let stroke = Stroke::new(1.5 * s, glyph_color);
                let slot = 48.0 * s;
                let half = 4.0 * s;
                let y = bar_rect.center().y;
                // Minimize, maximize, close, right-aligned.
                let centers = [
                    pos2(bar_rect.max.x - slot * 2.5, y),
                    pos2(bar_rect.max.x - slot * 1.5, y),
                    pos2(bar_rect.max.x - slot * 0.5, y),
                ];
                painter.line_segment(
                    [
                        proj.map(centers[0] - vec2(half, 0.0)),
                        proj.map(centers[0] + vec2(half, 0.0)),
                    ],
                    stroke,
                );
                let square = Rect::from_center_size(centers[1], vec2(half * 2.0, half * 2.0));
                painter.rect_stroke(proj.map_rect_bounds(square), Rounding::same(1.0), stroke);
                painter.line_segment(
                    [
                        proj.map(centers[2] - vec2(half, half)),
                        proj.map(centers[2] + vec2(half, half)),
                    ],
                    stroke,
                );
                painter.line_segment(
                    [
                        proj.map(centers[2] + vec2(-half, half)),
                        proj.map(centers[2] + vec2(half, -half)),
                    ],
                    stroke,
                );
            }
        }
    }
}

/// Display-space geometry derived from the layer stack.
struct Layout {
    canvas_rect: Rect,
    /// Outer bounds of the content block including mat and title bar.
    frame_rect: Rect,
    /// The frame card: title bar plus screenshot (excludes the mat).
    frame_body_rect: Rect,
    image_rect: Rect,
    /// Uniform display scale applied to style pixel values.
    scale: f32,
}

/// Extra space the chrome needs around the screenshot: (left, top, right,
/// bottom), style px.
fn chrome_extents(frame: Option<&FrameDecoration>) -> (f32, f32, f32, f32) {
    let Some(frame) = frame else {
        return (0.0, 0.0, 0.0, 0.0);
    };
    let mat = frame.mat.map(|m| m.padding).unwrap_or(0.0);
    let bar = frame.title_bar.map(|b| b.height).unwrap_or(0.0);
    (mat, mat + bar, mat, mat)
}

fn compute_layout(layers: &RenderLayers, avail: Rect) -> Layout {
    let padding = layers.canvas.padding;
    let (cl, ct, cr, cb) = chrome_extents(layers.content.frame.as_ref());
    let image_size = layers.content.image_size;

    match layers.canvas.size {
        Some(canvas_size) => {
            let scale = layers.canvas.fit_scale;
            let canvas_rect = Rect::from_center_size(avail.center(), canvas_size * scale);

            // Fit the content block into the padded interior, capping the
            // screenshot at 80% of the canvas height.
            let inner = (canvas_size - Vec2::splat(2.0 * padding)).max(Vec2::splat(1.0));
            let chrome = vec2(cl + cr, ct + cb);
            let max_image = (inner - chrome).max(Vec2::splat(1.0));
            let max_image = vec2(max_image.x, max_image.y.min(canvas_size.y * 0.8));
            let fit = (max_image.x / image_size.x)
                .min(max_image.y / image_size.y)
                .min(1.0);
            let image_display = image_size * fit * scale;

            layout_from_image(canvas_rect, image_display, (cl, ct, cr, cb), scale)
        }
        None => {
            // Auto: natural content size, capped by the viewport.
            let chrome = vec2(cl + cr, ct + cb);
            let max_image =
                (avail.size() - Vec2::splat(2.0 * padding) - chrome).max(Vec2::splat(1.0));
            let fit = (max_image.x / image_size.x)
                .min(max_image.y / image_size.y)
                .min(1.0);
            let image_display = image_size * fit;
            let canvas_size = image_display + chrome + Vec2::splat(2.0 * padding);
            let canvas_rect = Rect::from_center_size(avail.center(), canvas_size);
            layout_from_image(canvas_rect, image_display, (cl, ct, cr, cb), 1.0)
        }
    }
}

fn layout_from_image(
    canvas_rect: Rect,
    image_display: Vec2,
    chrome: (f32, f32, f32, f32),
    scale: f32,
) -> Layout {
    let (cl, ct, cr, cb) = chrome;
    let block = image_display + vec2((cl + cr) * scale, (ct + cb) * scale);
    let frame_rect = Rect::from_center_size(canvas_rect.center(), block);
    // The mat is symmetric when present; left extent carries it.
    let mat = cl.min(cb) * scale;
    let frame_body_rect = Rect::from_min_max(
        frame_rect.min + Vec2::splat(mat),
        frame_rect.max - Vec2::splat(mat),
    );
    let image_rect = Rect::from_min_size(
        frame_rect.min + vec2(cl * scale, ct * scale),
        image_display,
    );
    Layout {
        canvas_rect,
        frame_rect,
        frame_body_rect,
        image_rect,
        scale,
    }
}

/// Perspective projection helper around the content center. When the
/// transform is identity every map is a no-op and callers keep their
/// rounded rect paths.
struct Proj {
    center: Pos2,
    transform: Transform3d,
    active: bool,
}

impl Proj {
    fn new(center: Pos2, transform: Transform3d) -> Self {
        Self {
            center,
            active: !transform.is_identity(),
            transform,
        }
    }

    fn map(&self, p: Pos2) -> Pos2 {
        if !self.active {
            return p;
        }
        let mapped = self.transform.project(p - self.center);
        self.center + mapped
    }

    fn corners(&self, rect: Rect) -> [Pos2; 4] {
        [
            self.map(rect.left_top()),
            self.map(rect.right_top()),
            self.map(rect.right_bottom()),
            self.map(rect.left_bottom()),
        ]
    }

    /// Bounding box of the projected rect; used where egui needs an
    /// axis-aligned shape (blurred fills).
    fn map_rect_bounds(&self, rect: Rect) -> Rect {
        if !self.active {
            return rect;
        }
        let mut bounds = Rect::NOTHING;
        for corner in self.corners(rect) {
            bounds.extend_with(corner);
        }
        bounds
    }
}

fn fill_rect(painter: &Painter, rect: Rect, radius: f32, fill: FrameFill) {
    match fill {
        FrameFill::Solid(color) => {
            painter.rect_filled(rect, Rounding::same(radius), color);
        }
        // Two-tone chrome surfaces read fine as a vertical blend.
        FrameFill::Gradient(a, b) => paint_vertical_gradient(painter, rect, a, b),
    }
}

fn paint_vertical_gradient(painter: &Painter, rect: Rect, top: Color32, bottom: Color32) {
    let mut mesh = Mesh::default();
    for (pos, color) in [
        (rect.left_top(), top),
        (rect.right_top(), top),
        (rect.right_bottom(), bottom),
        (rect.left_bottom(), bottom),
    ] {
        mesh.vertices.push(Vertex {
            pos,
            uv: WHITE_UV,
            color,
        });
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}

/// Strip-mesh approximation of a CSS linear gradient, clipped to `rect`.
fn paint_linear_gradient(painter: &Painter, rect: Rect, gradient: &Gradient) {
    let angle = gradient.angle_deg.to_radians();
    // CSS angles: 0 points up, clockwise positive.
    let dir = vec2(angle.sin(), -angle.cos());
    let perp = vec2(-dir.y, dir.x);
    let center = rect.center();
    let half_span = 0.5 * (rect.width() * dir.x.abs() + rect.height() * dir.y.abs());
    let half_perp = rect.size().length() / 2.0;

    let clipped = painter.with_clip_rect(rect);
    let mut mesh = Mesh::default();
    for i in 0..=GRADIENT_STRIPS {
        let t = i as f32 / GRADIENT_STRIPS as f32;
        let color = sample(gradient, t);
        let base = center + dir * (2.0 * half_span * t - half_span);
        let a_index = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            pos: base - perp * half_perp,
            uv: WHITE_UV,
            color,
        });
        mesh.vertices.push(Vertex {
            pos: base + perp * half_perp,
            uv: WHITE_UV,
            color,
        });
        if i > 0 {
            mesh.add_triangle(a_index - 2, a_index - 1, a_index);
            mesh.add_triangle(a_index - 1, a_index + 1, a_index);
        }
    }
    clipped.add(Shape::mesh(mesh));
}

fn cell_hash(x: u32, y: u32) -> u32 {
    let mut h = x
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(y.wrapping_mul(0x85EB_CA6B));
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}

/// UV rect that crops a bitmap to cover a target while preserving aspect,
/// centered (CSS `background-size: cover`).
fn cover_uv(image_size: Vec2, target_size: Vec2) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 || target_size.x <= 0.0 || target_size.y <= 0.0 {
        return Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    }
    let image_aspect = image_size.x / image_size.y;
    let target_aspect = target_size.x / target_size.y;
    if image_aspect > target_aspect {
        // Wider than the target: crop the sides.
        let visible = target_aspect / image_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(margin, 0.0), pos2(1.0 - margin, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(0.0, margin), pos2(1.0, 1.0 - margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::frame::TITLE_BAR_HEIGHT;

    #[test]
    fn cover_uv_crops_the_long_axis() {
        // Wide image into a square target: sides cropped equally.
        let uv = cover_uv(vec2(200.0, 100.0), vec2(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-5);
        assert!((uv.max.x - 0.75).abs() < 1e-5);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);

        // Tall image into a square target: top/bottom cropped.
        let uv = cover_uv(vec2(100.0, 200.0), vec2(100.0, 100.0));
        assert!((uv.min.y - 0.25).abs() < 1e-5);
        assert_eq!(uv.min.x, 0.0);
    }

    #[test]
    fn cell_hash_is_deterministic_and_spread() {
        assert_eq!(cell_hash(3, 7), cell_hash(3, 7));
        assert_ne!(cell_hash(3, 7), cell_hash(7, 3));
    }

    #[test]
    fn identity_projection_maps_points_through() {
        let t = Transform3d {
            perspective: 1000.0,
            rotate_z_deg: 0.0,
            tilt_x_deg: 0.0,
            tilt_y_deg: 0.0,
        };
        let proj = Proj::new(pos2(100.0, 100.0), t);
        assert!(!proj.active);
        assert_eq!(proj.map(pos2(42.0, 17.0)), pos2(42.0, 17.0));
    }

    #[test]
    fn auto_layout_wraps_content_in_padding() {
        let style = crate::state::style::StyleState::default();
        let image = crate::image::SourceImage::from_rgba(100, 50, vec![0; 100 * 50 * 4], "t");
        let layers = crate::compose::compose(&style, &image, vec2(800.0, 600.0));
        let avail = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));

        let layout = compute_layout(&layers, avail);
        // 100x50 content plus 64px padding all around.
        assert_eq!(layout.canvas_rect.width(), 100.0 + 2.0 * 64.0);
        assert_eq!(layout.canvas_rect.height(), 50.0 + 2.0 * 64.0);
        assert_eq!(layout.image_rect.size(), vec2(100.0, 50.0));
    }

    #[test]
    fn framed_layout_reserves_title_bar_space() {
        let mut style = crate::state::style::StyleState::default();
        style.set_frame(crate::compose::frame::FrameVariant::MacosLight);
        let image = crate::image::SourceImage::from_rgba(100, 50, vec![0; 100 * 50 * 4], "t");
        let layers = crate::compose::compose(&style, &image, vec2(800.0, 600.0));
        let avail = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));

        let layout = compute_layout(&layers, avail);
        assert_eq!(
            layout.frame_rect.height(),
            layout.image_rect.height() + TITLE_BAR_HEIGHT
        );
        assert_eq!(
            layout.image_rect.min.y,
            layout.frame_rect.min.y + TITLE_BAR_HEIGHT
        );
    }
}
