use std::f64::consts::PI;
use std::sync::Arc;

use vello::kurbo::{self, Affine, BezPath, Point, Rect};
use vello::peniko::{Blob, Color, Fill, Image, ImageFormat};
use vello::Scene;

use super::colors::Rgb;
use super::shape::{render_shape, ShapeStyle};
use super::surface::{DrawingSurface, FontSpec, TextAlign, TextBaseline};
use super::text::{TextRenderResult, TextRenderer};
use crate::layout::Placement;

/// Flattening tolerance for corner arcs (px).
const ARC_TOLERANCE: f64 = 0.1;

/// [`DrawingSurface`] backed by a vello [`Scene`], with fontdue text.
pub struct SceneSurface<'a> {
    scene: &'a mut Scene,
    text: &'a mut TextRenderer,
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
    fill_color: Rgb,
    line_width: f64,
    align: TextAlign,
    baseline: TextBaseline,
    font: FontSpec,
}

impl<'a> SceneSurface<'a> {
    pub fn new(scene: &'a mut Scene, text: &'a mut TextRenderer) -> Self {
        Self {
            scene,
            text,
            path: BezPath::new(),
            current: None,
            subpath_start: None,
            fill_color: Rgb::BLACK,
            line_width: 1.0,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            font: FontSpec::default(),
        }
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Path built since the last `begin_path`.
    pub fn path(&self) -> &BezPath {
        &self.path
    }
}

impl DrawingSurface for SceneSurface<'_> {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        let p1 = Point::new(x1, y1);
        let Some(p0) = self.current else {
            self.move_to(x1, y1);
            return;
        };
        self.current = Some(append_arc_to(&mut self.path, p0, p1, Point::new(x2, y2), radius));
    }

    fn close_path(&mut self) {
        self.path.close_path();
        self.current = self.subpath_start;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn fill(&mut self) {
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            self.fill_color.to_peniko(),
            None,
            &self.path,
        );
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font = font.clone();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let Some(rendered) = self.text.render_text(
            text,
            &self.font.family,
            self.font.size_px,
            None,
            self.fill_color.to_rgba8(),
        ) else {
            return;
        };
        let (ox, oy) = text_origin(
            x,
            y,
            rendered.width as f64,
            rendered.line_height as f64,
            self.align,
            self.baseline,
        );
        draw_text_to_scene(self.scene, rendered, ox, oy);
    }
}

/// Canvas `arcTo`: straight line towards the tangent point on `p0 -> p1`,
/// then a circular arc of `radius` to the tangent point on `p1 -> p2`.
/// Degenerates to a line to `p1` for a zero radius or collinear points.
/// Returns the new current point.
pub fn append_arc_to(path: &mut BezPath, p0: Point, p1: Point, p2: Point, radius: f64) -> Point {
    let to_p0 = p0 - p1;
    let to_p2 = p2 - p1;
    if radius <= 0.0 || to_p0.hypot() == 0.0 || to_p2.hypot() == 0.0 {
        path.line_to(p1);
        return p1;
    }

    let v1 = to_p0.normalize();
    let v2 = to_p2.normalize();
    let cos = v1.dot(v2).clamp(-1.0, 1.0);
    let angle = cos.acos();
    let half = angle / 2.0;
    if half.sin().abs() < 1e-9 || (PI - angle).abs() < 1e-9 {
        path.line_to(p1);
        return p1;
    }

    let tangent_dist = radius / half.tan();
    let t1 = p1 + v1 * tangent_dist;
    let t2 = p1 + v2 * tangent_dist;
    let center = p1 + (v1 + v2).normalize() * (radius / half.sin());

    let start_angle = (t1 - center).atan2();
    let mut sweep = (t2 - center).atan2() - start_angle;
    while sweep > PI {
        sweep -= 2.0 * PI;
    }
    while sweep <= -PI {
        sweep += 2.0 * PI;
    }

    path.line_to(t1);
    let arc = kurbo::Arc {
        center,
        radii: kurbo::Vec2::new(radius, radius),
        start_angle,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    for el in arc.append_iter(ARC_TOLERANCE) {
        path.push(el);
    }
    t2
}

/// Top-left corner of a text box anchored at `(x, y)`.
fn text_origin(x: f64, y: f64, width: f64, height: f64, align: TextAlign, baseline: TextBaseline) -> (f64, f64) {
    let ox = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    };
    let oy = match baseline {
        TextBaseline::Top => y,
        TextBaseline::Middle => y - height / 2.0,
        TextBaseline::Bottom => y - height,
    };
    (ox, oy)
}

/// Draw rendered text to a Vello scene.
fn draw_text_to_scene(scene: &mut Scene, text_result: TextRenderResult, x: f64, y: f64) {
    for glyph in text_result.glyphs {
        if glyph.bitmap.is_empty() {
            continue;
        }

        let glyph_image = Image::new(
            Blob::new(Arc::new(glyph.bitmap)),
            ImageFormat::Rgba8,
            glyph.width as u32,
            glyph.height as u32,
        );

        let transform = Affine::translate(((x + glyph.x as f64).round(), (y + glyph.y as f64).round()));
        scene.draw_image(&glyph_image, transform);
    }
}

/// Build a Vello scene from the current placements + hover overlay.
pub fn build_scene(
    scene: &mut Scene,
    placements: &[Placement],
    style: &ShapeStyle,
    hover: Option<&Placement>,
    text_renderer: &mut TextRenderer,
) {
    scene.reset();

    {
        let mut surface = SceneSurface::new(scene, text_renderer);
        for placement in placements {
            render_shape(&mut surface, placement, style);
        }
    }

    if let Some(placement) = hover {
        let lw = style.line_width;
        let highlight = Rect::new(
            placement.x + lw,
            placement.y + lw,
            placement.x + placement.w,
            placement.y + placement.h,
        );
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            Color::new([1.0, 1.0, 1.0, 0.18]),
            None,
            &highlight,
        );
    }
}
