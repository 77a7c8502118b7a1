use super::colors::{percentage_color, Rgb};
use super::surface::{DrawingSurface, FontSpec, TextAlign, TextBaseline};
use crate::layout::Placement;

/// Per-shape drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Inset applied on the top/left of every shape; neighbours end up
    /// separated by a gap of this width.
    pub line_width: f64,
    /// Corner radius (0 = plain rectangle)
    pub corner_radius: f64,
    pub font: FontSpec,
    pub label_color: Rgb,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            line_width: 4.0,
            corner_radius: 0.0,
            font: FontSpec::default(),
            label_color: Rgb::WHITE,
        }
    }
}

/// `"{name} / {percentage}%"`, with the percentage in shortest form (`70`, `-2.5`).
/// Negative zero prints as `0`.
pub fn label(placement: &Placement) -> String {
    format!("{} / {}%", placement.name, placement.percentage + 0.0)
}

/// Paint one placement: inset filled shape colored by its percentage, then a
/// centered label.
pub fn render_shape<S: DrawingSurface + ?Sized>(surface: &mut S, placement: &Placement, style: &ShapeStyle) {
    let lw = style.line_width;
    let r = style.corner_radius;
    let x = placement.x + lw;
    let y = placement.y + lw;
    let w = placement.w - lw;
    let h = placement.h - lw;

    surface.begin_path();
    surface.set_fill_color(percentage_color(placement.percentage));
    surface.set_line_width(lw);
    surface.move_to(x + r, y);
    surface.arc_to(x + w, y, x + w, y + h, r);
    surface.arc_to(x + w, y + h, x, y + h, r);
    surface.arc_to(x, y + h, x, y, r);
    surface.arc_to(x, y, x + w, y, r);
    surface.close_path();
    surface.fill();

    surface.set_fill_color(style.label_color);
    surface.set_text_align(TextAlign::Center);
    surface.set_text_baseline(TextBaseline::Middle);
    surface.set_font(&style.font);
    surface.fill_text(&label(placement), x + w / 2.0, y + h / 2.0);
}

/// Paint every placement in order.
pub fn render_placements<S: DrawingSurface + ?Sized>(surface: &mut S, placements: &[Placement], style: &ShapeStyle) {
    for placement in placements {
        render_shape(surface, placement, style);
    }
}
