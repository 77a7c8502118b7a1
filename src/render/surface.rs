use compact_str::CompactString;

use super::colors::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

/// Font request: family name + pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: CompactString,
    pub size_px: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: CompactString::new("Arial"),
            size_px: 16.0,
        }
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// Minimal stateful 2D drawing API the shape renderer paints through.
///
/// Mirrors a canvas context: path construction, a current fill color shared by
/// shapes and text, and text alignment state. The caller owns the surface and
/// decides when it is cleared.
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    /// Rounded corner from the current point towards `(x1, y1)`, turning
    /// towards `(x2, y2)`. A zero radius is a straight line to `(x1, y1)`.
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64);
    fn close_path(&mut self);
    fn set_fill_color(&mut self, color: Rgb);
    /// Fill the current path with the current fill color.
    fn fill(&mut self);
    fn set_line_width(&mut self, width: f64);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_font(&mut self, font: &FontSpec);
    /// Draw `text` with the current fill color, anchored at `(x, y)`
    /// according to the current alignment and baseline.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo { x: f64, y: f64 },
    ArcTo { x1: f64, y1: f64, x2: f64, y2: f64, radius: f64 },
    ClosePath,
    SetFillColor(Rgb),
    Fill,
    SetLineWidth(f64),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    SetFont(FontSpec),
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text of every `fill_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `fill` calls.
    pub fn fill_count(&self) -> usize {
        self.commands.iter().filter(|cmd| **cmd == DrawCommand::Fill).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.commands.push(DrawCommand::ArcTo {
            x1,
            y1,
            x2,
            y2,
            radius,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::SetFillColor(color));
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.commands.push(DrawCommand::SetTextBaseline(baseline));
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.commands.push(DrawCommand::SetFont(font.clone()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}
