use vello::peniko::Color;

/// Channel intensity cap for the percentage color ramp.
pub const MAX_INTENSITY: f64 = 255.0;
/// Channel intensity at 0%.
pub const MIN_INTENSITY: f64 = 100.0;

/// RGB color with channels in 0..=255 units. Channels are kept unrounded so
/// fractional percentages map to fractional intensities, as a canvas would.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([unit(self.r), unit(self.g), unit(self.b), 1.0])
    }

    /// Clamped 8-bit RGBA, for glyph bitmaps.
    pub fn to_rgba8(self) -> [u8; 4] {
        let byte = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b), 255]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

fn unit(channel: f64) -> f32 {
    (channel / 255.0).clamp(0.0, 1.0) as f32
}

/// Fill color for a signed percentage: blue ramp for gains, red ramp for losses.
///
/// Only the upper end is clamped; the ramp starts at [`MIN_INTENSITY`] and
/// grows twice as fast for gains as for losses.
pub fn percentage_color(percentage: f64) -> Rgb {
    if percentage >= 0.0 {
        let intensity = MAX_INTENSITY.min(MIN_INTENSITY + percentage * 2.0);
        Rgb::new(0.0, 0.0, intensity)
    } else {
        let intensity = MAX_INTENSITY.min(MIN_INTENSITY - percentage);
        Rgb::new(intensity, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gains_are_blue() {
        assert_eq!(percentage_color(0.0), Rgb::new(0.0, 0.0, 100.0));
        assert_eq!(percentage_color(70.0), Rgb::new(0.0, 0.0, 240.0));
        assert_eq!(percentage_color(95.0), Rgb::new(0.0, 0.0, 255.0));
    }

    #[test]
    fn losses_are_red() {
        assert_eq!(percentage_color(-2.0), Rgb::new(102.0, 0.0, 0.0));
        assert_eq!(percentage_color(-70.0), Rgb::new(170.0, 0.0, 0.0));
        assert_eq!(percentage_color(-500.0), Rgb::new(255.0, 0.0, 0.0));
    }

    #[test]
    fn css_style_display() {
        assert_eq!(percentage_color(70.0).to_string(), "rgb(0, 0, 240)");
        assert_eq!(percentage_color(2.25).to_string(), "rgb(0, 0, 104.5)");
    }

    #[test]
    fn rgba8_rounds_and_clamps() {
        assert_eq!(Rgb::new(104.5, -3.0, 300.0).to_rgba8(), [105, 0, 255, 255]);
        assert_eq!(Rgb::WHITE.to_rgba8(), [255, 255, 255, 255]);
    }
}
