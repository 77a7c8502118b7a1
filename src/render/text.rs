use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Name every label falls back to when its requested family is not loaded.
pub const DEFAULT_FONT: &str = "default";

pub struct TextRenderer {
    fonts: HashMap<String, Font>,
    layout: Layout,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn add_font(&mut self, name: String, font: Font) {
        self.fonts.insert(name, font);
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn load_font_from_path(&mut self, name: &str, path: &Path) -> Result<()> {
        let font_data = std::fs::read(path)?;
        let font = Font::from_bytes(font_data, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font {}: {}", path.display(), e))?;
        self.fonts.insert(name.to_string(), font);
        tracing::info!("Loaded text font '{}' from {}", name, path.display());
        Ok(())
    }

    pub fn load_system_font(&mut self, name: &str) -> Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
        }

        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));
        candidates.push(PathBuf::from("/Library/Fonts/Arial.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/msttcorefonts/Arial.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));

        for path in candidates {
            if self.load_font_from_path(name, &path).is_ok() {
                return Ok(());
            }
        }

        Err(anyhow!("unable to load a system font from known locations"))
    }

    /// Lay out and rasterize `text` in a single color. Falls back to
    /// [`DEFAULT_FONT`] when `font_name` is unknown; `None` when no font is
    /// available or the text has no visible glyphs.
    pub fn render_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: Option<f32>,
        color: [u8; 4],
    ) -> Option<TextRenderResult> {
        let font = self
            .fonts
            .get(font_name)
            .or_else(|| self.fonts.get(DEFAULT_FONT))?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, bitmap) = font.rasterize_config(glyph.key);

            // Coverage becomes alpha over a solid color
            let mut rgba_bitmap = Vec::with_capacity(bitmap.len() * 4);
            for &coverage in &bitmap {
                rgba_bitmap.extend_from_slice(&[color[0], color[1], color[2], coverage]);
            }

            width = width.max(glyph.x + glyph.width as f32);
            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                bitmap: rgba_bitmap,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width,
            line_height: self.layout.height(),
        })
    }
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    /// Advance-based width of the laid out text
    pub width: f32,
    /// Height of the laid out lines (ascent + descent)
    pub line_height: f32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    pub bitmap: Vec<u8>, // RGBA format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_font_means_no_text() {
        let mut renderer = TextRenderer::new();
        assert!(!renderer.has_font(DEFAULT_FONT));
        assert!(renderer
            .render_text("Pepsi / 70%", "Arial", 16.0, None, [255, 255, 255, 255])
            .is_none());
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let mut renderer = TextRenderer::new();
        let err = renderer
            .load_font_from_path("x", Path::new("/definitely/not/here.ttf"))
            .unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(!renderer.has_font("x"));
    }
}
