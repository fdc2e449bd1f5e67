// Text fonts for status screens.
// A TrueType face from disk when one is available, otherwise the
// built-in bold mono bitmap font. Loading never fails: a missing or
// broken font file only costs a warning.

pub mod truetype;

use std::path::Path;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_7X13_BOLD},
    prelude::*,
    text::{Baseline, Text},
};
use log::{debug, warn};

use crate::error::{Error, Result};
use truetype::TrueTypeFont;

pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";
pub const DEFAULT_FONT_SIZE: u32 = 16;

pub const FALLBACK_FONT: &MonoFont<'static> = &FONT_7X13_BOLD;

pub enum Font {
    TrueType(TrueTypeFont),
    Builtin(&'static MonoFont<'static>),
}

impl Font {
    /// Loads `path` at `size_px`, falling back to the built-in font.
    pub fn load(path: &Path, size_px: u32) -> Self {
        match Self::try_load(path, size_px) {
            Ok(font) => {
                debug!("font: {} @ {}px", path.display(), size_px);
                font
            }
            Err(e) => {
                warn!("font {}: {}; using built-in font", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn try_load(path: &Path, size_px: u32) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        let font = TrueTypeFont::from_bytes(&data, size_px as f32).map_err(Error::Font)?;
        Ok(Font::TrueType(font))
    }

    pub const fn builtin() -> Self {
        Font::Builtin(FALLBACK_FONT)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Font::Builtin(_))
    }

    pub fn line_height(&self) -> u32 {
        match self {
            Font::TrueType(f) => f.line_height(),
            Font::Builtin(f) => f.character_size.height,
        }
    }

    pub fn measure(&self, text: &str) -> Size {
        match self {
            Font::TrueType(f) => Size::new(f.measure(text), f.line_height()),
            Font::Builtin(f) => {
                let char_width = f.character_size.width + f.character_spacing;
                Size::new(text.chars().count() as u32 * char_width, f.character_size.height)
            }
        }
    }

    /// Draws `text` with the top of the line box at `top_left.y`.
    pub fn draw_text<D>(
        &self,
        target: &mut D,
        text: &str,
        top_left: Point,
        color: D::Color,
    ) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget,
    {
        match self {
            Font::TrueType(f) => {
                f.draw(target, text, top_left, color)?;
            }
            Font::Builtin(f) => {
                let style = MonoTextStyle::new(f, color);
                Text::with_baseline(text, top_left, style, Baseline::Top).draw(target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::drivers::framebuffer::{Framebuffer, InkyColor};

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let font = Font::load(Path::new("/nonexistent/DejaVuSans-Bold.ttf"), 16);
        assert!(font.is_fallback());
        assert_eq!(font.line_height(), 13);
    }

    #[test]
    fn garbage_font_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a truetype file").unwrap();

        assert!(matches!(Font::try_load(&path, 16), Err(Error::Font(_))));
        assert!(Font::load(&path, 16).is_fallback());
    }

    #[test]
    fn builtin_draws_inside_line_box() {
        let font = Font::builtin();
        let mut fb = Framebuffer::new(200, 40);
        font.draw_text(&mut fb, "InkyPi", Point::new(10, 10), InkyColor::Black)
            .unwrap();

        let size = font.measure("InkyPi");
        assert_eq!(size, Size::new(6 * 7, 13));
        assert!(fb.count(InkyColor::Black) > 0);
        for y in 0..40 {
            for x in 0..200 {
                if fb.pixel(x, y) == Some(InkyColor::Black) {
                    assert!((10..10 + size.width).contains(&x));
                    assert!((10..10 + size.height).contains(&y));
                }
            }
        }
    }

    #[test]
    fn system_truetype_font_renders_when_present() {
        let path = Path::new(DEFAULT_FONT_PATH);
        if !path.exists() {
            return;
        }
        let font = Font::load(path, DEFAULT_FONT_SIZE);
        assert!(!font.is_fallback());

        let mut fb = Framebuffer::new(250, 40);
        font.draw_text(&mut fb, "WiFi Hotspot:", Point::new(10, 10), InkyColor::Black)
            .unwrap();
        assert!(fb.count(InkyColor::Black) > 0);
        assert!(font.measure("WiFi Hotspot:").width > font.measure("WiFi").width);
    }
}
