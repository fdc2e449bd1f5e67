// Runtime-rasterised TrueType text
//
// fontdue coverage is thresholded to 1 bit (e-paper has no grey) and
// each glyph is blitted as a Pixel iterator so any DrawTarget can take
// it. Glyph coverage maps are row-major, top row first.

use embedded_graphics_core::{Pixel, draw_target::DrawTarget, geometry::Point};
use fontdue::{Font as FontdueFont, FontSettings};

/// Coverage at or above this counts as ink.
const COVERAGE_THRESHOLD: u8 = 128;

pub struct TrueTypeFont {
    font: FontdueFont,
    px: f32,
    ascent: f32,
    line_height: f32,
}

impl TrueTypeFont {
    pub fn from_bytes(data: &[u8], px: f32) -> Result<Self, &'static str> {
        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let font = FontdueFont::from_bytes(data, settings)?;
        let (ascent, line_height) = font
            .horizontal_line_metrics(px)
            .map_or((px, px), |m| (m.ascent, m.new_line_size));

        Ok(Self {
            font,
            px,
            ascent,
            line_height,
        })
    }

    #[inline]
    pub fn ascent(&self) -> i32 {
        self.ascent.round() as i32
    }

    #[inline]
    pub fn line_height(&self) -> u32 {
        self.line_height.ceil() as u32
    }

    #[inline]
    fn kern(&self, prev: Option<char>, ch: char) -> f32 {
        prev.and_then(|p| self.font.horizontal_kern(p, ch, self.px))
            .unwrap_or(0.0)
    }

    pub fn measure(&self, text: &str) -> u32 {
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            width += self.kern(prev, ch) + self.font.metrics(ch, self.px).advance_width;
            prev = Some(ch);
        }
        width.ceil() as u32
    }

    /// Draws `text` with the ascender line at `top_left.y`; returns the
    /// pen x after the last glyph.
    pub fn draw<D>(
        &self,
        target: &mut D,
        text: &str,
        top_left: Point,
        color: D::Color,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget,
    {
        let baseline = top_left.y + self.ascent();
        let mut pen = top_left.x as f32;
        let mut prev = None;

        for ch in text.chars() {
            pen += self.kern(prev, ch);
            let (m, coverage) = self.font.rasterize(ch, self.px);
            if m.width > 0 && m.height > 0 {
                // ymin is the bitmap's bottom edge relative to the baseline, y up
                let gx = pen.round() as i32 + m.xmin;
                let gy = baseline - m.ymin - m.height as i32;
                blit_coverage(target, &coverage, m.width, gx, gy, color)?;
            }
            pen += m.advance_width;
            prev = Some(ch);
        }
        Ok(pen.round() as i32)
    }
}

fn blit_coverage<D>(
    target: &mut D,
    coverage: &[u8],
    width: usize,
    gx: i32,
    gy: i32,
    color: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let pixels = coverage.chunks(width).enumerate().flat_map(move |(y, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, c)| **c >= COVERAGE_THRESHOLD)
            .map(move |(x, _)| Pixel(Point::new(gx + x as i32, gy + y as i32), color))
    });
    target.draw_iter(pixels)
}
