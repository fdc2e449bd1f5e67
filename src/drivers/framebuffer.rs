// Whole-frame bitmap in logical (rotation-free) coordinates.
// Widgets draw here through DrawTarget, clipped to the frame; the panel
// then packs it into 1bpp controller planes, applying the panel rotation.

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::PixelColor,
    primitives::Rectangle,
};

use super::ssd16xx::Rotation;

/// Palette index, matching the Inky "P" image: white, black, then the
/// panel's accent ink (red or yellow).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InkyColor {
    #[default]
    White,
    Black,
    Accent,
}

impl PixelColor for InkyColor {
    type Raw = ();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<InkyColor>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![InkyColor::White; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<InkyColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn fill(&mut self, color: InkyColor) {
        self.pixels.fill(color);
    }

    pub fn count(&self, color: InkyColor) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    // physical (col,row) -> logical (x,y), rotating counter-clockwise
    #[inline]
    fn to_logical(&self, rotation: Rotation, pc: i64, pr: i64) -> (i64, i64) {
        let h = self.height as i64;
        match rotation {
            Rotation::Deg0 => (pc, pr),
            Rotation::Deg270 => (pr, h - 1 - pc),
        }
    }

    /// Packs into a controller plane of `cols x rows`, MSB first,
    /// `cols / 8` bytes per row. A bit is set where `set` holds.
    /// Physical columns with no logical pixel behind them pack as white.
    pub fn pack_plane<F>(&self, rotation: Rotation, cols: u16, rows: u16, set: F) -> Vec<u8>
    where
        F: Fn(InkyColor) -> bool,
    {
        let row_bytes = (cols / 8) as usize;
        let mut plane = vec![0u8; row_bytes * rows as usize];
        let pad = set(InkyColor::White);

        for pr in 0..rows as usize {
            let row = &mut plane[pr * row_bytes..(pr + 1) * row_bytes];
            for pc in 0..row_bytes * 8 {
                let (lx, ly) = self.to_logical(rotation, pc as i64, pr as i64);
                let on = if lx < 0 || ly < 0 {
                    pad
                } else {
                    self.pixel(lx as u32, ly as u32).map_or(pad, &set)
                };
                if on {
                    row[pc / 8] |= 1 << (7 - (pc % 8));
                }
            }
        }
        plane
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = InkyColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set_pixel(coord.x as u32, coord.y as u32, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }

        let x0 = area.top_left.x as usize;
        let x1 = x0 + area.size.width as usize;
        let y0 = area.top_left.y as u32;
        let w = self.width as usize;

        for y in y0..y0 + area.size.height {
            let row = y as usize * w;
            self.pixels[row + x0..row + x1].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
