// Single-line text label
// Left keeps the label's own x offset; Center ignores it and centres
// the text across the full target width on the same row.

use embedded_graphics::prelude::*;
use serde::Deserialize;

use super::widget::{Alignment, Region};
use crate::fonts::Font;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLabel {
    pub text: String,
    pub origin: Point,
    pub align: Align,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            text: text.into(),
            origin: Point::new(x, y),
            align: Align::Left,
        }
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Top-left of the text box for a target `width` pixels wide.
    pub fn position(&self, font: &Font, width: u32) -> Point {
        let size = font.measure(&self.text);
        let x = self.origin.x.clamp(0, u16::MAX as i32) as u16;
        let y = self.origin.y.clamp(0, u16::MAX as i32) as u16;
        let width = width.min(u16::MAX as u32) as u16;

        let h = size.height as u16;

        let (band, alignment) = match self.align {
            Align::Left => (Region::new(x, y, width.saturating_sub(x), h), Alignment::TopLeft),
            Align::Center => (Region::row(y, width, h), Alignment::TopCenter),
        };
        alignment.position(band, size)
    }

    pub fn draw<D>(&self, font: &Font, target: &mut D, color: D::Color) -> Result<(), D::Error>
    where
        D: DrawTarget + OriginDimensions,
    {
        let width = target.size().width;
        let pos = self.position(font, width);
        font.draw_text(target, &self.text, pos, color)
    }
}
