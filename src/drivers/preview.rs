// Off-device preview: renders a framebuffer to PNG with the panel's inks.
// Used by the mock panel on machines without an Inky attached.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use super::eeprom::PanelColour;
use super::framebuffer::{Framebuffer, InkyColor};
use crate::error::Result;

const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const RED: Rgb<u8> = Rgb([0xC8, 0x00, 0x00]);
const YELLOW: Rgb<u8> = Rgb([0xE6, 0xC8, 0x00]);

// accent on black-only glass renders black, same as the hardware planes
fn ink(color: InkyColor, panel: PanelColour) -> Rgb<u8> {
    match (color, panel) {
        (InkyColor::White, _) => WHITE,
        (InkyColor::Black, _) => BLACK,
        (InkyColor::Accent, PanelColour::Red) => RED,
        (InkyColor::Accent, PanelColour::Yellow) => YELLOW,
        (InkyColor::Accent, _) => BLACK,
    }
}

pub fn to_rgb(fb: &Framebuffer, panel: PanelColour) -> RgbImage {
    RgbImage::from_fn(fb.width(), fb.height(), |x, y| {
        ink(fb.pixel(x, y).unwrap_or_default(), panel)
    })
}

pub fn save_png(fb: &Framebuffer, panel: PanelColour, path: &Path) -> Result<()> {
    to_rgb(fb, panel).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::GenericImageView;

    #[test]
    fn accent_follows_panel_ink() {
        let mut fb = Framebuffer::new(3, 1);
        fb.set_pixel(1, 0, InkyColor::Black);
        fb.set_pixel(2, 0, InkyColor::Accent);

        let red = to_rgb(&fb, PanelColour::Red);
        assert_eq!(*red.get_pixel(0, 0), WHITE);
        assert_eq!(*red.get_pixel(1, 0), BLACK);
        assert_eq!(*red.get_pixel(2, 0), RED);

        let mono = to_rgb(&fb, PanelColour::Black);
        assert_eq!(*mono.get_pixel(2, 0), BLACK);
    }

    #[test]
    fn writes_png_of_frame_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        save_png(&Framebuffer::new(400, 300), PanelColour::Black, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));
    }
}
