// Region geometry and alignment helpers
// Coordinates are logical (rotation aware), origin top-left.

use embedded_graphics::prelude::*;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Full-width band of height `h` starting at row `y`.
    pub const fn row(y: u16, width: u16, h: u16) -> Self {
        Self::new(0, y, width, h)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Alignment {
    #[default]
    TopLeft,
    TopCenter,
}

impl Alignment {
    // content wider than the region goes negative; the framebuffer clips
    pub fn position(self, region: Region, content_size: Size) -> Point {
        let cw = content_size.width as i32;
        let rx = region.x as i32;
        let ry = region.y as i32;
        let rw = region.w as i32;

        match self {
            Alignment::TopLeft => Point::new(rx, ry),
            Alignment::TopCenter => Point::new(rx + (rw - cw) / 2, ry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_inside_region() {
        let r = Region::new(10, 20, 100, 40);
        let s = Size::new(20, 10);

        assert_eq!(Alignment::TopLeft.position(r, s), Point::new(10, 20));
        assert_eq!(Alignment::TopCenter.position(r, s), Point::new(50, 20));
    }

    #[test]
    fn oversize_content_centres_negative() {
        let r = Region::row(0, 100, 13);
        let p = Alignment::TopCenter.position(r, Size::new(120, 13));
        assert_eq!(p, Point::new(-10, 0));
    }

    #[test]
    fn row_spans_width_from_left_edge() {
        assert_eq!(Region::row(40, 250, 13), Region::new(0, 40, 250, 13));
    }
}
