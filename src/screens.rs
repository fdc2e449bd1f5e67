//! Status screens.
//!
//! A [`Screen`] is a fixed list of text lines at absolute positions.
//! Composition always produces a framebuffer of exactly the requested
//! size; lines that fall outside it (the lower hotspot rows on a pHAT)
//! are clipped.

use log::debug;

use crate::display::Panel;
use crate::drivers::framebuffer::{Framebuffer, InkyColor};
use crate::error::Result;
use crate::fonts::Font;
use crate::ui::TextLabel;

pub use crate::ui::Align;

const HEADING_X: i32 = 10;
const ITEM_X: i32 = 20;

// hotspot address assigned by the access-point setup
const SSH_HINT: &str = "2. SSH: ssh pi@192.168.4.1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotspotCredentials {
    pub ssid: String,
    pub password: String,
    pub ip: String,
}

pub type ScreenLine = TextLabel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<ScreenLine>,
}

impl Screen {
    pub fn hotspot(creds: &HotspotCredentials) -> Self {
        let heading = |text: &str, y| ScreenLine::new(text, HEADING_X, y);
        let item = |text: String, y| ScreenLine::new(text, ITEM_X, y);

        Self {
            lines: vec![
                heading("InkyPi Configuration", 10),
                heading("WiFi Hotspot:", 40),
                item(format!("SSID: {}", creds.ssid), 65),
                item(format!("Password: {}", creds.password), 90),
                item(format!("IP: {}", creds.ip), 115),
                heading("Configuration Options:", 155),
                item("1. Connect to WiFi Hotspot".into(), 180),
                item(SSH_HINT.into(), 205),
                item("3. Edit /boot/eink/wifi.yml".into(), 230),
                heading("Instructions:", 270),
                item("1. Connect to WiFi hotspot".into(), 295),
                item("2. SSH in or edit wifi.yml".into(), 320),
                item("3. Reboot to apply changes".into(), 345),
            ],
        }
    }

    pub fn status() -> Self {
        Self {
            lines: vec![
                ScreenLine::new("InkyPi Application", HEADING_X, 10),
                ScreenLine::new("Running successfully!", HEADING_X, 40),
            ],
        }
    }

    pub fn with_align(self, align: Align) -> Self {
        Self {
            lines: self
                .lines
                .into_iter()
                .map(|line| line.with_align(align))
                .collect(),
        }
    }

    /// White background, black text, exactly `width` x `height`.
    pub fn compose(&self, font: &Font, width: u32, height: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(width, height);
        for line in &self.lines {
            // Framebuffer drawing is infallible
            let Ok(()) = line.draw(font, &mut fb, InkyColor::Black);
        }
        fb
    }
}

/// Stages `image` on `panel` and refreshes it.
pub fn present<P: Panel>(panel: &mut P, image: &Framebuffer) -> Result<()> {
    debug!("presenting {}x{} frame", image.width(), image.height());
    panel.set_image(image)?;
    panel.show()
}
