//! Raspberry Pi board support for the Inky HAT
//!
//! Opens the Linux device nodes named in [`HardwareConfig`] and bundles
//! them so the panel code only sees embedded-hal traits. The kernel's
//! own chip-select is disabled; CS is a GPIO line driven by
//! [`ExclusiveDevice`], which needs `dtoverlay=spi0-0cs` (or an
//! equivalent) so CE0 is free to claim.

pub mod pins;

#[cfg(target_os = "linux")]
pub use self::linux::*;

#[cfg(target_os = "linux")]
mod linux {
    use embedded_hal_bus::spi::ExclusiveDevice;
    use linux_embedded_hal::{
        CdevPin, Delay, I2cdev, SpidevBus,
        gpio_cdev::{Chip, LineRequestFlags},
        spidev::{SpiModeFlags, Spidev, SpidevOptions},
    };
    use log::{debug, warn};

    use crate::config::HardwareConfig;
    use crate::display::{self, Border, DisplayInfo, Inky, Selection};
    use crate::error::{Error, Result};

    const CONSUMER: &str = "inkypi";

    // Type Aliases
    pub type SpiDevice = ExclusiveDevice<SpidevBus, CdevPin, Delay>;
    pub type Epd = Inky<SpiDevice, CdevPin, CdevPin, CdevPin, Delay>;

    /// Opened board hardware, ready for detection and the panel driver.
    pub struct BoardHw {
        pub spi: SpiDevice,
        pub dc: CdevPin,
        pub rst: CdevPin,
        pub busy: CdevPin,
        /// `None` when the I2C bus could not be opened; detection then
        /// relies on the manual selection.
        pub i2c: Option<I2cdev>,
    }

    pub struct Board;

    impl Board {
        pub fn open(hw: &HardwareConfig) -> Result<BoardHw> {
            let mut chip = Chip::new(&hw.gpio_chip).map_err(|source| Error::Gpio {
                line: hw.cs_pin,
                source,
            })?;

            // CS idles high, RST idles high (not in reset)
            let cs = output(&mut chip, hw.cs_pin, 1)?;
            let dc = output(&mut chip, hw.dc_pin, 0)?;
            let rst = output(&mut chip, hw.reset_pin, 1)?;
            let busy = input(&mut chip, hw.busy_pin)?;

            let mut spidev = Spidev::open(&hw.spi_device)
                .map_err(|e| Error::io(format!("opening {}", hw.spi_device.display()), e))?;
            let options = SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(hw.spi_hz)
                .mode(SpiModeFlags::SPI_MODE_0 | SpiModeFlags::SPI_NO_CS)
                .build();
            spidev
                .configure(&options)
                .map_err(|e| Error::io(format!("configuring {}", hw.spi_device.display()), e))?;
            let spi = ExclusiveDevice::new(SpidevBus(spidev), cs, Delay).map_err(Error::pin)?;

            let i2c = match I2cdev::new(&hw.i2c_device) {
                Ok(i2c) => Some(i2c),
                Err(e) => {
                    warn!("I2C {}: {}", hw.i2c_device.display(), e);
                    None
                }
            };

            debug!(
                "board: {} @ {} Hz, {} (cs {} dc {} rst {} busy {})",
                hw.spi_device.display(),
                hw.spi_hz,
                hw.gpio_chip.display(),
                hw.cs_pin,
                hw.dc_pin,
                hw.reset_pin,
                hw.busy_pin
            );

            Ok(BoardHw {
                spi,
                dc,
                rst,
                busy,
                i2c,
            })
        }
    }

    impl BoardHw {
        /// Identifies the attached panel from its EEPROM, falling back to
        /// `fallback` when the EEPROM (or the whole bus) is unavailable.
        pub fn detect(&mut self, fallback: Option<Selection>) -> Result<DisplayInfo> {
            match self.i2c.as_mut() {
                Some(i2c) => display::detect(i2c, fallback),
                None => display::resolve(Err(Error::NotDetected), fallback),
            }
        }

        pub fn into_panel(self, info: DisplayInfo, border: Border) -> Epd {
            let mut panel = Inky::new(self.spi, self.dc, self.rst, self.busy, Delay, info);
            panel.set_border(border);
            panel
        }
    }

    fn output(chip: &mut Chip, line: u32, initial: u8) -> Result<CdevPin> {
        let handle = chip
            .get_line(line)
            .and_then(|l| l.request(LineRequestFlags::OUTPUT, initial, CONSUMER))
            .map_err(|source| Error::Gpio { line, source })?;
        CdevPin::new(handle).map_err(|source| Error::Gpio { line, source })
    }

    fn input(chip: &mut Chip, line: u32) -> Result<CdevPin> {
        let handle = chip
            .get_line(line)
            .and_then(|l| l.request(LineRequestFlags::INPUT, 0, CONSUMER))
            .map_err(|source| Error::Gpio { line, source })?;
        CdevPin::new(handle).map_err(|source| Error::Gpio { line, source })
    }
}
