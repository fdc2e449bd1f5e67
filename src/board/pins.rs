//! Inky HAT wiring on the Raspberry Pi 40-pin header (BCM numbering)
//!
//!  BCM | Header |    Function     |      Notes
//! -----+--------+-----------------+----------------------------------
//!   2  |   3    | I2C1 SDA        | ID EEPROM at 0x50
//!   3  |   5    | I2C1 SCL        |
//!   8  |  24    | EPD CS          | SPI0 CE0, driven as plain GPIO
//!  10  |  19    | SPI0 MOSI       | Display is write-only
//!  11  |  23    | SPI0 SCLK       |
//!  17  |  11    | EPD BUSY        | High while the controller is busy
//!  22  |  15    | EPD DC          | Data/Command select
//!  27  |  13    | EPD RST         | Reset (active low)

pub const EPD_CS: u32 = 8;
pub const EPD_DC: u32 = 22;
pub const EPD_RST: u32 = 27;
pub const EPD_BUSY: u32 = 17;

pub const SPI_DEVICE: &str = "/dev/spidev0.0";
pub const GPIO_CHIP: &str = "/dev/gpiochip0";
pub const I2C_DEVICE: &str = "/dev/i2c-1";
