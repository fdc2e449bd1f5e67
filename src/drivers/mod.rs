// Hardware drivers: chip-level and protocol-level, board-independent.
//
// Everything here is generic over embedded-hal traits; only the Linux
// device paths and pin numbers (in board/) are Raspberry Pi specific.

pub mod eeprom;
pub mod framebuffer;
pub mod preview;
pub mod ssd16xx;
