// Text placement for e-paper screens.
// Region-based layout; labels draw through the loaded font.

mod label;
mod widget;

pub use label::{Align, TextLabel};
pub use widget::{Alignment, Region};
