pub mod palette;
pub mod renderer;

pub use palette::{CellAppearance, Rgb, appearance};
pub use renderer::{HeaderInfo, Renderer};
