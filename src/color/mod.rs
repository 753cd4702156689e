pub mod palette;

pub use palette::{color_for_count, PALETTE};
