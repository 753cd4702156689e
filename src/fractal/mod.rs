pub mod types;
pub mod grid;
pub mod lanes;
pub mod kernel;
pub mod tile;

pub use types::{PlaneScale, RenderParams, Viewport};
pub use grid::ResultGrid;
pub use kernel::{escape_time, KernelKind};
pub use tile::{Tile, TileLayout};
