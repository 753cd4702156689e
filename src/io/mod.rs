pub mod png;
pub mod ppm;

use std::path::Path;

use crate::error::OutputError;
use crate::fractal::ResultGrid;

/// Écrit la grille colorisée; le format suit l'extension (`.png`, sinon PPM).
pub fn save_image(grid: &ResultGrid, output: &Path) -> Result<(), OutputError> {
    let is_png = output
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        png::save_png(grid, output)
    } else {
        ppm::save_ppm(grid, output)
    }
}
