//! Rendus de référence sans le pool: séquentiel, et une tâche rayon par tuile.
//!
//! Ils partagent les noyaux et le découpage du moteur et servent de points de
//! comparaison (tests différentiels, benchmarks).

use rayon::prelude::*;

use crate::error::EngineError;
use crate::fractal::grid::ResultGrid;
use crate::fractal::kernel::KernelKind;
use crate::fractal::tile::{Tile, TileLayout};
use crate::fractal::types::RenderParams;

/// Tout le canevas comme une seule tuile, sur le thread appelant.
pub fn render_sequential(params: &RenderParams, kernel: KernelKind) -> Result<ResultGrid, EngineError> {
    params.validate()?;
    let grid = ResultGrid::new(params.width, params.height, params.cutoff);
    let tile = Tile::new(0, params.height, 0, params.width);
    kernel.render_tile(&tile, &params.scale(), params.cutoff, &grid);
    Ok(grid)
}

/// Mêmes tuiles que le moteur, réparties par rayon.
pub fn render_rayon(params: &RenderParams, kernel: KernelKind) -> Result<ResultGrid, EngineError> {
    params.validate()?;
    let kernel = kernel.resolve();
    let layout = TileLayout::aligned(
        params.width,
        params.height,
        params.tile_width,
        params.tile_height,
        kernel.batch_width(),
    );
    let grid = ResultGrid::new(params.width, params.height, params.cutoff);
    let scale = params.scale();
    let tiles: Vec<Tile> = layout.tiles().collect();
    tiles
        .par_iter()
        .for_each(|tile| kernel.render_tile(tile, &scale, params.cutoff, &grid));
    Ok(grid)
}
