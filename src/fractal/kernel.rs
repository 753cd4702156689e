//! Noyaux escape-time: scalaire et vectoriel (4 ou 8 lanes).
//!
//! Les deux variantes donnent des résultats identiques bit pour bit: le test
//! de divergence précède l'incrément, donc un point qui diverge à l'étape k
//! rapporte k et non k + 1.

use num_complex::Complex32;
use serde::{Deserialize, Serialize};

use crate::fractal::grid::ResultGrid;
use crate::fractal::lanes::{F32s, I32s, Mask};
use crate::fractal::tile::Tile;
use crate::fractal::types::PlaneScale;

/// Variante de noyau utilisée par les workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KernelKind {
    /// Choix à l'exécution selon les capacités du CPU.
    #[default]
    Auto,
    Scalar,
    Lanes4,
    Lanes8,
}

impl KernelKind {
    pub fn from_cli_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(KernelKind::Auto),
            "scalar" | "scalaire" => Some(KernelKind::Scalar),
            "lanes4" | "simd128" | "sse" => Some(KernelKind::Lanes4),
            "lanes8" | "simd256" | "avx" => Some(KernelKind::Lanes8),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Auto => "auto",
            KernelKind::Scalar => "scalaire",
            KernelKind::Lanes4 => "4 lanes",
            KernelKind::Lanes8 => "8 lanes",
        }
    }

    /// Remplace `Auto` par la variante adaptée au CPU courant.
    pub fn resolve(self) -> Self {
        match self {
            KernelKind::Auto => detect(),
            other => other,
        }
    }

    /// Nombre de pixels traités par pas. 1 pour le noyau scalaire.
    pub fn batch_width(self) -> usize {
        match self.resolve() {
            KernelKind::Lanes4 => 4,
            KernelKind::Lanes8 => 8,
            _ => 1,
        }
    }

    /// Calcule une tuile dans la grille.
    pub fn render_tile(self, tile: &Tile, scale: &PlaneScale, cutoff: u32, grid: &ResultGrid) {
        match self.resolve() {
            KernelKind::Lanes4 => render_tile_lanes::<4>(tile, scale, cutoff, grid),
            KernelKind::Lanes8 => render_tile_lanes::<8>(tile, scale, cutoff, grid),
            _ => render_tile_scalar(tile, scale, cutoff, grid),
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect() -> KernelKind {
    if std::arch::is_x86_feature_detected!("avx") {
        KernelKind::Lanes8
    } else if std::arch::is_x86_feature_detected!("sse2") {
        KernelKind::Lanes4
    } else {
        KernelKind::Scalar
    }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> KernelKind {
    // NEON fait partie de la base aarch64.
    KernelKind::Lanes4
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> KernelKind {
    KernelKind::Scalar
}

/// Nombre d'itérations de `z <- z^2 + c` depuis `z = 0` avant `|z|^2 > 4`, borné par `cutoff`.
#[inline]
pub fn escape_time(c: Complex32, cutoff: u32) -> u32 {
    let (x0, y0) = (c.re, c.im);
    let mut x = 0.0f32;
    let mut y = 0.0f32;
    let mut iteration = 0u32;
    while x * x + y * y <= 4.0 && iteration < cutoff {
        let nx = (x * x - y * y) + x0;
        let xy = x * y;
        y = (xy + xy) + y0;
        x = nx;
        iteration += 1;
    }
    iteration
}

pub fn render_tile_scalar(tile: &Tile, scale: &PlaneScale, cutoff: u32, grid: &ResultGrid) {
    log::trace!("Work {tile}");
    for py in tile.rows() {
        for px in tile.columns() {
            grid.write(px, py, escape_time(scale.point(px, py), cutoff));
        }
    }
}

/// Noyau vectoriel: `N` pixels adjacents d'une ligne avancent ensemble.
///
/// Si la largeur de la tuile n'est pas un multiple de `N`, le dernier lot
/// démarre avec les lanes en trop éteintes et seules les valeurs valides
/// sont écrites.
pub fn render_tile_lanes<const N: usize>(tile: &Tile, scale: &PlaneScale, cutoff: u32, grid: &ResultGrid) {
    log::trace!("Work {} ({} lanes)", tile, N);
    let limit = cutoff as i32;
    for py in tile.rows() {
        let y0 = F32s::<N>::splat(scale.y(py));
        let mut px = tile.x0();
        while px < tile.x1() {
            let valid = (tile.x1() - px).min(N);
            let x0 = F32s::<N>::from_fn(|i| if i < valid { scale.x(px + i) } else { 0.0 });
            let counts = escape_time_lanes(x0, y0, Mask::first(valid), limit);
            let counts: [u32; N] = counts.0.map(|c| c as u32);
            grid.write_run(px, py, &counts[..valid]);
            px += N;
        }
    }
}

/// Version lanes de [`escape_time`]. Les lanes éteintes par `active` au départ rendent 0.
#[inline]
pub fn escape_time_lanes<const N: usize>(x0: F32s<N>, y0: F32s<N>, mut active: Mask<N>, cutoff: i32) -> I32s<N> {
    let four = F32s::splat(4.0);
    let zero = I32s::splat(0);
    let mut x = F32s::splat(0.0);
    let mut y = F32s::splat(0.0);
    let mut budget = I32s::splat(cutoff);
    loop {
        let x_sq = x * x;
        let y_sq = y * y;
        active = active & (x_sq + y_sq).le(four);
        active = active & budget.gt(zero);
        if active.none() {
            break;
        }
        let nx = (x_sq - y_sq) + x0;
        let xy = x * y;
        y = (xy + xy) + y0;
        x = nx;
        budget = budget.masked_decrement(active);
    }
    budget.subtract_from(cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::tile::TileLayout;
    use crate::fractal::types::{RenderParams, Viewport};

    fn render_all(params: &RenderParams, kind: KernelKind) -> Vec<u32> {
        let grid = ResultGrid::new(params.width, params.height, params.cutoff);
        let layout = TileLayout::aligned(
            params.width,
            params.height,
            params.tile_width,
            params.tile_height,
            kind.batch_width(),
        );
        let scale = params.scale();
        for tile in layout.tiles() {
            kind.render_tile(&tile, &scale, params.cutoff, &grid);
        }
        grid.into_counts()
    }

    #[test]
    fn test_escape_time_known_points() {
        assert_eq!(escape_time(Complex32::new(0.0, 0.0), 100), 100);
        assert_eq!(escape_time(Complex32::new(-1.0, 0.0), 100), 100);
        // z: 0 -> 2 -> 6
        assert_eq!(escape_time(Complex32::new(2.0, 0.0), 100), 2);
        // z: 0 -> 1 -> 2 -> 5
        assert_eq!(escape_time(Complex32::new(1.0, 0.0), 100), 3);
        assert_eq!(escape_time(Complex32::new(10.0, 10.0), 100), 1);
    }

    #[test]
    fn test_lanes_known_points() {
        let x0 = F32s::<4>([0.0, 2.0, 1.0, 10.0]);
        let y0 = F32s::<4>([0.0, 0.0, 0.0, 10.0]);
        let counts = escape_time_lanes(x0, y0, Mask::splat(true), 100);
        assert_eq!(counts.0, [100, 2, 3, 1]);
    }

    #[test]
    fn test_inactive_lanes_report_zero() {
        let counts = escape_time_lanes(F32s::<4>::splat(0.0), F32s::splat(0.0), Mask::first(2), 7);
        assert_eq!(counts.0, [7, 7, 0, 0]);
    }

    #[test]
    fn test_scalar_and_lanes_agree() {
        let mut params = RenderParams::with_canvas(64, 48);
        params.cutoff = 256;
        params.tile_width = 16;
        params.tile_height = 16;
        let scalar = render_all(&params, KernelKind::Scalar);
        assert_eq!(scalar, render_all(&params, KernelKind::Lanes4));
        assert_eq!(scalar, render_all(&params, KernelKind::Lanes8));
        assert_eq!(scalar, render_all(&params, KernelKind::Auto));
    }

    #[test]
    fn test_partial_batch_covers_every_column() {
        let mut params = RenderParams::with_canvas(10, 6);
        params.viewport = Viewport::new(-2.0, 1.0, -1.0, 1.0);
        params.cutoff = 64;
        params.tile_width = 4;
        params.tile_height = 4;
        let scalar = render_all(&params, KernelKind::Scalar);
        let lanes = render_all(&params, KernelKind::Lanes4);
        assert_eq!(scalar, lanes);
        // Aucune colonne oubliée: chaque pixel a au moins une itération.
        assert!(lanes.iter().all(|&c| c >= 1));
    }

    #[test]
    fn test_partial_batch_inside_wide_tile() {
        // Une seule tuile de largeur 10: deux lots complets et un lot de 2 pour 4 lanes.
        let params = RenderParams {
            width: 10,
            height: 3,
            viewport: Viewport::new(-2.0, 1.0, -1.0, 1.0),
            cutoff: 50,
            tile_width: 10,
            tile_height: 3,
        };
        let grid = ResultGrid::new(10, 3, 50);
        let tile = Tile::new(0, 3, 0, 10);
        render_tile_lanes::<4>(&tile, &params.scale(), params.cutoff, &grid);
        let scale = params.scale();
        for py in 0..3 {
            for px in 0..10 {
                assert_eq!(grid.read(px, py), escape_time(scale.point(px, py), 50));
            }
        }
    }

    #[test]
    fn test_kernel_names() {
        assert_eq!(KernelKind::from_cli_name("AVX"), Some(KernelKind::Lanes8));
        assert_eq!(KernelKind::from_cli_name("scalar"), Some(KernelKind::Scalar));
        assert_eq!(KernelKind::from_cli_name("gpu"), None);
        assert_ne!(KernelKind::Auto.resolve(), KernelKind::Auto);
    }
}
