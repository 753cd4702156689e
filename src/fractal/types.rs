use num_complex::Complex32;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Largeur par défaut du canevas (pixels).
pub const DEFAULT_WIDTH: usize = 1400;
/// Hauteur par défaut du canevas (pixels).
pub const DEFAULT_HEIGHT: usize = 800;
/// Nombre maximal d'itérations par défaut.
pub const DEFAULT_CUTOFF: u32 = 3000;
/// Taille nominale des tuiles. 32 colonnes de `u32` font 128 octets par ligne de tuile.
pub const DEFAULT_TILE: usize = 32;

/// Rectangle du plan complexe projeté sur le canevas.
///
/// Les bornes sont en `f32`, le type arithmétique des noyaux.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
}

impl Default for Viewport {
    /// Ensemble de Mandelbrot classique: [-2.5, 1] x [-1, 1].
    fn default() -> Self {
        Self {
            xmin: -2.5,
            xmax: 1.0,
            ymin: -1.0,
            ymax: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(xmin: f32, xmax: f32, ymin: f32, ymax: f32) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// Vérifie que les bornes sont finies et que chaque intervalle est non vide.
    pub fn validate(&self) -> Result<(), EngineError> {
        let bounds = [self.xmin, self.xmax, self.ymin, self.ymax];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "viewport non fini: {:?}",
                self
            )));
        }
        if self.xmin >= self.xmax || self.ymin >= self.ymax {
            return Err(EngineError::InvalidConfig(format!(
                "viewport dégénéré: x=[{}, {}] y=[{}, {}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            )));
        }
        Ok(())
    }
}

/// Paramètres d'un calcul: canevas, viewport, seuil et découpage en tuiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    pub width: usize,
    pub height: usize,
    pub viewport: Viewport,
    /// Nombre maximal d'itérations; un pixel qui l'atteint est considéré dans l'ensemble.
    pub cutoff: u32,
    pub tile_width: usize,
    pub tile_height: usize,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            viewport: Viewport::default(),
            cutoff: DEFAULT_CUTOFF,
            tile_width: DEFAULT_TILE,
            tile_height: DEFAULT_TILE,
        }
    }
}

impl RenderParams {
    /// Paramètres par défaut pour un canevas donné.
    pub fn with_canvas(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "canevas vide: {}x{}",
                self.width, self.height
            )));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "tuile vide: {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.cutoff == 0 {
            return Err(EngineError::InvalidConfig(
                "le nombre d'itérations doit être positif".to_string(),
            ));
        }
        // Le compteur des lanes est manipulé comme un entier signé 32 bits.
        if self.cutoff > i32::MAX as u32 {
            return Err(EngineError::InvalidConfig(format!(
                "nombre d'itérations trop grand: {}",
                self.cutoff
            )));
        }
        self.viewport.validate()
    }

    /// Échelle pixel -> plan utilisée par les noyaux.
    pub fn scale(&self) -> PlaneScale {
        PlaneScale {
            width: self.width as f32,
            height: self.height as f32,
            viewport: self.viewport,
        }
    }
}

/// Interpolation linéaire pixel -> plan complexe.
///
/// Même formule pour le noyau scalaire et le noyau vectoriel:
/// `min + v * (max - min) / range`, entièrement en `f32`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneScale {
    width: f32,
    height: f32,
    viewport: Viewport,
}

impl PlaneScale {
    #[inline]
    pub fn x(&self, px: usize) -> f32 {
        let vp = &self.viewport;
        vp.xmin + px as f32 * (vp.xmax - vp.xmin) / self.width
    }

    #[inline]
    pub fn y(&self, py: usize) -> f32 {
        let vp = &self.viewport;
        vp.ymin + py as f32 * (vp.ymax - vp.ymin) / self.height
    }

    /// Point `c` du plan pour le pixel `(px, py)`.
    #[inline]
    pub fn point(&self, px: usize, py: usize) -> Complex32 {
        Complex32::new(self.x(px), self.y(py))
    }
}
