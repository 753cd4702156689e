//! Moteur de calcul Mandelbrot par tuiles.
//!
//! Le canevas est découpé en tuiles disjointes, placées dans une file bornée
//! et consommées par un pool fixe de workers; une barrière de complétion
//! réveille le coordinateur quand toutes les tuiles sont calculées. Les
//! noyaux existent en version scalaire et en version vectorielle à 4 ou 8
//! lanes, avec des résultats identiques.
//!
//! ```no_run
//! use mandelpool::{Engine, EngineConfig, RenderParams};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! let grid = engine.run(&RenderParams::default())?;
//! println!("{}", grid.read(700, 400));
//! # Ok::<(), mandelpool::EngineError>(())
//! ```

pub mod color;
pub mod error;
pub mod fractal;
pub mod io;
pub mod render;

pub use error::{EngineError, OutputError};
pub use fractal::{KernelKind, RenderParams, ResultGrid, Tile, TileLayout, Viewport};
pub use render::{render, render_rayon, render_sequential, Engine, EngineConfig};
