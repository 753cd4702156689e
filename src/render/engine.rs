//! Coordinateur: découpe le canevas, alimente la file, attend la barrière.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::fractal::grid::ResultGrid;
use crate::fractal::kernel::KernelKind;
use crate::fractal::tile::TileLayout;
use crate::fractal::types::RenderParams;
use crate::render::barrier::CompletionBarrier;
use crate::render::pool::{Job, RunContext, WorkerPool};
use crate::render::queue::BoundedWorkQueue;

pub const DEFAULT_WORKERS: usize = 4;
/// Capacité de la file, indépendante du nombre de tuiles.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub kernel: KernelKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            kernel: KernelKind::Auto,
        }
    }
}

impl EngineConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.workers == 0 {
            return Err(EngineError::InvalidConfig("zéro worker".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig("file de capacité nulle".to_string()));
        }
        Ok(())
    }
}

/// Moteur de calcul: possède la file, la barrière et le pool.
///
/// Le pool est créé une fois et sert à tous les calculs. `run` prend
/// `&mut self`, donc deux calculs ne peuvent pas se chevaucher sur la même
/// barrière.
#[derive(Debug)]
pub struct Engine {
    queue: Arc<BoundedWorkQueue<Job>>,
    barrier: Arc<CompletionBarrier>,
    pool: WorkerPool,
    kernel: KernelKind,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let queue = Arc::new(BoundedWorkQueue::new(config.queue_capacity));
        let barrier = Arc::new(CompletionBarrier::new());
        let pool = WorkerPool::spawn(config.workers, Arc::clone(&queue), Arc::clone(&barrier))?;
        let kernel = config.kernel.resolve();
        log::info!(
            "moteur prêt: {} workers, file de {}, noyau {}",
            config.workers,
            config.queue_capacity,
            kernel.name()
        );
        Ok(Self {
            queue,
            barrier,
            pool,
            kernel,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Noyau effectivement utilisé (jamais `Auto`).
    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    /// Calcule une passe complète et rend la grille remplie.
    ///
    /// Panique si le calcul d'une tuile panique dans un worker; le moteur
    /// n'est alors plus utilisable.
    pub fn run(&mut self, params: &RenderParams) -> Result<ResultGrid, EngineError> {
        params.validate()?;
        let layout = TileLayout::aligned(
            params.width,
            params.height,
            params.tile_width,
            params.tile_height,
            self.kernel.batch_width(),
        );
        log::debug!("Rows {} cols {}", layout.rows(), layout.columns());

        let run = Arc::new(RunContext {
            grid: ResultGrid::new(params.width, params.height, params.cutoff),
            scale: params.scale(),
            cutoff: params.cutoff,
            kernel: self.kernel,
        });

        // La barrière est armée avant la première mise en file: aucun
        // report_done ne peut la précéder.
        self.barrier.arm(layout.len());
        for tile in layout.tiles() {
            let job = Job {
                tile,
                run: Arc::clone(&run),
            };
            if self.queue.enqueue(job).is_err() {
                // Seul shutdown ferme la file, et il consomme le moteur.
                unreachable!("file fermée pendant un calcul");
            }
        }
        self.barrier.wait_until_done();
        log::info!("{} tuiles calculées ({}x{})", layout.len(), params.width, params.height);

        // Chaque worker rend sa référence avant de signaler la fin de sa tuile.
        let grid = match Arc::try_unwrap(run) {
            Ok(run) => run.grid,
            Err(shared) => shared.grid.clone(),
        };
        Ok(grid)
    }

    /// Arrête les workers et attend leur fin.
    pub fn shutdown(mut self) {
        self.pool.shutdown();
    }
}

/// Calcul autonome: crée un moteur, fait une passe, l'arrête.
pub fn render(params: &RenderParams, config: &EngineConfig) -> Result<ResultGrid, EngineError> {
    let mut engine = Engine::new(*config)?;
    let grid = engine.run(params)?;
    engine.shutdown();
    Ok(grid)
}
