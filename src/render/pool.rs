//! Pool de workers à durée de vie longue.
//!
//! Chaque worker boucle: retirer une tuile de la file, lancer le noyau,
//! signaler la tuile terminée à la barrière. La boucle s'arrête quand la
//! file est fermée et vide.
//!
//! Une panique pendant le calcul d'une tuile est fatale pour le calcul: la
//! barrière est marquée en échec et le coordinateur panique à son tour.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::EngineError;
use crate::fractal::grid::ResultGrid;
use crate::fractal::kernel::KernelKind;
use crate::fractal::tile::Tile;
use crate::fractal::types::PlaneScale;
use crate::render::barrier::CompletionBarrier;
use crate::render::queue::BoundedWorkQueue;

/// État partagé d'un calcul: la grille à remplir et de quoi calculer chaque pixel.
#[derive(Debug)]
pub(crate) struct RunContext {
    pub(crate) grid: ResultGrid,
    pub(crate) scale: PlaneScale,
    pub(crate) cutoff: u32,
    pub(crate) kernel: KernelKind,
}

/// Une tuile d'un calcul donné.
#[derive(Debug)]
pub(crate) struct Job {
    pub(crate) tile: Tile,
    pub(crate) run: Arc<RunContext>,
}

impl Job {
    /// Consomme la tâche: la référence au calcul est rendue avant le signal de fin.
    fn execute(self) {
        let run = self.run;
        run.kernel.render_tile(&self.tile, &run.scale, run.cutoff, &run.grid);
    }
}

#[derive(Debug)]
pub struct WorkerPool {
    queue: Arc<BoundedWorkQueue<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub(crate) fn spawn(
        size: usize,
        queue: Arc<BoundedWorkQueue<Job>>,
        barrier: Arc<CompletionBarrier>,
    ) -> Result<Self, EngineError> {
        let mut pool = Self {
            queue,
            workers: Vec::with_capacity(size),
        };
        for index in 0..size {
            let queue = Arc::clone(&pool.queue);
            let barrier = Arc::clone(&barrier);
            let handle = thread::Builder::new()
                .name(format!("mandel-worker-{index}"))
                .spawn(move || worker_loop(&queue, &barrier))
                .map_err(|source| EngineError::Spawn { index, source })?;
            pool.workers.push(handle);
        }
        log::debug!("{} workers démarrés", size);
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Ferme la file et attend la fin de chaque worker. Sans effet si déjà fait.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.queue.close();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                log::error!("{name} s'est terminé sur une panique");
            }
        }
        log::debug!("pool arrêté");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(queue: &BoundedWorkQueue<Job>, barrier: &CompletionBarrier) {
    while let Some(job) = queue.dequeue() {
        let tile = job.tile;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job.execute())) {
            log::error!("panique pendant le calcul de la tuile {tile}");
            barrier.fail();
            panic::resume_unwind(payload);
        }
        barrier.report_done();
    }
}
