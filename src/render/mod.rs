pub mod backends;
pub mod barrier;
pub mod engine;
pub mod pool;
pub mod queue;

pub use backends::{render_rayon, render_sequential};
pub use barrier::CompletionBarrier;
pub use engine::{render, Engine, EngineConfig};
pub use pool::WorkerPool;
pub use queue::BoundedWorkQueue;
