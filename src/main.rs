use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use mandelpool::fractal::types::{DEFAULT_CUTOFF, DEFAULT_HEIGHT, DEFAULT_TILE, DEFAULT_WIDTH};
use mandelpool::io::save_image;
use mandelpool::render::engine::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use mandelpool::{render_rayon, render_sequential, Engine, EngineConfig, KernelKind, RenderParams, Viewport};

/// Calcul de l'ensemble de Mandelbrot par tuiles sur un pool de threads.
///
/// Exemple d'utilisation :
///   mandelpool -j8 --width 1920 --height 1080 --output mandelbrot.png
#[derive(Parser, Debug)]
#[command(
    name = "mandelpool",
    about = "Mandelbrot par tuiles: pool de workers, file bornée, noyau vectoriel",
    version
)]
struct Cli {
    /// Nombre de threads workers
    #[arg(short = 'j', long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Largeur du canevas en pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Hauteur du canevas en pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Largeur nominale des tuiles
    #[arg(long, default_value_t = DEFAULT_TILE)]
    tile_x: usize,

    /// Hauteur nominale des tuiles
    #[arg(long, default_value_t = DEFAULT_TILE)]
    tile_y: usize,

    /// Coordonnée minimale X du plan complexe
    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<f32>,

    /// Coordonnée maximale X du plan complexe
    #[arg(long, allow_hyphen_values = true)]
    xmax: Option<f32>,

    /// Coordonnée minimale Y du plan complexe
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<f32>,

    /// Coordonnée maximale Y du plan complexe
    #[arg(long, allow_hyphen_values = true)]
    ymax: Option<f32>,

    /// Nombre maximal d'itérations
    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    iterations: u32,

    /// Capacité de la file de tuiles
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Noyau (auto, scalar, lanes4, lanes8)
    #[arg(long, default_value = "auto")]
    kernel: String,

    /// Moteur de rendu (pool, sequential, rayon)
    #[arg(long, default_value = "pool")]
    backend: String,

    /// Fichier de sortie (.png, sinon PPM)
    #[arg(long, value_name = "FICHIER", default_value = "mandelpool.ppm")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Pool,
    Sequential,
    Rayon,
}

impl Backend {
    fn from_cli_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pool" | "threads" => Some(Backend::Pool),
            "sequential" | "seq" => Some(Backend::Sequential),
            "rayon" => Some(Backend::Rayon),
            _ => None,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let Some(kernel) = KernelKind::from_cli_name(&cli.kernel) else {
        eprintln!("Noyau invalide: '{}'. Options: auto, scalar, lanes4, lanes8", cli.kernel);
        std::process::exit(1);
    };
    let Some(backend) = Backend::from_cli_name(&cli.backend) else {
        eprintln!("Moteur invalide: '{}'. Options: pool, sequential, rayon", cli.backend);
        std::process::exit(1);
    };

    let defaults = Viewport::default();
    let params = RenderParams {
        width: cli.width,
        height: cli.height,
        viewport: Viewport::new(
            cli.xmin.unwrap_or(defaults.xmin),
            cli.xmax.unwrap_or(defaults.xmax),
            cli.ymin.unwrap_or(defaults.ymin),
            cli.ymax.unwrap_or(defaults.ymax),
        ),
        cutoff: cli.iterations,
        tile_width: cli.tile_x,
        tile_height: cli.tile_y,
    };
    let config = EngineConfig {
        workers: cli.workers,
        queue_capacity: cli.queue_capacity,
        kernel,
    };

    let result = match backend {
        Backend::Pool => Engine::new(config).and_then(|mut engine| {
            // Chronomètre démarré après la création des threads.
            let start = Instant::now();
            let grid = engine.run(&params);
            println!("Compute: Elapsed {}ms", start.elapsed().as_millis());
            engine.shutdown();
            grid
        }),
        Backend::Sequential | Backend::Rayon => {
            let start = Instant::now();
            let grid = if backend == Backend::Sequential {
                render_sequential(&params, kernel)
            } else {
                render_rayon(&params, kernel)
            };
            println!("Compute: Elapsed {}ms", start.elapsed().as_millis());
            grid
        }
    };

    let grid = match result {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Erreur: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = save_image(&grid, &cli.output) {
        eprintln!("Erreur lors de l'écriture de {}: {e}", cli.output.display());
        std::process::exit(1);
    }
}
