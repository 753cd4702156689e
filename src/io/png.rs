use std::path::Path;

use image::{ImageError, RgbImage};
use rayon::prelude::*;

use crate::color::color_for_count;
use crate::error::OutputError;
use crate::fractal::ResultGrid;

/// Colorise la grille dans un buffer RGB, ligne par ligne.
///
/// La colorisation est parallélisée par lignes.
pub fn colorize(grid: &ResultGrid) -> Vec<u8> {
    let cutoff = grid.cutoff();
    (0..grid.height())
        .into_par_iter()
        .flat_map_iter(|y| {
            grid.row(y).into_iter().flat_map(move |count| {
                let (r, g, b) = color_for_count(count, cutoff);
                [r, g, b]
            })
        })
        .collect()
}

/// Génère une image RGB colorisée à partir de la grille, puis l'enregistre au format PNG.
pub fn save_png(grid: &ResultGrid, output: &Path) -> Result<(), OutputError> {
    let width = u32::try_from(grid.width()).map_err(invalid_size)?;
    let height = u32::try_from(grid.height()).map_err(invalid_size)?;
    let buffer = colorize(grid);

    let img = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        ImageError::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Impossible de créer l'image depuis le buffer",
        ))
    })?;

    img.save(output)?;
    Ok(())
}

fn invalid_size(e: std::num::TryFromIntError) -> OutputError {
    OutputError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_layout() {
        let grid = ResultGrid::new(2, 2, 10);
        grid.write(1, 0, 1);
        grid.write(0, 1, 10);
        let buffer = colorize(&grid);
        assert_eq!(buffer.len(), 12);
        assert_eq!(&buffer[0..3], &[66, 30, 15]);
        assert_eq!(&buffer[3..6], &[25, 7, 26]);
        assert_eq!(&buffer[6..9], &[0, 0, 0]);
    }

    #[test]
    fn test_save_png_roundtrip_dimensions() {
        let grid = ResultGrid::new(5, 3, 4);
        let path = std::env::temp_dir().join(format!("mandelpool-test-{}.png", std::process::id()));
        save_png(&grid, &path).unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(0, 0).0, [66, 30, 15]);
        std::fs::remove_file(&path).unwrap();
    }
}
