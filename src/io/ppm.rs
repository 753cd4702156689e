use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::color::color_for_count;
use crate::error::OutputError;
use crate::fractal::ResultGrid;

/// Écrit la grille au format PPM binaire: en-tête `P6 <W> <H> 255\n` puis
/// les triplets RGB ligne par ligne.
pub fn write_ppm<W: Write>(grid: &ResultGrid, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "P6 {} {} 255", grid.width(), grid.height())?;
    let cutoff = grid.cutoff();
    let mut line = Vec::with_capacity(grid.width() * 3);
    for y in 0..grid.height() {
        line.clear();
        for count in grid.row(y) {
            let (r, g, b) = color_for_count(count, cutoff);
            line.extend_from_slice(&[r, g, b]);
        }
        out.write_all(&line)?;
    }
    Ok(())
}

pub fn save_ppm(grid: &ResultGrid, output: &Path) -> Result<(), OutputError> {
    let mut out = BufWriter::new(File::create(output)?);
    write_ppm(grid, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_pixels() {
        let grid = ResultGrid::new(3, 1, 20);
        grid.write(0, 0, 20);
        grid.write(1, 0, 16);
        grid.write(2, 0, 5);
        let mut bytes = Vec::new();
        write_ppm(&grid, &mut bytes).unwrap();

        let header = b"P6 3 1 255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(
            &bytes[header.len()..],
            &[0, 0, 0, 66, 30, 15, 12, 44, 138]
        );
    }

    #[test]
    fn test_file_size() {
        let grid = ResultGrid::new(7, 4, 10);
        let path = std::env::temp_dir().join(format!("mandelpool-test-{}.ppm", std::process::id()));
        save_ppm(&grid, &path).unwrap();
        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len, "P6 7 4 255\n".len() + 7 * 4 * 3);
        std::fs::remove_file(&path).unwrap();
    }
}
