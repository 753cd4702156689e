//! Découpage du canevas en tuiles.
//!
//! Les tuiles d'un même découpage sont disjointes et couvrent chaque pixel
//! exactement une fois: c'est ce qui permet aux workers d'écrire dans la
//! grille de résultats sans verrou.

use std::fmt;

/// Rectangle de pixels semi-ouvert `[y0, y1) x [x0, x1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    y0: usize,
    y1: usize,
    x0: usize,
    x1: usize,
}

impl Tile {
    /// Panique si le rectangle est vide: une tuile vide est un bug du découpage.
    pub fn new(y0: usize, y1: usize, x0: usize, x1: usize) -> Self {
        assert!(y0 < y1 && x0 < x1, "tuile vide: y=[{y0}, {y1}) x=[{x0}, {x1})");
        Self { y0, y1, x0, x1 }
    }

    pub fn y0(&self) -> usize {
        self.y0
    }

    pub fn y1(&self) -> usize {
        self.y1
    }

    pub fn x0(&self) -> usize {
        self.x0
    }

    pub fn x1(&self) -> usize {
        self.x1
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn rows(&self) -> std::ops::Range<usize> {
        self.y0..self.y1
    }

    pub fn columns(&self) -> std::ops::Range<usize> {
        self.x0..self.x1
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.y0, self.y1, self.x0, self.x1)
    }
}

/// Grille de tuiles en ordre ligne par ligne.
///
/// La dernière tuile de chaque ligne et de chaque colonne est rognée au bord
/// du canevas: `min((i + 1) * TILE, DIM)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayout {
    width: usize,
    height: usize,
    tile_width: usize,
    tile_height: usize,
}

impl TileLayout {
    /// Une tuile plus grande que le canevas est ramenée à la taille du canevas.
    pub fn new(width: usize, height: usize, tile_width: usize, tile_height: usize) -> Self {
        assert!(tile_width > 0 && tile_height > 0, "taille de tuile nulle");
        Self {
            width,
            height,
            tile_width: tile_width.min(width.max(1)),
            tile_height: tile_height.min(height.max(1)),
        }
    }

    /// Découpage compatible avec un noyau traitant `batch` pixels à la fois.
    ///
    /// La largeur effective des tuiles est arrondie au multiple de `batch`
    /// supérieur, si bien que seule la dernière colonne de tuiles peut contenir
    /// un lot partiel.
    pub fn aligned(width: usize, height: usize, tile_width: usize, tile_height: usize, batch: usize) -> Self {
        assert!(batch > 0, "largeur de lot nulle");
        let tile_width = tile_width.min(width.max(1)).div_ceil(batch) * batch;
        Self {
            tile_width,
            ..Self::new(width, height, tile_width, tile_height)
        }
    }

    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn rows(&self) -> usize {
        self.height.div_ceil(self.tile_height)
    }

    pub fn columns(&self) -> usize {
        self.width.div_ceil(self.tile_width)
    }

    /// Nombre total de tuiles.
    pub fn len(&self) -> usize {
        self.rows() * self.columns()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tile(&self, row: usize, column: usize) -> Tile {
        let y0 = row * self.tile_height;
        let x0 = column * self.tile_width;
        Tile::new(
            y0,
            ((row + 1) * self.tile_height).min(self.height),
            x0,
            ((column + 1) * self.tile_width).min(self.width),
        )
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |row| (0..columns).map(move |column| self.tile(row, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coverage(layout: &TileLayout, width: usize, height: usize) -> Vec<u8> {
        let mut seen = vec![0u8; width * height];
        for tile in layout.tiles() {
            assert!(tile.y1() <= height && tile.x1() <= width, "tuile hors canevas: {tile}");
            for y in tile.rows() {
                for x in tile.columns() {
                    seen[y * width + x] += 1;
                }
            }
        }
        seen
    }

    #[test]
    fn test_layout_counts() {
        let layout = TileLayout::new(1400, 800, 32, 32);
        assert_eq!(layout.rows(), 25);
        assert_eq!(layout.columns(), 44);
        assert_eq!(layout.len(), 1100);
        assert_eq!(layout.tiles().count(), 1100);
    }

    #[test]
    fn test_edge_tiles_are_clipped() {
        let layout = TileLayout::new(16, 16, 3, 3);
        let last = layout.tile(layout.rows() - 1, layout.columns() - 1);
        assert_eq!(last, Tile::new(15, 16, 15, 16));
        assert_eq!(last.area(), 1);
    }

    #[test]
    fn test_row_major_order() {
        let layout = TileLayout::new(4, 4, 2, 2);
        let tiles: Vec<Tile> = layout.tiles().collect();
        assert_eq!(
            tiles,
            vec![
                Tile::new(0, 2, 0, 2),
                Tile::new(0, 2, 2, 4),
                Tile::new(2, 4, 0, 2),
                Tile::new(2, 4, 2, 4),
            ]
        );
    }

    #[test]
    fn test_aligned_widths() {
        let layout = TileLayout::aligned(10, 3, 3, 3, 4);
        assert_eq!(layout.tile_width(), 4);
        let widths: Vec<usize> = layout.tiles().map(|t| t.width()).collect();
        assert_eq!(widths, vec![4, 4, 2]);
    }

    #[test]
    fn test_oversized_tiles_are_clamped() {
        let layout = TileLayout::aligned(16, 16, usize::MAX, usize::MAX, 4);
        assert_eq!(layout.tile_width(), 16);
        assert_eq!(layout.tile_height(), 16);
        assert_eq!(layout.tiles().collect::<Vec<_>>(), vec![Tile::new(0, 16, 0, 16)]);

        // Arrondi au lot au-delà du canevas: une seule colonne, rognée au bord.
        let layout = TileLayout::aligned(10, 2, usize::MAX, 1, 8);
        assert_eq!(layout.tile_width(), 16);
        assert_eq!(layout.columns(), 1);
        assert_eq!(layout.tile(0, 0), Tile::new(0, 1, 0, 10));

        let layout = TileLayout::new(5, 3, usize::MAX, 2);
        assert_eq!(layout.len(), 2);
    }

    #[test]
    #[should_panic(expected = "tuile vide")]
    fn test_empty_tile_panics() {
        let _ = Tile::new(3, 3, 0, 1);
    }

    proptest! {
        #[test]
        fn prop_tiles_partition_canvas(
            width in 1usize..120,
            height in 1usize..120,
            tile_width in 1usize..40,
            tile_height in 1usize..40,
        ) {
            let layout = TileLayout::new(width, height, tile_width, tile_height);
            let seen = coverage(&layout, width, height);
            prop_assert!(seen.iter().all(|&n| n == 1));
        }

        #[test]
        fn prop_aligned_tiles_partition_canvas(
            width in 1usize..120,
            height in 1usize..60,
            tile_width in 1usize..40,
            tile_height in 1usize..40,
            batch in prop::sample::select(vec![4usize, 8]),
        ) {
            let layout = TileLayout::aligned(width, height, tile_width, tile_height, batch);
            let seen = coverage(&layout, width, height);
            prop_assert!(seen.iter().all(|&n| n == 1));

            let last_column = layout.columns() - 1;
            for row in 0..layout.rows() {
                for column in 0..last_column {
                    prop_assert_eq!(layout.tile(row, column).width() % batch, 0);
                }
            }
        }
    }
}
