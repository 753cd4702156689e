use std::sync::atomic::{AtomicU32, Ordering};

/// Grille partagée des nombres d'itérations, un `u32` par pixel, ligne par ligne.
///
/// Les écritures se font sans verrou: chaque cellule appartient à une seule
/// tuile, donc à un seul worker pendant un calcul. Les accès sont `Relaxed`;
/// la visibilité côté coordinateur est assurée par la barrière de complétion.
#[derive(Debug)]
pub struct ResultGrid {
    width: usize,
    height: usize,
    cutoff: u32,
    cells: Vec<AtomicU32>,
}

impl ResultGrid {
    pub fn new(width: usize, height: usize, cutoff: u32) -> Self {
        let cells = (0..width * height).map(|_| AtomicU32::new(0)).collect();
        Self {
            width,
            height,
            cutoff,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Seuil d'itérations du calcul qui a rempli la grille.
    pub fn cutoff(&self) -> u32 {
        self.cutoff
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) hors grille");
        y * self.width + x
    }

    #[inline]
    pub fn write(&self, x: usize, y: usize, count: u32) {
        debug_assert!(count <= self.cutoff);
        self.cells[self.index(x, y)].store(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn read(&self, x: usize, y: usize) -> u32 {
        self.cells[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Écrit une suite de valeurs consécutives sur la ligne `y` à partir de `x0`.
    #[inline]
    pub fn write_run(&self, x0: usize, y: usize, counts: &[u32]) {
        let start = self.index(x0, y);
        let end = start + counts.len();
        assert!(x0 + counts.len() <= self.width, "écriture au-delà de la ligne {y}");
        for (cell, &count) in self.cells[start..end].iter().zip(counts) {
            cell.store(count, Ordering::Relaxed);
        }
    }

    /// Copie d'une ligne.
    pub fn row(&self, y: usize) -> Vec<u32> {
        let start = self.index(0, y);
        self.cells[start..start + self.width]
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }

    /// Copie de toute la grille, ligne par ligne.
    pub fn to_counts(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    pub fn into_counts(self) -> Vec<u32> {
        self.cells.into_iter().map(AtomicU32::into_inner).collect()
    }
}

impl Clone for ResultGrid {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cutoff: self.cutoff,
            cells: self.to_counts().into_iter().map(AtomicU32::new).collect(),
        }
    }
}

impl PartialEq for ResultGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.cutoff == other.cutoff
            && self.to_counts() == other.to_counts()
    }
}

impl Eq for ResultGrid {}
