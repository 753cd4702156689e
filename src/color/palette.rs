/// Les 16 teintes du dégradé utilisé par la page Wikipedia de l'ensemble de Mandelbrot.
pub const PALETTE: [(u8, u8, u8); 16] = [
    (66, 30, 15),
    (25, 7, 26),
    (9, 1, 47),
    (4, 4, 73),
    (0, 7, 100),
    (12, 44, 138),
    (24, 82, 177),
    (57, 125, 209),
    (134, 181, 229),
    (211, 236, 248),
    (241, 233, 191),
    (248, 201, 95),
    (255, 170, 0),
    (204, 128, 0),
    (153, 87, 0),
    (106, 52, 3),
];

/// Couleur d'un pixel: `PALETTE[count % 16]`, noir pour les points qui atteignent le seuil.
#[inline]
pub fn color_for_count(count: u32, cutoff: u32) -> (u8, u8, u8) {
    // Points dans l'ensemble : noir
    if count >= cutoff {
        return (0, 0, 0);
    }
    PALETTE[(count % 16) as usize]
}
