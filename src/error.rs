use thiserror::Error;

/// Erreurs remontées par le moteur avant ou pendant le démarrage d'un calcul.
///
/// Le noyau lui-même ne peut pas échouer: toute erreur vient de la
/// configuration ou de la création des threads.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejetée avant tout calcul (zéro worker, tuile vide, viewport dégénéré...).
    #[error("configuration invalide: {0}")]
    InvalidConfig(String),

    /// Le système a refusé la création d'un thread worker.
    #[error("impossible de créer le worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Erreurs d'écriture d'image (PPM ou PNG).
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("erreur d'entrée/sortie: {0}")]
    Io(#[from] std::io::Error),

    #[error("erreur d'encodage d'image: {0}")]
    Image(#[from] image::ImageError),
}
