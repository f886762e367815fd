use std::sync::Arc;

use tunequiz_core::metadata_bank::{BankLoadError, MetadataBank};
use tunequiz_core::session_store::{SessionStore, SessionStoreConfig};
use tunequiz_core::song_quiz::SongQuizService;

use crate::config::{ServerConfig, SongQuizConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tunequiz_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Ephemeral song quiz: bank, session store and generator.
    pub song_quiz: Arc<SongQuizService>,
}

/// Load the song bank and build the song quiz service from configuration.
///
/// Falls back to the bundled bank when no `song_bank_path` is configured.
pub fn build_song_quiz_service(
    config: &SongQuizConfig,
) -> Result<SongQuizService, BankLoadError> {
    let bank = match &config.song_bank_path {
        Some(path) => MetadataBank::load_from_path(path)?,
        None => MetadataBank::bundled()?,
    };

    let store = SessionStore::new(SessionStoreConfig {
        capacity: config.session_capacity,
        ttl: chrono::Duration::seconds(config.session_ttl_secs),
        ..SessionStoreConfig::default()
    });

    Ok(SongQuizService::new(
        Arc::new(bank),
        Arc::new(store),
        config.rng_seed,
    ))
}
