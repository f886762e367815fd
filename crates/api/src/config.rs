use tunequiz_core::session_store::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Song quiz generation and session settings.
    pub song_quiz: SongQuizConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            song_quiz: SongQuizConfig::from_env(),
        }
    }
}

/// Song quiz settings.
#[derive(Debug, Clone)]
pub struct SongQuizConfig {
    /// JSON song bank to load instead of the bundled one.
    pub song_bank_path: Option<String>,
    /// Fixed seed for question generation; random when unset.
    pub rng_seed: Option<u64>,
    /// Maximum number of live generated questions.
    pub session_capacity: usize,
    /// Seconds a generated question stays answerable.
    pub session_ttl_secs: i64,
    /// Seconds between sweeps of expired questions.
    pub session_sweep_interval_secs: u64,
}

impl Default for SongQuizConfig {
    fn default() -> Self {
        Self {
            song_bank_path: None,
            rng_seed: None,
            session_capacity: DEFAULT_CAPACITY,
            session_ttl_secs: DEFAULT_TTL_SECS,
            session_sweep_interval_secs: 300,
        }
    }
}

impl SongQuizConfig {
    /// | Env Var                       | Default          |
    /// |-------------------------------|------------------|
    /// | `SONG_BANK_PATH`              | bundled bank     |
    /// | `QUIZ_RNG_SEED`               | OS entropy       |
    /// | `SESSION_CAPACITY`            | `100000`         |
    /// | `SESSION_TTL_SECS`            | `3600`           |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `300`            |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let song_bank_path = std::env::var("SONG_BANK_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let rng_seed = std::env::var("QUIZ_RNG_SEED").ok().map(|v| {
            v.parse()
                .expect("QUIZ_RNG_SEED must be a valid u64")
        });

        let session_capacity = std::env::var("SESSION_CAPACITY")
            .map(|v| v.parse().expect("SESSION_CAPACITY must be a valid usize"))
            .unwrap_or(defaults.session_capacity);

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .map(|v| v.parse().expect("SESSION_TTL_SECS must be a valid i64"))
            .unwrap_or(defaults.session_ttl_secs);

        let session_sweep_interval_secs = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .map(|v| {
                v.parse()
                    .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64")
            })
            .unwrap_or(defaults.session_sweep_interval_secs);

        Self {
            song_bank_path,
            rng_seed,
            session_capacity,
            session_ttl_secs,
            session_sweep_interval_secs,
        }
    }
}
