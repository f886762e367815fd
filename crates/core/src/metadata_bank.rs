//! Song metadata used to generate ephemeral questions.
//!
//! The bank is read once at startup from a JSON document and never mutated
//! afterwards, so it can be shared across threads behind an `Arc` without
//! locking. Per-category candidate pools are precomputed at load time.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Bank shipped with the binary, used when no `SONG_BANK_PATH` is set.
const BUNDLED_BANK: &str = include_str!("../data/song_bank.json");

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A person (or film) that can appear as an answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub name: String,
    pub image_url: String,
}

/// One song and the people associated with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: String,
    pub hero: PersonInfo,
    pub heroine: PersonInfo,
    pub music_director: PersonInfo,
    pub cinema: PersonInfo,
    pub audio_url: String,
}

/// Which attribute of a song a generated question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessCategory {
    Hero,
    Heroine,
    MusicDirector,
    Cinema,
}

impl GuessCategory {
    pub const ALL: [GuessCategory; 4] = [
        GuessCategory::Hero,
        GuessCategory::Heroine,
        GuessCategory::MusicDirector,
        GuessCategory::Cinema,
    ];

    fn index(self) -> usize {
        match self {
            Self::Hero => 0,
            Self::Heroine => 1,
            Self::MusicDirector => 2,
            Self::Cinema => 3,
        }
    }

    /// The answer target of this category for `song`.
    pub fn person_of(self, song: &SongMetadata) -> &PersonInfo {
        match self {
            Self::Hero => &song.hero,
            Self::Heroine => &song.heroine,
            Self::MusicDirector => &song.music_director,
            Self::Cinema => &song.cinema,
        }
    }

    /// Render the question text for a song title.
    pub fn question_text(self, title: &str) -> String {
        match self {
            Self::Hero => format!("Who is the hero in \"{title}\"?"),
            Self::Heroine => format!("Who is the heroine in \"{title}\"?"),
            Self::MusicDirector => format!("Who is the music director for \"{title}\"?"),
            Self::Cinema => format!("Which cinema does \"{title}\" belong to?"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BankLoadError {
    #[error("Failed to read song bank at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed song bank JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Song bank contains no songs")]
    Empty,

    #[error("Invalid song entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

#[derive(Deserialize)]
struct BankDocument {
    songs: Vec<SongMetadata>,
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// Immutable table of songs plus per-category candidate pools.
#[derive(Debug)]
pub struct MetadataBank {
    songs: Vec<SongMetadata>,
    pools: [Vec<PersonInfo>; 4],
}

impl MetadataBank {
    /// Build a bank from songs, rejecting empty banks and blank fields.
    pub fn new(songs: Vec<SongMetadata>) -> Result<Self, BankLoadError> {
        if songs.is_empty() {
            return Err(BankLoadError::Empty);
        }
        for (index, song) in songs.iter().enumerate() {
            validate_song(song).map_err(|reason| BankLoadError::InvalidEntry { index, reason })?;
        }

        let pools = GuessCategory::ALL
            .map(|category| songs.iter().map(|s| category.person_of(s).clone()).collect());

        Ok(Self { songs, pools })
    }

    /// Parse a bank from a JSON document of the form `{ "songs": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, BankLoadError> {
        let doc: BankDocument = serde_json::from_str(json)?;
        Self::new(doc.songs)
    }

    /// Load a bank from a JSON file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, BankLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BankLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), songs = bank.len(), "Loaded song bank");
        Ok(bank)
    }

    /// The bank bundled with the crate.
    pub fn bundled() -> Result<Self, BankLoadError> {
        Self::from_json(BUNDLED_BANK)
    }

    pub fn songs(&self) -> &[SongMetadata] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// The category's person across every song in the bank, in bank order.
    pub fn pool(&self, category: GuessCategory) -> &[PersonInfo] {
        &self.pools[category.index()]
    }
}

fn validate_song(song: &SongMetadata) -> Result<(), String> {
    if song.title.trim().is_empty() {
        return Err("title must not be empty".into());
    }
    for category in GuessCategory::ALL {
        if category.person_of(song).name.trim().is_empty() {
            return Err(format!("{category:?} name must not be empty"));
        }
    }
    Ok(())
}
