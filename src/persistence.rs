//! Persistence of the long-lived part of the game state
//!
//! Only settings, custom content and lifetime statistics survive a restart.
//! They are stored as one JSON document under [`KEY`] in a key/value
//! [`Storage`]. A document that cannot be decoded is treated as absent so a
//! corrupt save never prevents the game from starting.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    card::Card,
    catalog::CustomCategories,
    constants::cards::DEFAULT_CARD_CATEGORY,
    game::GameStats,
    settings::{AdminSettings, GameSettings},
};

pub use crate::constants::storage::{KEY, SNAPSHOT_VERSION};

/// Failures while reading or writing saved data
#[derive(Error, Debug)]
pub enum Error {
    /// The storage backend failed
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid snapshot JSON
    #[error("malformed saved data: {0}")]
    Json(#[from] serde_json::Error),
    /// The document was written by a newer version of the game
    #[error("saved data version {0} is newer than this build supports")]
    UnsupportedVersion(u32),
}

/// The persisted subset of the game state
///
/// Every field falls back to its default when missing, so documents from
/// before versioning (read as version 0) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Format version of the document
    #[serde(default)]
    pub version: u32,
    /// Per-game settings
    #[serde(default)]
    pub game_settings: GameSettings,
    /// Loose custom cards
    #[serde(default)]
    pub custom_cards: Vec<Card>,
    /// Custom categories by name
    #[serde(default)]
    pub custom_categories: CustomCategories,
    /// Lifetime statistics
    #[serde(default)]
    pub game_stats: GameStats,
    /// Branding, sounds and feature flags
    #[serde(default)]
    pub admin_settings: AdminSettings,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(
            GameSettings::default(),
            Vec::new(),
            CustomCategories::new(),
            GameStats::default(),
            AdminSettings::default(),
        )
    }
}

impl Snapshot {
    /// Creates a snapshot at the current format version
    pub fn new(
        game_settings: GameSettings,
        custom_cards: Vec<Card>,
        custom_categories: CustomCategories,
        game_stats: GameStats,
        admin_settings: AdminSettings,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            game_settings,
            custom_cards,
            custom_categories,
            game_stats,
            admin_settings,
        }
    }

    /// Parses a saved document
    ///
    /// # Errors
    ///
    /// Fails if the JSON does not match the snapshot shape or the version is
    /// newer than this build understands.
    pub fn decode(json: &str) -> Result<Self, Error> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(Error::UnsupportedVersion(snapshot.version));
        }
        if snapshot.version == 0 {
            snapshot.label_unversioned_cards();
        }
        Ok(snapshot)
    }

    /// Unversioned documents store category cards without a label
    fn label_unversioned_cards(&mut self) {
        for card in &mut self.custom_cards {
            if card.category.is_empty() {
                DEFAULT_CARD_CATEGORY.clone_into(&mut card.category);
            }
        }
        for category in self.custom_categories.values_mut() {
            for card in &mut category.cards {
                if card.category.is_empty() {
                    card.category.clone_from(&category.name);
                }
            }
        }
    }

    /// Serializes the snapshot to its saved form
    ///
    /// # Errors
    ///
    /// Fails only if serialization itself fails.
    pub fn encode(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A string key/value store that outlives the process
pub trait Storage {
    /// Reads the value at `key`, `None` if it was never written
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Writes `value` at `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// Volatile storage, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage keeping one JSON file per key inside a directory
///
/// Writes go to a temporary sibling that is synced and then renamed over
/// the target, so a crash never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` as the storage root; it is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// Reads the saved snapshot, if there is a usable one
///
/// Read failures and undecodable documents are logged and reported as no
/// saved data.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Option<Snapshot> {
    let json = match storage.get(KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!(%error, "could not read saved data");
            return None;
        }
    };
    match Snapshot::decode(&json) {
        Ok(snapshot) => {
            tracing::info!(version = snapshot.version, "loaded saved data");
            Some(snapshot)
        }
        Err(error) => {
            tracing::warn!(%error, "discarding saved data");
            None
        }
    }
}

/// Writes `snapshot` as the saved data
///
/// # Errors
///
/// Fails if the snapshot cannot be encoded or the storage cannot be written.
pub fn save<S: Storage + ?Sized>(storage: &mut S, snapshot: &Snapshot) -> Result<(), Error> {
    storage.set(KEY, &snapshot.encode()?)
}
