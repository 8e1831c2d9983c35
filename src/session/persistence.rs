//! Save games: the snapshot blob and where it is kept

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{Result, RogueError};
use crate::core::types::Timestamp;
use crate::progression::Player;
use crate::world::store::WorldSnapshot;

/// Bumped whenever the blob layout changes incompatibly
pub const SAVE_VERSION: u32 = 1;

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub saved_at: Timestamp,
    pub player: Player,
    pub world: WorldSnapshot,
}

impl SaveGame {
    pub fn new(player: Player, world: WorldSnapshot) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            player,
            world,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let game: SaveGame = serde_json::from_str(json)?;
        if game.version > SAVE_VERSION {
            return Err(RogueError::Config(format!(
                "save version {} is newer than supported version {}",
                game.version, SAVE_VERSION
            )));
        }
        Ok(game)
    }
}

/// Where save games live. The session decides when to call these.
pub trait SaveStore: Send {
    fn save(&mut self, game: &SaveGame) -> Result<()>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<SaveGame>>;
}

/// JSON file on disk, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "save.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, game: &SaveGame) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, game.to_json()?)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!("Saved game to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveGame>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => SaveGame::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn raw(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, game: &SaveGame) -> Result<()> {
        self.blob = Some(game.to_json()?);
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveGame>> {
        self.blob.as_deref().map(SaveGame::from_json).transpose()
    }
}
