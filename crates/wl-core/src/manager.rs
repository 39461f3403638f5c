//! Game state that outlives a single chapter: the character roster, the
//! resume position, persistent flags and the line history.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::character::{Character, CharacterRecord, Speaker};
use crate::error::{CoreError, CoreResult, SaveError, SaveResult};
use crate::history::{DEFAULT_HISTORY_LEN, History, HistoryEntry};
use crate::sync::lock;

/// Keys every save file must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["current_section", "history", "characters", "persistent"];

/// Where the story currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Chapter title.
    pub chapter: Option<String>,
    /// Section name within the chapter.
    pub section: Option<String>,
}

impl Section {
    /// Both parts, if a position was ever recorded.
    pub fn position(&self) -> Option<(&str, &str)> {
        Some((self.chapter.as_deref()?, self.section.as_deref()?))
    }
}

/// On-disk save layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Resume position.
    pub current_section: Section,
    /// Recent lines.
    pub history: Vec<HistoryEntry>,
    /// Non-special characters.
    pub characters: Vec<CharacterRecord>,
    /// Story flags.
    pub persistent: BTreeMap<String, Value>,
    /// When the file was written.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveData {
    /// Read and validate a save file.
    pub fn read(path: &Path) -> SaveResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SaveError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(SaveError::Io(e)),
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| SaveError::Corrupt(e.to_string()))?;
        let Some(object) = value.as_object() else {
            return Err(SaveError::Corrupt("top level is not an object".into()));
        };
        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
            return Err(SaveError::MissingKey(*missing));
        }

        serde_json::from_value(value).map_err(|e| SaveError::Corrupt(e.to_string()))
    }
}

/// Owner of all persistent game state.
#[derive(Debug)]
pub struct Manager {
    save_path: PathBuf,
    section: Mutex<Section>,
    characters: Mutex<Vec<Arc<Character>>>,
    persistent: Mutex<BTreeMap<String, Value>>,
    history: Mutex<History>,
}

impl Manager {
    /// Create an empty manager saving to `save_path`.
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            section: Mutex::new(Section::default()),
            characters: Mutex::new(Vec::new()),
            persistent: Mutex::new(BTreeMap::new()),
            history: Mutex::new(History::with_capacity(DEFAULT_HISTORY_LEN)),
        }
    }

    /// Keep at most `len` lines of history.
    pub fn with_history_len(self, len: usize) -> Self {
        lock(&self.history).set_capacity(len);
        self
    }

    /// Path of the save file.
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Register a character, or return the one already registered under the
    /// same name.
    pub fn register_character(&self, character: Character) -> Speaker {
        let mut characters = lock(&self.characters);
        if let Some(existing) = characters.iter().find(|c| c.name() == character.name()) {
            return Speaker::new(Arc::clone(existing));
        }
        debug!(name = character.name(), special = character.is_special(), "character registered");
        let character = Arc::new(character);
        characters.push(Arc::clone(&character));
        Speaker::new(character)
    }

    /// Look up a registered character.
    pub fn character(&self, name: &str) -> CoreResult<Speaker> {
        lock(&self.characters)
            .iter()
            .find(|c| c.name() == name)
            .map(|c| Speaker::new(Arc::clone(c)))
            .ok_or_else(|| CoreError::CharacterNotFound(name.to_string()))
    }

    /// Every registered character, in registration order.
    pub fn characters(&self) -> Vec<Arc<Character>> {
        lock(&self.characters).clone()
    }

    /// Record the resume position.
    pub fn set_section(&self, chapter: &str, section: &str) {
        debug!(chapter, section, "section set");
        *lock(&self.section) = Section {
            chapter: Some(chapter.to_string()),
            section: Some(section.to_string()),
        };
    }

    /// The current resume position.
    pub fn section(&self) -> Section {
        lock(&self.section).clone()
    }

    /// Store a story flag.
    pub fn set_persistent<T: Serialize>(&self, key: &str, value: T) -> SaveResult<()> {
        let value = serde_json::to_value(value)?;
        lock(&self.persistent).insert(key.to_string(), value);
        Ok(())
    }

    /// Read a story flag; `None` if absent or of another type.
    pub fn persistent<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = lock(&self.persistent).get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    /// Keys of every stored flag.
    pub fn persistent_keys(&self) -> Vec<String> {
        lock(&self.persistent).keys().cloned().collect()
    }

    /// Add the character's current line to the history, once per line.
    pub fn record_line(&self, character: &Character) -> bool {
        let saying = character.speech().saying();
        lock(&self.history).record(character.name(), &character.display_name(), &saying)
    }

    /// Recent lines, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        lock(&self.history).to_vec()
    }

    /// Write everything except special characters to the save file.
    pub fn save(&self) -> SaveResult<()> {
        let data = SaveData {
            current_section: self.section(),
            history: self.history(),
            characters: lock(&self.characters)
                .iter()
                .filter(|c| !c.is_special())
                .map(|c| c.to_record())
                .collect(),
            persistent: lock(&self.persistent).clone(),
            saved_at: Some(Utc::now()),
        };

        if let Some(parent) = self.save_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.save_path, serde_json::to_string_pretty(&data)?)?;
        info!(path = %self.save_path.display(), "game saved");
        Ok(())
    }

    /// Replace the in-memory state with the save file's content.
    ///
    /// Special characters already registered are kept. Saved characters that
    /// are already registered are restored in place, so outstanding speakers
    /// see the loaded state; registered characters missing from the save are
    /// dropped.
    pub fn load(&self) -> SaveResult<()> {
        let data = SaveData::read(&self.save_path)?;

        {
            let mut characters = lock(&self.characters);
            let mut loaded: Vec<Arc<Character>> =
                characters.iter().filter(|c| c.is_special()).cloned().collect();
            for record in data.characters {
                if loaded.iter().any(|c| c.name() == record.name) {
                    continue;
                }
                match characters.iter().find(|c| c.name() == record.name) {
                    Some(existing) => {
                        existing.restore(&record);
                        loaded.push(Arc::clone(existing));
                    }
                    None => loaded.push(Arc::new(Character::from_record(record))),
                }
            }
            *characters = loaded;
        }
        *lock(&self.section) = data.current_section;
        *lock(&self.persistent) = data.persistent;
        lock(&self.history).replace(data.history);

        info!(path = %self.save_path.display(), "game loaded");
        Ok(())
    }
}
