//! Characters and the handles the story uses to drive them.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::speech::{SpeakOptions, SpeechChannel, SpeechConsumer, SpeechProducer};
use crate::sync::lock;

/// A character's sex, used for pronouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// `m`
    #[serde(rename = "m")]
    Male,
    /// `f`
    #[serde(rename = "f")]
    Female,
}

impl Sex {
    /// Parse `m` or `f` (case-insensitive) for the named character.
    pub fn parse(name: &str, sex: &str) -> CoreResult<Self> {
        match sex.to_lowercase().as_str() {
            "m" => Ok(Self::Male),
            "f" => Ok(Self::Female),
            _ => Err(CoreError::InvalidSex {
                name: name.to_string(),
                sex: sex.to_string(),
            }),
        }
    }

    /// Pronouns for this sex.
    pub fn pronouns(self) -> Pronouns {
        match self {
            Self::Male => Pronouns {
                subject: "he",
                object: "him",
                possessive: "his",
            },
            Self::Female => Pronouns {
                subject: "she",
                object: "her",
                possessive: "her",
            },
        }
    }
}

/// Subject, object and possessive pronouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronouns {
    /// "he" / "she"
    pub subject: &'static str,
    /// "him" / "her"
    pub object: &'static str,
    /// "his" / "her"
    pub possessive: &'static str,
}

/// Named band of an affinity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AffinityTier {
    /// -50 and below.
    Hostile,
    /// -49 to -10.
    Cold,
    /// -9 to 9.
    Neutral,
    /// 10 to 49.
    Friendly,
    /// 50 and above.
    Close,
}

impl AffinityTier {
    /// Map a score to its tier.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=-50 => Self::Hostile,
            -49..=-10 => Self::Cold,
            -9..=9 => Self::Neutral,
            10..=49 => Self::Friendly,
            _ => Self::Close,
        }
    }
}

impl fmt::Display for AffinityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hostile => "Hostile",
            Self::Cold => "Cold",
            Self::Neutral => "Neutral",
            Self::Friendly => "Friendly",
            Self::Close => "Close",
        };
        f.write_str(name)
    }
}

/// Saved form of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Character name, unique within a save.
    pub name: String,
    /// Character sex.
    pub sex: Sex,
    /// Affinity score.
    pub affinity: i32,
    /// Name shown instead of the real one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_name: Option<String>,
}

/// A named character with its own speech channel.
///
/// Shared between the story thread (through [`Speaker`]) and the render loop
/// (through [`Character::speech`]).
#[derive(Debug)]
pub struct Character {
    name: String,
    sex: Sex,
    special: bool,
    hidden_name: Mutex<Option<String>>,
    affinity: AtomicI32,
    speech: SpeechChannel,
}

impl Character {
    /// Create a character; `sex` must be `m` or `f`.
    pub fn new(name: impl Into<String>, sex: &str) -> CoreResult<Self> {
        let name = name.into();
        let sex = Sex::parse(&name, sex)?;
        Ok(Self::with_sex(name, sex))
    }

    /// Create a character from an already parsed sex.
    pub fn with_sex(name: impl Into<String>, sex: Sex) -> Self {
        let name = name.into();
        Self {
            speech: SpeechChannel::new(name.clone()),
            name,
            sex,
            special: false,
            hidden_name: Mutex::new(None),
            affinity: AtomicI32::new(0),
        }
    }

    /// Mark as special (narrator-like); special characters are never saved.
    pub fn special(mut self) -> Self {
        self.special = true;
        self
    }

    /// Start with a hidden name shown in place of the real one.
    pub fn hidden_as(self, shown: impl Into<String>) -> Self {
        *lock(&self.hidden_name) = Some(shown.into());
        self
    }

    /// Rebuild a character from its saved form.
    pub fn from_record(record: CharacterRecord) -> Self {
        let character = Self::with_sex(record.name, record.sex);
        character.affinity.store(record.affinity, Ordering::SeqCst);
        *lock(&character.hidden_name) = record.hidden_name;
        character
    }

    /// Overwrite affinity and hidden name from a saved record.
    pub fn restore(&self, record: &CharacterRecord) {
        self.affinity.store(record.affinity, Ordering::SeqCst);
        *lock(&self.hidden_name) = record.hidden_name.clone();
    }

    /// Saved form of this character.
    pub fn to_record(&self) -> CharacterRecord {
        CharacterRecord {
            name: self.name.clone(),
            sex: self.sex,
            affinity: self.affinity(),
            hidden_name: lock(&self.hidden_name).clone(),
        }
    }

    /// The character's real name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name to show in the dialogue box.
    pub fn display_name(&self) -> String {
        lock(&self.hidden_name)
            .clone()
            .unwrap_or_else(|| self.name.clone())
    }

    /// The character's sex.
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Pronouns for this character.
    pub fn pronouns(&self) -> Pronouns {
        self.sex.pronouns()
    }

    /// Whether this character is excluded from saves.
    pub fn is_special(&self) -> bool {
        self.special
    }

    /// Current affinity score.
    pub fn affinity(&self) -> i32 {
        self.affinity.load(Ordering::SeqCst)
    }

    /// Tier of the current affinity score.
    pub fn affinity_tier(&self) -> AffinityTier {
        AffinityTier::from_score(self.affinity())
    }

    /// Render-side view of the speech channel.
    pub fn speech(&self) -> &dyn SpeechConsumer {
        &self.speech
    }
}

/// Story-side handle to a registered character.
///
/// Exposes speaking and character state but not the render-side cursor
/// operations.
#[derive(Debug, Clone)]
pub struct Speaker(Arc<Character>);

impl Speaker {
    /// Wrap a shared character.
    pub fn new(character: Arc<Character>) -> Self {
        Self(character)
    }

    /// The character's real name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The character's sex.
    pub fn sex(&self) -> Sex {
        self.0.sex()
    }

    /// Pronouns for this character.
    pub fn pronouns(&self) -> Pronouns {
        self.0.pronouns()
    }

    /// Current affinity score.
    pub fn affinity(&self) -> i32 {
        self.0.affinity()
    }

    /// Tier of the current affinity score.
    pub fn affinity_tier(&self) -> AffinityTier {
        self.0.affinity_tier()
    }

    /// Shift affinity by `delta`, returning the new score.
    pub fn adjust_affinity(&self, delta: i32) -> i32 {
        let previous = self.0.affinity.fetch_add(delta, Ordering::SeqCst);
        previous.wrapping_add(delta)
    }

    /// Show `shown` instead of the real name, or reveal it with `None`.
    pub fn set_hidden_name(&self, shown: Option<String>) {
        *lock(&self.0.hidden_name) = shown;
    }

    /// The shared character behind this handle.
    pub fn character(&self) -> &Arc<Character> {
        &self.0
    }
}

impl SpeechProducer for Speaker {
    fn speak_with(&self, text: &str, options: SpeakOptions) -> CoreResult<()> {
        self.0.speech.speak_with(text, options)
    }

    fn lock_speech(&self) -> CoreResult<()> {
        self.0.speech.lock_speech()
    }

    fn unlock_speech(&self) -> CoreResult<()> {
        self.0.speech.unlock_speech()
    }
}
