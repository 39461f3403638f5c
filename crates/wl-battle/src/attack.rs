//! Attacks and their target classes.

use std::fmt;
use std::str::FromStr;

use crate::buff::Buff;
use crate::error::BattleError;

/// Who an attack may be aimed at, relative to the attacker's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    /// One member of the attacker's own side.
    Ally,
    /// One member of the opposing side.
    Foe,
    /// Every member of the attacker's own side.
    AllAllies,
    /// Every member of the opposing side.
    AllFoes,
}

impl TargetClass {
    /// Whether the attack is aimed at the attacker's own side.
    pub fn own_side(self) -> bool {
        matches!(self, Self::Ally | Self::AllAllies)
    }

    /// Whether the attack hits a whole side.
    pub fn hits_all(self) -> bool {
        matches!(self, Self::AllAllies | Self::AllFoes)
    }
}

impl FromStr for TargetClass {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ally" => Ok(Self::Ally),
            "foe" => Ok(Self::Foe),
            "all-ally" | "a_ally" => Ok(Self::AllAllies),
            "all-foe" | "a_foe" => Ok(Self::AllFoes),
            _ => Err(BattleError::InvalidTargetClass(s.to_string())),
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ally => "ally",
            Self::Foe => "foe",
            Self::AllAllies => "all-ally",
            Self::AllFoes => "all-foe",
        };
        f.write_str(s)
    }
}

/// An attack a combatant can use.
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    /// Name typed after `attack`.
    pub name: String,
    /// Flavour text shown in the inspection view.
    pub description: String,
    /// Damage before buffs.
    pub damage: i32,
    /// Who it may target.
    pub target: TargetClass,
    /// Buff copied onto every character it targets.
    pub buff: Option<Buff>,
}

impl Attack {
    /// Create an attack without a buff.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        damage: i32,
        target: TargetClass,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            damage,
            target,
            buff: None,
        }
    }

    /// Attach a buff applied on hit.
    pub fn with_buff(mut self, buff: Buff) -> Self {
        self.buff = Some(buff);
        self
    }
}
