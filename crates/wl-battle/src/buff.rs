//! Timed status effects.

use rand::Rng;

/// What a buff does when its holder is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffKind {
    /// No effect; a label with a timer.
    Marker,
    /// One-in-three chance to take no damage.
    Evade,
    /// Take extra damage from every hit.
    Weakened {
        /// Flat damage added per hit.
        extra: i32,
    },
}

/// A status effect attached to a combatant.
///
/// Buffs are plain values: attaching one always stores a fresh copy, so
/// ticking one holder's buff never touches another's.
#[derive(Debug, Clone, PartialEq)]
pub struct Buff {
    /// Display name.
    pub name: String,
    /// What the buff does.
    pub description: String,
    /// Turns left before the buff falls off.
    pub remaining: i32,
    /// Turns to wait before `remaining` starts counting down.
    pub hot: u32,
    /// Effect applied by the hooks.
    pub kind: BuffKind,
}

impl Buff {
    /// A buff with no effect lasting `length` turns after one hot turn.
    pub fn new(name: impl Into<String>, description: impl Into<String>, length: i32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            remaining: length,
            hot: 1,
            kind: BuffKind::Marker,
        }
    }

    /// Dodge buff.
    pub fn evade(length: i32) -> Self {
        Self {
            kind: BuffKind::Evade,
            ..Self::new(
                "Evade",
                "Enhanced knowledge of the battlefield allows this character to dodge attacks.",
                length,
            )
        }
    }

    /// Vulnerability buff: +2 damage per hit.
    pub fn weakened(length: i32) -> Self {
        Self {
            kind: BuffKind::Weakened { extra: 2 },
            ..Self::new(
                "Weakened",
                "This character takes +2 extra damage... Ouch!",
                length,
            )
        }
    }

    /// Set the hot turn count.
    pub fn with_hot(mut self, hot: u32) -> Self {
        self.hot = hot;
        self
    }

    /// Hook run when the holder attacks. No built-in kind reacts to it.
    pub fn on_attack(&mut self) {}

    /// Hook run when the holder is hit; returns the damage to apply.
    pub fn on_attacked<R: Rng + ?Sized>(&self, damage: i32, rng: &mut R) -> i32 {
        match self.kind {
            BuffKind::Marker => damage,
            BuffKind::Evade => {
                if rng.random_range(1..=3) == 1 {
                    0
                } else {
                    damage
                }
            }
            BuffKind::Weakened { extra } => damage + extra,
        }
    }

    /// Hook run at the start of the holder's turn.
    pub fn on_turn(&mut self) {
        if self.hot > 0 {
            self.hot -= 1;
        } else {
            self.remaining -= 1;
        }
    }

    /// Whether the buff has run out.
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0
    }
}
