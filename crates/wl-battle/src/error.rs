//! Error types for the battle engine.

/// Errors raised by battle operations.
#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    /// The attack is not in the attacker's attack list.
    #[error("attack '{attack}' does not belong to '{character}'")]
    AttackNotOwned {
        /// Attack name.
        attack: String,
        /// Attacker name.
        character: String,
    },

    /// The target is on the wrong side for the attack's target class.
    #[error("'{attack}' ('{attacker}') cannot target '{target}', only characters of type '{class}'")]
    InvalidTarget {
        /// Attack name.
        attack: String,
        /// Attacker name.
        attacker: String,
        /// Target name.
        target: String,
        /// The attack's target class.
        class: String,
    },

    /// The character has no attack with this name.
    #[error("'{character}' has no such attack '{attack}'")]
    NoSuchAttack {
        /// Character name.
        character: String,
        /// Requested attack name.
        attack: String,
    },

    /// No foe with this name is in the battle.
    #[error("no such foe with name '{0}'")]
    NoSuchFoe(String),

    /// A target class string other than the recognized ones.
    #[error("target '{0}' is not valid, expected 'ally', 'foe', 'all-ally' or 'all-foe'")]
    InvalidTargetClass(String),

    /// A roster index outside the battle.
    #[error("no combatant at index {0}")]
    NoCombatant(usize),

    /// A battle was created with an empty side.
    #[error("a battle needs at least one ally and one foe")]
    EmptySide,
}

/// Convenience result type for battle operations.
pub type BattleResult<T> = Result<T, BattleError>;
