//! Turn-based battle engine for What Lurks Within.
//!
//! Combatants carry attacks and timed buffs; a [`Battle`] owns the roster,
//! the turn cursor, the transient status line and the automatic foe turn
//! policy. Player input arrives as [`BattleCommand`]s.

pub mod attack;
pub mod battle;
pub mod buff;
pub mod command;
pub mod error;
pub mod unit;

pub use attack::{Attack, TargetClass};
pub use battle::{Battle, DisplayMessage, Outcome, Side, TurnStep};
pub use buff::{Buff, BuffKind};
pub use command::{BattleCommand, CommandOutcome};
pub use error::{BattleError, BattleResult};
pub use unit::{BattleCharacter, create_units};
