//! Battle state machine.
//!
//! The roster is the allies followed by the foes, in the order given; turn
//! order follows the roster and wraps. Every turn advance ticks the buffs of
//! the combatant whose turn begins.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::attack::Attack;
use crate::error::{BattleError, BattleResult};
use crate::unit::BattleCharacter;

/// Which side a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The player's party.
    Allies,
    /// The opposition.
    Foes,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Allies => Self::Foes,
            Self::Foes => Self::Allies,
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every ally is down.
    AlliesDefeated,
    /// Every foe is down.
    FoesDefeated,
}

impl Outcome {
    /// Numeric result: 0 for a loss, 1 for a win.
    pub fn code(self) -> u8 {
        match self {
            Self::AlliesDefeated => 0,
            Self::FoesDefeated => 1,
        }
    }

    /// Whether the player's side won.
    pub fn is_victory(self) -> bool {
        self == Self::FoesDefeated
    }
}

/// The transient status line.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    /// Message text.
    pub text: String,
    /// Seconds left on screen.
    pub remaining: f64,
}

/// What the turn policy did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStep {
    /// A living ally is up; the player chooses.
    Player,
    /// A foe is up but a message is still showing.
    Waiting,
    /// A foe acted (or was skipped) and the turn passed on.
    FoeActed,
}

/// An encounter in progress.
#[derive(Debug, Clone)]
pub struct Battle {
    roster: Vec<BattleCharacter>,
    ally_count: usize,
    turn: usize,
    turn_number: u32,
    display: Option<DisplayMessage>,
    rng: StdRng,
}

impl Battle {
    /// Start a battle; both sides need at least one combatant.
    pub fn new(allies: Vec<BattleCharacter>, foes: Vec<BattleCharacter>) -> BattleResult<Self> {
        if allies.is_empty() || foes.is_empty() {
            return Err(BattleError::EmptySide);
        }
        let ally_count = allies.len();
        let mut roster = allies;
        roster.extend(foes);
        Ok(Self {
            roster,
            ally_count,
            turn: 0,
            turn_number: 1,
            display: None,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Use a fixed RNG seed for reproducible foe behaviour and buff rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Reseed in place.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Every combatant, allies first.
    pub fn roster(&self) -> &[BattleCharacter] {
        &self.roster
    }

    /// The player's party.
    pub fn allies(&self) -> &[BattleCharacter] {
        &self.roster[..self.ally_count]
    }

    /// The opposition.
    pub fn foes(&self) -> &[BattleCharacter] {
        &self.roster[self.ally_count..]
    }

    /// Combatant at a roster index.
    pub fn combatant(&self, index: usize) -> BattleResult<&BattleCharacter> {
        self.roster.get(index).ok_or(BattleError::NoCombatant(index))
    }

    /// Side of the combatant at a roster index.
    pub fn side_of(&self, index: usize) -> Side {
        if index < self.ally_count {
            Side::Allies
        } else {
            Side::Foes
        }
    }

    /// Roster indices of one side.
    pub fn side_indices(&self, side: Side) -> std::ops::Range<usize> {
        match side {
            Side::Allies => 0..self.ally_count,
            Side::Foes => self.ally_count..self.roster.len(),
        }
    }

    /// Roster index of the combatant whose turn it is.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// One-based count of turns taken so far.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// The combatant whose turn it is.
    pub fn current(&self) -> &BattleCharacter {
        &self.roster[self.turn]
    }

    /// First foe with this name.
    pub fn find_foe(&self, name: &str) -> BattleResult<&BattleCharacter> {
        self.foes()
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| BattleError::NoSuchFoe(name.to_string()))
    }

    /// Pass the turn to the next combatant and tick their buffs.
    pub fn next_turn(&mut self) {
        self.turn = (self.turn + 1) % self.roster.len();
        self.turn_number += 1;
        self.roster[self.turn].tick_buffs();
    }

    /// Use `attack` from `attacker` on `target`.
    ///
    /// Single-target classes must aim at the matching side; whole-side classes
    /// hit every member of that side regardless of `target`. Returns the roster
    /// indices that were hit.
    pub fn attack(
        &mut self,
        target: usize,
        attacker: usize,
        attack: &Attack,
    ) -> BattleResult<Vec<usize>> {
        let by = self.combatant(attacker)?;
        let whom = self.combatant(target)?;

        if !by.attacks.contains(attack) {
            return Err(BattleError::AttackNotOwned {
                attack: attack.name.clone(),
                character: by.name.clone(),
            });
        }

        let same_side = self.side_of(target) == self.side_of(attacker);
        if same_side != attack.target.own_side() {
            return Err(BattleError::InvalidTarget {
                attack: attack.name.clone(),
                attacker: by.name.clone(),
                target: whom.name.clone(),
                class: attack.target.to_string(),
            });
        }

        let hit: Vec<usize> = if attack.target.hits_all() {
            self.side_indices(self.side_of(target)).collect()
        } else {
            vec![target]
        };

        for buff in &mut self.roster[attacker].buffs {
            buff.on_attack();
        }
        for &index in &hit {
            let unit = &mut self.roster[index];
            let taken = unit.damage(attack.damage, &mut self.rng);
            if let Some(buff) = &attack.buff {
                unit.add_buff(buff);
            }
            debug!(defender = %unit.name, attack = %attack.name, taken, hp = unit.hitpoints, "hit");
        }

        Ok(hit)
    }

    /// Whether a side has been wiped out. Allies are checked first.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.allies().iter().all(|a| !a.is_alive()) {
            Some(Outcome::AlliesDefeated)
        } else if self.foes().iter().all(|f| !f.is_alive()) {
            Some(Outcome::FoesDefeated)
        } else {
            None
        }
    }

    /// Show a message for `seconds`.
    pub fn set_display(&mut self, text: impl Into<String>, seconds: f64) {
        self.display = Some(DisplayMessage {
            text: text.into(),
            remaining: seconds,
        });
    }

    /// Count the message down by `delta` seconds and return it if still up.
    ///
    /// With no delta the message is treated as expired.
    pub fn get_display(&mut self, delta: Option<f64>) -> Option<DisplayMessage> {
        let expired = match (delta, self.display.as_mut()) {
            (Some(dt), Some(message)) => {
                message.remaining -= dt;
                message.remaining <= 0.0
            }
            _ => true,
        };
        if expired {
            self.display = None;
        }
        self.display.clone()
    }

    /// The current message without counting it down.
    pub fn display(&self) -> Option<&DisplayMessage> {
        self.display.as_ref()
    }

    /// Whether a message is showing.
    pub fn display_active(&self) -> bool {
        self.display.is_some()
    }

    /// Run the automatic part of the turn policy.
    ///
    /// Downed allies are skipped silently, all within this call. A living foe
    /// attacks once no message is showing; a downed foe or one with nothing
    /// usable is skipped with a message.
    pub fn step(&mut self) -> TurnStep {
        let mut skipped = 0;
        while self.side_of(self.turn) == Side::Allies && !self.current().is_alive() {
            if skipped >= self.roster.len() {
                return TurnStep::Waiting;
            }
            self.next_turn();
            skipped += 1;
        }

        if self.side_of(self.turn) == Side::Allies {
            return TurnStep::Player;
        }
        if self.display_active() {
            return TurnStep::Waiting;
        }

        let index = self.turn;
        let name = self.current().name.clone();
        if !self.current().is_alive() {
            self.set_display(format!("'{name} ({index})' skipped!"), 1.0);
        } else {
            match self.foe_action(index) {
                Some((target, attack)) => match self.attack(target, index, &attack) {
                    Ok(_) => {
                        let whom = &self.roster[target].name;
                        let text = format!("'{name} ({index})' uses '{}' on '{whom}'!", attack.name);
                        self.set_display(text, 2.0);
                    }
                    Err(e) => {
                        warn!(error = %e, "foe attack rejected");
                        self.set_display(format!("'{name} ({index})' falters!"), 1.0);
                    }
                },
                None => self.set_display(format!("'{name} ({index})' has nothing to do!"), 1.0),
            }
        }
        self.next_turn();
        TurnStep::FoeActed
    }

    fn foe_action(&mut self, index: usize) -> Option<(usize, Attack)> {
        let attacks = &self.roster[index].attacks;
        if attacks.is_empty() {
            return None;
        }
        let attack = attacks[self.rng.random_range(0..attacks.len())].clone();

        let side = if attack.target.own_side() {
            self.side_of(index)
        } else {
            self.side_of(index).opposite()
        };
        let living: Vec<usize> = self
            .side_indices(side)
            .filter(|&i| self.roster[i].is_alive())
            .collect();
        if living.is_empty() {
            return None;
        }
        let target = living[self.rng.random_range(0..living.len())];
        Some((target, attack))
    }
}
