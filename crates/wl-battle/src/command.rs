//! Player commands typed during a battle.

use tracing::debug;

use crate::battle::{Battle, Side};
use crate::error::BattleError;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleCommand {
    /// `attack <name>`: use an attack on the highlighted combatant.
    Attack(String),
    /// `skip`: end the turn without acting.
    Skip,
    /// `view`: inspect the highlighted combatant.
    View,
    /// Anything else.
    Unknown(String),
}

impl BattleCommand {
    /// Parse a line; `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        Some(match cmd.as_str() {
            "attack" if !rest.is_empty() => Self::Attack(rest.to_string()),
            "skip" => Self::Skip,
            "view" => Self::View,
            _ => Self::Unknown(trimmed.to_string()),
        })
    }
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The turn was used and has passed on.
    Acted,
    /// Open the inspection view for this roster index.
    View(usize),
    /// Nothing happened; the reason is on the status line.
    Rejected,
}

impl Battle {
    /// Run a player command for the current combatant against the
    /// highlighted roster index.
    ///
    /// Typos and illegal targets never fail the battle: they are reported on
    /// the status line and the turn stays with the player.
    pub fn execute(&mut self, command: &BattleCommand, selected: usize) -> CommandOutcome {
        match command {
            BattleCommand::Attack(name) => self.player_attack(name, selected),
            BattleCommand::Skip => {
                self.next_turn();
                CommandOutcome::Acted
            }
            BattleCommand::View => CommandOutcome::View(selected),
            BattleCommand::Unknown(line) => {
                self.set_display(format!("Unknown command '{line}'"), 2.0);
                CommandOutcome::Rejected
            }
        }
    }

    fn player_attack(&mut self, name: &str, selected: usize) -> CommandOutcome {
        let attacker = self.turn();
        if self.side_of(attacker) != Side::Allies {
            return CommandOutcome::Rejected;
        }
        let whom = match self.combatant(selected) {
            Ok(whom) => whom,
            Err(e) => {
                self.set_display(e.to_string(), 2.0);
                return CommandOutcome::Rejected;
            }
        };
        if !whom.is_alive() {
            let text = format!("'{}' is already down!", whom.name);
            self.set_display(text, 2.0);
            return CommandOutcome::Rejected;
        }
        let whom = whom.name.clone();

        let attack = match self.current().get_attack(name) {
            Ok(attack) => attack.clone(),
            Err(_) => {
                self.set_display(format!("No such attack '{name}'!"), 2.0);
                return CommandOutcome::Rejected;
            }
        };

        match self.attack(selected, attacker, &attack) {
            Ok(_) => {
                let by = &self.current().name;
                let text = format!("'{by} ({attacker})' uses '{}' on '{whom}'!", attack.name);
                self.set_display(text, 2.0);
                self.next_turn();
                CommandOutcome::Acted
            }
            Err(e @ BattleError::InvalidTarget { .. }) => {
                self.set_display(e.to_string(), 3.0);
                CommandOutcome::Rejected
            }
            Err(e) => {
                debug!(error = %e, "attack rejected");
                self.set_display(e.to_string(), 2.0);
                CommandOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{Attack, TargetClass};
    use crate::unit::BattleCharacter;
    use wl_core::Sex;

    fn battle() -> Battle {
        let hero = BattleCharacter::new("Aki", Sex::Male, 10).with_attacks(vec![
            Attack::new("Heavy Swing", "", 4, TargetClass::Foe),
            Attack::new("Mend", "", -1, TargetClass::Ally),
        ]);
        let foes = vec![
            BattleCharacter::new("Lurker", Sex::Female, 6),
            BattleCharacter::new("Lurker", Sex::Female, 0),
        ];
        Battle::new(vec![hero], foes).unwrap().with_seed(5)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(BattleCommand::parse("   "), None);
        assert_eq!(
            BattleCommand::parse("attack Heavy Swing"),
            Some(BattleCommand::Attack("Heavy Swing".into()))
        );
        assert_eq!(BattleCommand::parse("SKIP"), Some(BattleCommand::Skip));
        assert_eq!(BattleCommand::parse("view"), Some(BattleCommand::View));
        assert_eq!(
            BattleCommand::parse("attack"),
            Some(BattleCommand::Unknown("attack".into()))
        );
        assert_eq!(
            BattleCommand::parse("dance"),
            Some(BattleCommand::Unknown("dance".into()))
        );
    }

    #[test]
    fn attack_with_multiword_name() {
        let mut battle = battle();
        let cmd = BattleCommand::parse("attack heavy swing").unwrap();
        assert_eq!(battle.execute(&cmd, 1), CommandOutcome::Acted);
        assert_eq!(battle.roster()[1].hitpoints, 2);
        assert_eq!(battle.turn(), 1);
        assert!(battle.display().is_some_and(|m| m.text.contains("Heavy Swing")));
    }

    #[test]
    fn downed_target_is_a_message() {
        let mut battle = battle();
        let cmd = BattleCommand::Attack("Heavy Swing".into());
        assert_eq!(battle.execute(&cmd, 2), CommandOutcome::Rejected);
        assert_eq!(battle.turn(), 0);
        assert!(battle.display().is_some_and(|m| m.text.contains("already down")));
    }

    #[test]
    fn unknown_attack_is_a_message() {
        let mut battle = battle();
        let cmd = BattleCommand::Attack("Fireball".into());
        assert_eq!(battle.execute(&cmd, 1), CommandOutcome::Rejected);
        assert!(battle.display().is_some_and(|m| m.text == "No such attack 'Fireball'!"));
    }

    #[test]
    fn wrong_side_is_a_longer_message() {
        let mut battle = battle();
        let cmd = BattleCommand::Attack("Mend".into());
        assert_eq!(battle.execute(&cmd, 1), CommandOutcome::Rejected);
        let message = battle.display().unwrap();
        assert!((message.remaining - 3.0).abs() < f64::EPSILON);
        assert_eq!(battle.roster()[1].hitpoints, 6);
    }

    #[test]
    fn skip_and_view() {
        let mut battle = battle();
        assert_eq!(battle.execute(&BattleCommand::View, 1), CommandOutcome::View(1));
        assert_eq!(battle.turn(), 0);
        assert_eq!(battle.execute(&BattleCommand::Skip, 1), CommandOutcome::Acted);
        assert_eq!(battle.turn(), 1);
    }
}
