//! Combatants.

use rand::Rng;
use wl_core::{Character, Sex};

use crate::attack::Attack;
use crate::buff::Buff;
use crate::error::{BattleError, BattleResult};

/// A character taking part in a battle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleCharacter {
    /// Display name.
    pub name: String,
    /// Sex, for pronouns in battle text.
    pub sex: Sex,
    /// Remaining hitpoints; zero or below means down. Never clamped.
    pub hitpoints: i32,
    /// Attacks in menu order.
    pub attacks: Vec<Attack>,
    /// Active buffs in the order they were attached.
    pub buffs: Vec<Buff>,
}

impl BattleCharacter {
    /// Create a combatant with no attacks.
    pub fn new(name: impl Into<String>, sex: Sex, hitpoints: i32) -> Self {
        Self {
            name: name.into(),
            sex,
            hitpoints,
            attacks: Vec::new(),
            buffs: Vec::new(),
        }
    }

    /// Create a combatant for a story character.
    pub fn from_character(character: &Character, hitpoints: i32) -> Self {
        Self::new(character.name(), character.sex(), hitpoints)
    }

    /// Set the attack list.
    pub fn with_attacks(mut self, attacks: Vec<Attack>) -> Self {
        self.attacks = attacks;
        self
    }

    /// Whether the combatant is still standing.
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }

    /// Apply a hit, passing the amount through every buff in order.
    /// Returns the damage actually taken.
    pub fn damage<R: Rng + ?Sized>(&mut self, amount: i32, rng: &mut R) -> i32 {
        let taken = self
            .buffs
            .iter()
            .fold(amount, |dmg, buff| buff.on_attacked(dmg, &mut *rng));
        self.hitpoints -= taken;
        taken
    }

    /// Attach a copy of `buff`.
    pub fn add_buff(&mut self, buff: &Buff) {
        self.buffs.push(buff.clone());
    }

    /// Tick every buff and drop the expired ones.
    pub fn tick_buffs(&mut self) {
        for buff in &mut self.buffs {
            buff.on_turn();
        }
        self.buffs.retain(|buff| !buff.is_expired());
    }

    /// Look up an attack by name, falling back to a case-insensitive match.
    pub fn get_attack(&self, name: &str) -> BattleResult<&Attack> {
        self.attacks
            .iter()
            .find(|a| a.name == name)
            .or_else(|| self.attacks.iter().find(|a| a.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| BattleError::NoSuchAttack {
                character: self.name.clone(),
                attack: name.to_string(),
            })
    }
}

/// Build `count` identical non-persistent combatants.
pub fn create_units(
    name: &str,
    sex: Sex,
    hitpoints: i32,
    attacks: &[Attack],
    count: usize,
) -> Vec<BattleCharacter> {
    (0..count)
        .map(|_| BattleCharacter::new(name, sex, hitpoints).with_attacks(attacks.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::TargetClass;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn slime() -> BattleCharacter {
        BattleCharacter::new("Slime", Sex::Male, 10)
            .with_attacks(vec![Attack::new("Ooze", "", 3, TargetClass::Foe)])
    }

    #[test]
    fn damage_can_go_negative() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut unit = slime();
        unit.damage(25, &mut rng);
        assert_eq!(unit.hitpoints, -15);
        assert!(!unit.is_alive());
    }

    #[test]
    fn buffs_chain_in_order() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut unit = slime();
        unit.add_buff(&Buff::weakened(3));
        unit.add_buff(&Buff::weakened(3));
        assert_eq!(unit.damage(1, &mut rng), 5);
        assert_eq!(unit.hitpoints, 5);
    }

    #[test]
    fn buff_removed_after_its_length() {
        let mut unit = slime();
        unit.add_buff(&Buff::new("Tag", "", 2).with_hot(0));
        unit.tick_buffs();
        assert_eq!(unit.buffs.len(), 1);
        unit.tick_buffs();
        assert!(unit.buffs.is_empty());
    }

    #[test]
    fn attack_lookup_falls_back_to_case_insensitive() {
        let unit = slime();
        assert_eq!(unit.get_attack("Ooze").unwrap().damage, 3);
        assert_eq!(unit.get_attack("ooze").unwrap().damage, 3);
        assert!(matches!(
            unit.get_attack("Bite"),
            Err(BattleError::NoSuchAttack { .. })
        ));
    }

    #[test]
    fn units_are_independent() {
        let attacks = vec![Attack::new("Ooze", "", 3, TargetClass::Foe)];
        let mut units = create_units("Slime", Sex::Male, 8, &attacks, 3);
        assert_eq!(units.len(), 3);
        units[0].hitpoints = 1;
        assert_eq!(units[1].hitpoints, 8);
        assert_eq!(units[2].attacks, attacks);
    }

    #[test]
    fn story_character_becomes_combatant() {
        let aki = Character::new("Aki", "m").unwrap();
        let unit = BattleCharacter::from_character(&aki, 12);
        assert_eq!(unit.name, "Aki");
        assert_eq!(unit.hitpoints, 12);
    }
}
