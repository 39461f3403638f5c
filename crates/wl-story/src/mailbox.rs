//! Hand-off of battles from the story thread to the render loop.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::debug;
use wl_battle::{Battle, Outcome};
use wl_core::sync::lock;

/// How often a story thread waiting on a battle rechecks the slot.
pub const BATTLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A finished battle.
#[derive(Debug, Clone)]
pub struct BattleReport {
    /// Which side won.
    pub outcome: Outcome,
    /// Final state, for survivors' hitpoints and such.
    pub battle: Battle,
}

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Idle,
    Requested(Box<Battle>),
    Running,
    Finished(Box<BattleReport>),
}

/// Single-battle mailbox shared by both threads.
#[derive(Debug, Default)]
pub struct BattleSlot {
    state: Mutex<SlotState>,
}

impl BattleSlot {
    /// Create an idle slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Story side: post a battle for the render loop to run.
    pub fn request(&self, battle: Battle) {
        debug!(combatants = battle.roster().len(), "battle requested");
        *lock(&self.state) = SlotState::Requested(Box::new(battle));
    }

    /// Story side: block until the posted battle has been fought.
    pub fn wait_result(&self) -> BattleReport {
        loop {
            {
                let mut state = lock(&self.state);
                match std::mem::take(&mut *state) {
                    SlotState::Finished(report) => return *report,
                    other => *state = other,
                }
            }
            thread::sleep(BATTLE_POLL_INTERVAL);
        }
    }

    /// Render side: take a pending battle, if any.
    pub fn take_request(&self) -> Option<Battle> {
        let mut state = lock(&self.state);
        match std::mem::take(&mut *state) {
            SlotState::Requested(battle) => {
                *state = SlotState::Running;
                Some(*battle)
            }
            other => {
                *state = other;
                None
            }
        }
    }

    /// Render side: hand the result back to the story.
    pub fn finish(&self, report: BattleReport) {
        debug!(outcome = ?report.outcome, "battle finished");
        *lock(&self.state) = SlotState::Finished(Box::new(report));
    }

    /// Whether a battle is posted or being fought.
    pub fn is_busy(&self) -> bool {
        matches!(
            *lock(&self.state),
            SlotState::Requested(_) | SlotState::Running
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wl_battle::{Attack, BattleCharacter, TargetClass};
    use wl_core::Sex;

    fn battle() -> Battle {
        let hero = BattleCharacter::new("Aki", Sex::Male, 10)
            .with_attacks(vec![Attack::new("Punch", "", 10, TargetClass::Foe)]);
        let foe = BattleCharacter::new("Lurker", Sex::Female, 10);
        Battle::new(vec![hero], vec![foe]).unwrap().with_seed(1)
    }

    #[test]
    fn idle_slot_has_nothing() {
        let slot = BattleSlot::new();
        assert!(slot.take_request().is_none());
        assert!(!slot.is_busy());
    }

    #[test]
    fn story_waits_for_render_side() {
        let slot = Arc::new(BattleSlot::new());
        let story = Arc::clone(&slot);
        let handle = thread::spawn(move || {
            story.request(battle());
            story.wait_result()
        });

        let mut fought = loop {
            if let Some(b) = slot.take_request() {
                break b;
            }
            thread::sleep(Duration::from_millis(5));
        };
        assert!(slot.is_busy());
        assert!(slot.take_request().is_none());

        let punch = fought.current().attacks[0].clone();
        fought.attack(1, 0, &punch).unwrap();
        let outcome = fought.outcome().unwrap();
        slot.finish(BattleReport {
            outcome,
            battle: fought,
        });

        let report = handle.join().unwrap();
        assert!(report.outcome.is_victory());
        assert_eq!(report.battle.roster()[1].hitpoints, 0);
        assert!(!slot.is_busy());
    }
}
