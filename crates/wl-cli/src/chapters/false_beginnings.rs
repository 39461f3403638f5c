//! Chapter one: waking up somewhere unfamiliar, and a first fight.

use wl_battle::{Attack, Battle, BattleCharacter, Buff, TargetClass, create_units};
use wl_core::{Character, ChoiceEntry, Sex, Speaker, SpeechProducer};
use wl_story::{Chapter, StoryContext, StoryResult};

pub const TITLE: &str = "False Beginnings";

pub fn chapter() -> Chapter {
    Chapter::new(1, TITLE, s1)
        .section("s1", s1)
        .section("s2", s2)
}

struct Cast {
    aki: Speaker,
    chloe: Speaker,
    narrator: Speaker,
}

impl Cast {
    /// Registration is idempotent, so every section can call this.
    fn assemble(ctx: &StoryContext) -> StoryResult<Self> {
        Ok(Self {
            aki: ctx.register(Character::new("Aki", "f")?),
            chloe: ctx.register(Character::new("Chloe", "f")?),
            narrator: ctx.register(Character::new("Narrator", "m")?.special()),
        })
    }
}

fn s1(ctx: &StoryContext) -> StoryResult<()> {
    let cast = Cast::assemble(ctx)?;
    ctx.set_section("s1")?;
    ctx.save()?;

    cast.aki.speak("Hai! :3")?;
    cast.chloe.speak("Hello, Aki!")?;
    cast.aki
        .speak("Where are we?...<w=0.6> I don't <i>recognize</i> this place.")?;
    cast.narrator
        .speak("Aki looks around nervously, wary of her new surroundings.")?;
    cast.chloe.think("She's scared. I should say something.")?;

    let answer = ctx.ask(
        &cast.chloe,
        "What should I tell her?",
        vec![
            ChoiceEntry::new("\"We'll find a way out.\"", "reassure"),
            ChoiceEntry::new("\"I'm not sure...\"", "honest"),
        ],
    )?;
    ctx.manager()
        .set_persistent("false_beginnings.first_answer", &answer)?;
    if answer == "reassure" {
        cast.aki.adjust_affinity(10);
        cast.chloe.speak("We'll find a way out. <b>Together.</b>")?;
        cast.aki.speak("...Okay.")?;
    } else {
        cast.chloe.speak("I'm not sure...")?;
        cast.aki.think("That doesn't help at all.")?;
    }

    s2(ctx)
}

fn s2(ctx: &StoryContext) -> StoryResult<()> {
    let cast = Cast::assemble(ctx)?;
    ctx.set_section("s2")?;
    ctx.save()?;

    cast.narrator.speak("Twenty days later...<w=1><s>")?;
    ctx.pause(0.5);
    let stranger = ctx.register(Character::new("Vell", "m")?.hidden_as("???"));
    stranger.speak("You two shouldn't be down here.")?;
    cast.aki.speak("Who's there?!")?;
    cast.narrator.speak("Shapes peel away from the walls.")?;

    let report = ctx.battle(ambush(&cast)?)?;
    let won = report.outcome.is_victory();
    ctx.manager()
        .set_persistent("false_beginnings.won_ambush", won)?;

    if won {
        cast.chloe.speak("That was <i>way</i> too close.")?;
        stranger.set_hidden_name(None);
        stranger.speak("Not bad. The name's Vell.")?;
        stranger.adjust_affinity(5);
    } else {
        cast.narrator.speak("Everything fades to black...")?;
        stranger.speak("Get up. They're gone.")?;
    }
    ctx.save()
}

fn ambush(cast: &Cast) -> StoryResult<Battle> {
    let slash = Attack::new("slash", "A quick cut with a kitchen knife.", 3, TargetClass::Foe);
    let trip = Attack::new("trip", "Knock a foe off balance.", 1, TargetClass::Foe)
        .with_buff(Buff::weakened(2));
    let dodge = Attack::new(
        "dodge",
        "Get ready to sidestep the next blow.",
        0,
        TargetClass::Ally,
    )
    .with_buff(Buff::evade(1));

    let allies = vec![
        BattleCharacter::from_character(cast.aki.character(), 12)
            .with_attacks(vec![slash.clone(), trip]),
        BattleCharacter::from_character(cast.chloe.character(), 10)
            .with_attacks(vec![slash, dodge]),
    ];
    let claw = Attack::new(
        "claw",
        "Shadowy talons rake at the nearest target.",
        2,
        TargetClass::Foe,
    );
    let foes = create_units("Shade", Sex::Male, 6, &[claw], 2);

    Ok(Battle::new(allies, foes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wl_core::{ChoiceMenu, Manager};
    use wl_story::{BattleSlot, LogPresence};

    #[test]
    fn ambush_pits_the_pair_against_two_shades() {
        let ctx = StoryContext::new(
            Arc::new(Manager::new("unused.json")),
            Arc::new(ChoiceMenu::new()),
            Arc::new(BattleSlot::new()),
            Arc::new(LogPresence),
        );
        let cast = Cast::assemble(&ctx).unwrap();
        let battle = ambush(&cast).unwrap();

        let names: Vec<&str> = battle.roster().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aki", "Chloe", "Shade", "Shade"]);
        assert_eq!(battle.allies().len(), 2);
        assert!(battle.roster()[0].get_attack("TRIP").is_ok());
    }

    #[test]
    fn narrator_is_not_saved() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(Manager::new(dir.path().join("save.json")));
        let ctx = StoryContext::new(
            Arc::clone(&manager),
            Arc::new(ChoiceMenu::new()),
            Arc::new(BattleSlot::new()),
            Arc::new(LogPresence),
        );
        Cast::assemble(&ctx).unwrap();
        manager.save().unwrap();

        let saved = wl_core::SaveData::read(manager.save_path()).unwrap();
        let names: Vec<&str> = saved.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aki", "Chloe"]);
    }
}
