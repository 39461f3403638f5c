use wl_core::SpeechProducer;
use wl_story::{Chapter, StoryContext, StoryResult};

pub const TITLE: &str = "Chapter Two";

pub fn chapter() -> Chapter {
    Chapter::new(2, TITLE, start)
}

fn start(ctx: &StoryContext) -> StoryResult<()> {
    let aki = ctx.speaker("Aki")?;
    let chloe = ctx.speaker("Chloe")?;

    aki.speak("mow :3")?;
    chloe.speak("Yes.")?;

    let won = ctx
        .manager()
        .persistent::<bool>("false_beginnings.won_ambush")
        .unwrap_or(false);
    if won {
        chloe.think("Vell hasn't said a word since the fight.")?;
    } else {
        aki.speak("My head still hurts...")?;
    }
    Ok(())
}
