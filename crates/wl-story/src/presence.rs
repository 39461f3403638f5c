//! "Now playing" status updates.
//!
//! The game reports what the player is doing on chapter launches and section
//! changes. Delivery is best effort: a failing collaborator is logged and
//! otherwise ignored.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::StoryResult;

/// Kind of activity, mirroring common rich-presence clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Playing a game.
    Playing,
    /// Listening to something.
    Listening,
    /// Watching something.
    Watching,
    /// Competing in something.
    Competing,
}

/// One status update.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    /// Activity kind.
    pub kind: ActivityKind,
    /// First line, e.g. the chapter.
    pub details: String,
    /// Second line, e.g. what the player is doing.
    pub state: String,
    /// When the activity began.
    pub started_at: DateTime<Utc>,
    /// Artwork key.
    pub image_key: String,
    /// Artwork hover text.
    pub image_caption: String,
}

const COVER_IMAGE: &str = "wlw_cover";

impl Activity {
    /// Sitting in the main menu.
    pub fn menu() -> Self {
        Self {
            kind: ActivityKind::Playing,
            details: "~~~".into(),
            state: "Main Menu".into(),
            started_at: Utc::now(),
            image_key: COVER_IMAGE.into(),
            image_caption: "What Lurks Within".into(),
        }
    }

    /// Playing a chapter, either fresh or from a save.
    pub fn chapter(number: u32, title: &str, resumed: bool) -> Self {
        let state = if resumed {
            "Continuing their story..."
        } else {
            "Writing their story..."
        };
        Self {
            kind: ActivityKind::Playing,
            details: format!("Chapter {number}: {title}"),
            state: state.into(),
            started_at: Utc::now(),
            image_key: COVER_IMAGE.into(),
            image_caption: "What Lurks Within".into(),
        }
    }
}

/// Receiver of status updates.
pub trait Presence: Send + Sync {
    /// Replace the current activity.
    fn set_activity(&self, activity: &Activity) -> StoryResult<()>;
}

/// Presence that writes every update to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresence;

impl Presence for LogPresence {
    fn set_activity(&self, activity: &Activity) -> StoryResult<()> {
        info!(
            kind = ?activity.kind,
            details = %activity.details,
            state = %activity.state,
            started_at = %activity.started_at,
            "presence updated"
        );
        Ok(())
    }
}

/// Send an update, logging instead of failing if it is rejected.
pub fn publish(presence: &dyn Presence, activity: &Activity) {
    if let Err(e) = presence.set_activity(activity) {
        warn!(error = %e, details = %activity.details, "presence update dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoryError;

    struct Offline;

    impl Presence for Offline {
        fn set_activity(&self, _: &Activity) -> StoryResult<()> {
            Err(StoryError::Presence("no client running".into()))
        }
    }

    #[test]
    fn chapter_activity_text() {
        let fresh = Activity::chapter(1, "False Beginnings", false);
        assert_eq!(fresh.details, "Chapter 1: False Beginnings");
        assert_eq!(fresh.state, "Writing their story...");
        assert_eq!(
            Activity::chapter(1, "False Beginnings", true).state,
            "Continuing their story..."
        );
        assert_eq!(Activity::menu().state, "Main Menu");
    }

    #[test]
    fn publish_tolerates_failure() {
        publish(&Offline, &Activity::menu());
        publish(&LogPresence, &Activity::menu());
    }
}
