//! Chapters and the ordered registry that turns them into a playlist.

use crate::context::StoryContext;
use crate::error::{StoryError, StoryResult};

/// A scene procedure run on the story thread.
pub type Scene = fn(&StoryContext) -> StoryResult<()>;

/// A chapter: an entry scene plus named sections a save can resume at.
#[derive(Debug, Clone)]
pub struct Chapter {
    number: u32,
    title: String,
    entry: Scene,
    sections: Vec<(String, Scene)>,
}

impl Chapter {
    /// Create a chapter with its entry scene.
    pub fn new(number: u32, title: impl Into<String>, entry: Scene) -> Self {
        Self {
            number,
            title: title.into(),
            entry,
            sections: Vec::new(),
        }
    }

    /// Add a resumable section.
    pub fn section(mut self, name: impl Into<String>, scene: Scene) -> Self {
        self.sections.push((name.into(), scene));
        self
    }

    /// Chapter number; chapters play in ascending order.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Chapter title, as stored in saves.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The entry scene.
    pub fn entry(&self) -> Scene {
        self.entry
    }

    /// Names of the resumable sections, in registration order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Resolve a section by name.
    pub fn find_section(&self, name: &str) -> StoryResult<Scene> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, scene)| *scene)
            .ok_or_else(|| StoryError::SectionNotFound {
                chapter: self.title.clone(),
                section: name.to_string(),
            })
    }
}

/// One scene to run, with the chapter it belongs to.
#[derive(Debug, Clone)]
pub struct Launch {
    /// Chapter number.
    pub number: u32,
    /// Chapter title.
    pub chapter: String,
    /// Section resumed at, or `None` for the entry scene.
    pub section: Option<String>,
    /// Procedure to run.
    pub scene: Scene,
}

impl Launch {
    /// Whether this launch resumes a saved position.
    pub fn is_resume(&self) -> bool {
        self.section.is_some()
    }

    /// Name for the story thread.
    pub fn thread_name(&self) -> String {
        match &self.section {
            Some(section) => format!("chapter-{}-{section}", self.number),
            None => format!("chapter-{}", self.number),
        }
    }
}

/// Every chapter of the game, ordered by number.
#[derive(Debug, Clone, Default)]
pub struct ChapterRegistry {
    chapters: Vec<Chapter>,
}

impl ChapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chapter, keeping the list ordered by number.
    pub fn register(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
        self.chapters.sort_by_key(Chapter::number);
    }

    /// Registered chapters in play order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Look up a chapter by title.
    pub fn find(&self, title: &str) -> StoryResult<&Chapter> {
        self.chapters
            .iter()
            .find(|c| c.title == title)
            .ok_or_else(|| StoryError::ChapterNotFound(title.to_string()))
    }

    /// Scenes to run, in order.
    ///
    /// Without a resume point every chapter starts from its entry. With one,
    /// earlier chapters are skipped, the saved chapter starts at the saved
    /// section and later chapters start from their entries.
    pub fn playlist(&self, resume: Option<(&str, &str)>) -> StoryResult<Vec<Launch>> {
        let from_entry = |c: &Chapter| Launch {
            number: c.number,
            chapter: c.title.clone(),
            section: None,
            scene: c.entry,
        };

        let Some((title, section)) = resume else {
            return Ok(self.chapters.iter().map(from_entry).collect());
        };

        let start = self
            .chapters
            .iter()
            .position(|c| c.title == title)
            .ok_or_else(|| StoryError::ChapterNotFound(title.to_string()))?;
        let resumed = &self.chapters[start];

        // A save made before the first section marker replays the chapter.
        let first = if section.is_empty() {
            from_entry(resumed)
        } else {
            Launch {
                number: resumed.number,
                chapter: resumed.title.clone(),
                section: Some(section.to_string()),
                scene: resumed.find_section(section)?,
            }
        };
        let mut launches = vec![first];
        launches.extend(self.chapters[start + 1..].iter().map(from_entry));
        Ok(launches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &StoryContext) -> StoryResult<()> {
        Ok(())
    }

    fn registry() -> ChapterRegistry {
        let mut registry = ChapterRegistry::new();
        registry.register(Chapter::new(2, "Second", noop).section("s1", noop));
        registry.register(Chapter::new(1, "First", noop).section("s1", noop).section("s2", noop));
        registry.register(Chapter::new(3, "Third", noop));
        registry
    }

    #[test]
    fn chapters_sorted_by_number() {
        let titles: Vec<_> = registry().chapters().iter().map(|c| c.title().to_string()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn fresh_playlist_runs_every_entry() {
        let launches = registry().playlist(None).unwrap();
        assert_eq!(launches.len(), 3);
        assert!(launches.iter().all(|l| !l.is_resume()));
        assert_eq!(launches[0].thread_name(), "chapter-1");
    }

    #[test]
    fn resume_skips_earlier_chapters() {
        let launches = registry().playlist(Some(("Second", "s1"))).unwrap();
        let shape: Vec<_> = launches
            .iter()
            .map(|l| (l.chapter.as_str(), l.section.as_deref()))
            .collect();
        assert_eq!(shape, vec![("Second", Some("s1")), ("Third", None)]);
        assert_eq!(launches[0].thread_name(), "chapter-2-s1");
    }

    #[test]
    fn unknown_section_fails() {
        assert!(matches!(
            registry().playlist(Some(("First", "s9"))),
            Err(StoryError::SectionNotFound { chapter, section }) if chapter == "First" && section == "s9"
        ));
    }

    #[test]
    fn unknown_chapter_fails() {
        assert!(matches!(
            registry().playlist(Some(("Fourth", "s1"))),
            Err(StoryError::ChapterNotFound(_))
        ));
    }

    #[test]
    fn empty_section_replays_the_chapter() {
        let launches = registry().playlist(Some(("First", ""))).unwrap();
        assert_eq!(launches.len(), 3);
        assert_eq!(launches[0].chapter, "First");
        assert!(!launches[0].is_resume());
    }

    #[test]
    fn section_names_in_order() {
        let registry = registry();
        let first = registry.find("First").unwrap();
        assert_eq!(first.section_names().collect::<Vec<_>>(), vec!["s1", "s2"]);
    }
}
