//! The bundled chapters.

mod chapter_two;
mod false_beginnings;

use wl_story::ChapterRegistry;

/// Every chapter shipped with the game.
pub fn registry() -> ChapterRegistry {
    let mut registry = ChapterRegistry::new();
    registry.register(false_beginnings::chapter());
    registry.register(chapter_two::chapter());
    registry
}
