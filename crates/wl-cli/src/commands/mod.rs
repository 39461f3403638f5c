pub mod chapters;
pub mod play;
pub mod save;
