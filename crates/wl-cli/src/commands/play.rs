use std::sync::Arc;

use tracing::{error, info};
use wl_core::Manager;
use wl_story::LogPresence;
use wl_tui::{Engine, EngineError, Start};

use crate::settings::Settings;
use crate::{chapters, logging};

pub fn run(settings: &Settings, start: Start) -> Result<(), String> {
    let config = settings.engine_config()?;
    let save_path = settings.save_path(None)?;
    let log_dir = match settings.data_dir() {
        Ok(dir) => dir.to_path_buf(),
        Err(_) => save_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    let _guard = logging::init(&log_dir)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        save = %save_path.display(),
        ?start,
        "game started"
    );
    let engine = Engine::new(config, Manager::new(save_path), Arc::new(LogPresence));

    match engine.run(&chapters::registry(), start) {
        Ok(()) => {
            info!("game closed");
            Ok(())
        }
        Err(EngineError::Interrupted) => {
            info!("interrupted by the player");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "game stopped");
            Err(e.to_string())
        }
    }
}
