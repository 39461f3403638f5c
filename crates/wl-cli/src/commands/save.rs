use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use wl_core::{AffinityTier, SaveData, SaveError, Sex};

pub fn run(path: &Path) -> Result<(), String> {
    let data = SaveData::read(path).map_err(|e| describe(&e))?;

    println!("  {} {}", "Save file".bold(), path.display());
    let section = match data.current_section.position() {
        Some((chapter, section)) => format!("{chapter} / {section}"),
        None => "(start of the game)".dimmed().to_string(),
    };
    println!("  section:    {section}");
    match data.saved_at {
        Some(at) => println!("  saved at:   {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  saved at:   {}", "unknown".dimmed()),
    }
    println!("  history:    {} lines", data.history.len());
    println!();

    if data.characters.is_empty() {
        println!("  No characters saved.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Sex", "Affinity", "Tier", "Shown as"]);
        for character in &data.characters {
            let sex = match character.sex {
                Sex::Male => "m",
                Sex::Female => "f",
            };
            table.add_row(vec![
                character.name.clone(),
                sex.to_string(),
                character.affinity.to_string(),
                AffinityTier::from_score(character.affinity).to_string(),
                character.hidden_name.clone().unwrap_or_else(|| "-".into()),
            ]);
        }
        println!("{table}");
    }
    println!();

    if data.persistent.is_empty() {
        println!("  {}", "No persistent values.".dimmed());
    } else {
        println!("  {}", "Persistent".bold());
        for (key, value) in &data.persistent {
            println!("    {key} = {value}");
        }
    }

    Ok(())
}

/// Error text for each way a save can fail to load.
fn describe(error: &SaveError) -> String {
    match error {
        SaveError::NotFound(_) => format!("{error} (start a new game to create one)"),
        SaveError::Corrupt(_) => format!("{error} (the file cannot be resumed)"),
        SaveError::MissingKey(_) => format!("{error} (the file is incomplete)"),
        SaveError::Encode(_) | SaveError::Io(_) => error.to_string(),
    }
}
