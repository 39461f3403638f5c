use comfy_table::{ContentArrangement, Table};

use crate::chapters;

pub fn run() -> Result<(), String> {
    let registry = chapters::registry();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Title", "Sections"]);

    for chapter in registry.chapters() {
        let sections: Vec<&str> = chapter.section_names().collect();
        let sections = if sections.is_empty() {
            "-".to_string()
        } else {
            sections.join(", ")
        };
        table.add_row(vec![
            chapter.number().to_string(),
            chapter.title().to_string(),
            sections,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} chapters", registry.chapters().len());

    Ok(())
}
