use std::path::Path;

use comfy_table::{CellAlignment, ContentArrangement, Table};

pub fn run(path: Option<&Path>) -> Result<(), String> {
    let reference = super::load_table(path)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "CR", "XP", "Prof", "AC", "HP", "Attack", "Damage", "Save DC",
    ]);

    for row in reference.rows() {
        table.add_row(vec![
            row.challenge_rating.to_string(),
            row.xp.to_string(),
            format!("+{}", row.proficiency_bonus),
            row.expected_ac.to_string(),
            format!("{}-{}", row.hp_min, row.hp_max),
            format!("+{}", row.expected_attack_bonus),
            format!("{}-{}", row.damage_min, row.damage_max),
            row.expected_save_dc.to_string(),
        ]);
    }

    for index in 0..8 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("{table}");
    println!();
    println!("  {} challenge ratings", reference.len());

    Ok(())
}
