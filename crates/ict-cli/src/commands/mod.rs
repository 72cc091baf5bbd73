pub mod menu;
pub mod scale;
pub mod sketch;
pub mod table;

use std::borrow::Cow;
use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use ict_mechanics::{Monster, ReferenceTable};
use tracing::info;

/// Load a custom reference table, or fall back to the standard one.
fn load_table(path: Option<&Path>) -> Result<Cow<'static, ReferenceTable>, String> {
    let Some(path) = path else {
        return Ok(Cow::Borrowed(ReferenceTable::standard()));
    };

    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let table = ReferenceTable::from_json(&json)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "loaded reference table");
    Ok(Cow::Owned(table))
}

/// Render the eight result fields of a monster.
fn monster_table(monster: &Monster) -> Table {
    let save_dc = monster
        .save_dc()
        .map_or_else(|| "—".to_string(), |dc| dc.to_string());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec!["Challenge rating".to_string(), monster.cr().to_string()]);
    table.add_row(vec!["Armor class".to_string(), monster.ac().to_string()]);
    table.add_row(vec!["Hit points".to_string(), monster.hp().to_string()]);
    table.add_row(vec!["Attack bonus".to_string(), format!("+{}", monster.atk_bonus())]);
    table.add_row(vec!["Damage".to_string(), monster.damage().to_string()]);
    table.add_row(vec!["Save DC".to_string(), save_dc]);
    table.add_row(vec!["XP".to_string(), monster.xp().to_string()]);
    table.add_row(vec![
        "Proficiency bonus".to_string(),
        format!("+{}", monster.proficiency_bonus()),
    ]);
    table
}
