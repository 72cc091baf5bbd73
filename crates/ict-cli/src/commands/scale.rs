use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use ict_mechanics::{ChallengeRating, Monster, MonsterStats, Scaler, StatField, parse_stat};
use tracing::debug;

#[derive(Args)]
pub struct ScaleArgs {
    /// Current challenge rating (e.g. 1/4, 0.5, 3)
    #[arg(long, allow_hyphen_values = true)]
    pub cr: ChallengeRating,

    /// Armor class
    #[arg(long, allow_hyphen_values = true)]
    pub ac: String,

    /// Hit points
    #[arg(long, allow_hyphen_values = true)]
    pub hp: String,

    /// Attack bonus
    #[arg(long, allow_hyphen_values = true)]
    pub attack: String,

    /// Damage per round
    #[arg(long, allow_hyphen_values = true)]
    pub damage: String,

    /// Save DC (omit if the monster forces no saves)
    #[arg(long, allow_hyphen_values = true)]
    pub save_dc: Option<String>,

    /// Target challenge rating
    #[arg(long, allow_hyphen_values = true)]
    pub to: ChallengeRating,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Custom reference table (JSON array of rows)
    #[arg(long)]
    pub table: Option<PathBuf>,
}

pub fn run(args: &ScaleArgs) -> Result<(), String> {
    let table = super::load_table(args.table.as_deref())?;

    let stat = |field: StatField, text: &str| parse_stat(field, text).map_err(|e| e.to_string());
    let stats = MonsterStats {
        challenge_rating: args.cr,
        armor_class: stat(StatField::ArmorClass, &args.ac)?,
        hit_points: stat(StatField::HitPoints, &args.hp)?,
        attack_bonus: stat(StatField::AttackBonus, &args.attack)?,
        damage: stat(StatField::Damage, &args.damage)?,
        save_dc: args
            .save_dc
            .as_deref()
            .map(|text| stat(StatField::SaveDc, text))
            .transpose()?,
    };

    let monster = Monster::new(&table, stats).map_err(|e| e.to_string())?;
    let scaled = Scaler::new(&table)
        .scale(&monster, args.to)
        .map_err(|e| e.to_string())?;
    debug!(from = %monster.cr(), to = %scaled.cr(), "scaled monster");

    if args.json {
        let json = serde_json::to_string_pretty(&scaled)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!("  {} {}", "Scaled to CR".bold(), scaled.cr());
    println!();
    println!("{}", super::monster_table(&scaled));
    Ok(())
}
