//! The interactive menu: pick a tool, answer prompts, see the result.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use ict_mechanics::{
    ChallengeRating, Monster, MonsterStats, ReferenceTable, Scaler, StatField, parse_stat,
};
use ict_sketch::process_images;

use super::sketch::{SketchDirs, write_report};

#[derive(Args)]
pub struct MenuArgs {
    #[command(flatten)]
    pub dirs: SketchDirs,

    /// Custom reference table (JSON array of rows)
    #[arg(long)]
    pub table: Option<PathBuf>,
}

const SCALE_PROMPTS: [&str; 7] = [
    "  Challenge Rating: ",
    "  Armor Class: ",
    "  Hit Points: ",
    "  Attack Bonus: ",
    "  Damage/Round: ",
    "  Save DC (or Enter to skip): ",
    "\n  Target CR: ",
];

pub fn run(args: &MenuArgs) -> Result<(), String> {
    let table = super::load_table(args.table.as_deref())?;
    let stdin = io::stdin();
    let mut session = Session {
        input: stdin.lock(),
        out: io::stdout().lock(),
        table: &table,
        dirs: &args.dirs,
    };
    session.run().map_err(|e| format!("terminal error: {e}"))
}

struct Session<'a, R, W> {
    input: R,
    out: W,
    table: &'a ReferenceTable,
    dirs: &'a SketchDirs,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "=== Iradeh Campaign Tools ===")?;
            writeln!(self.out)?;
            writeln!(self.out, "  1. Scale monster")?;
            writeln!(self.out, "  2. Process sketch images")?;
            writeln!(self.out, "  0. Exit")?;

            let Some(choice) = self.ask("\n> ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "0" => return Ok(()),
                "1" => self.scale_monster()?,
                "2" => self.process_sketches()?,
                _ => writeln!(self.out, "Invalid choice.")?,
            }
            writeln!(self.out)?;
        }
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn scale_monster(&mut self) -> io::Result<()> {
        writeln!(self.out, "Enter monster stats:")?;
        writeln!(self.out)?;

        let mut answers = Vec::with_capacity(SCALE_PROMPTS.len());
        for prompt in SCALE_PROMPTS {
            match self.ask(prompt)? {
                Some(answer) => answers.push(answer),
                None => return Ok(()),
            }
        }

        match scale_from_answers(self.table, &answers) {
            Ok(scaled) => {
                writeln!(self.out)?;
                writeln!(self.out, "  Scaled to CR {}:", scaled.cr())?;
                writeln!(self.out, "{}", super::monster_table(&scaled))?;
            }
            Err(message) => writeln!(self.out, "  error: {message}")?,
        }
        Ok(())
    }

    fn process_sketches(&mut self) -> io::Result<()> {
        let Some(force) = self.ask("Force reprocess all? (y/N) > ")? else {
            return Ok(());
        };
        let Some(invert) = self.ask("Invert colors? (y/N) > ")? else {
            return Ok(());
        };

        let config = self.dirs.config(is_yes(&force), is_yes(&invert));
        match process_images(&config) {
            Ok(report) => write_report(&mut self.out, &report),
            Err(e) => writeln!(self.out, "  error: {e}"),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}

/// Validate the seven prompt answers and scale the monster.
fn scale_from_answers(table: &ReferenceTable, answers: &[String]) -> Result<Monster, String> {
    let [cr, ac, hp, atk, damage, save_dc, target] = answers else {
        return Err(format!("expected {} answers", SCALE_PROMPTS.len()));
    };

    let rating = |text: &str| text.parse::<ChallengeRating>().map_err(|e| e.to_string());
    let stat = |field: StatField, text: &str| parse_stat(field, text).map_err(|e| e.to_string());

    let stats = MonsterStats {
        challenge_rating: rating(cr)?,
        armor_class: stat(StatField::ArmorClass, ac)?,
        hit_points: stat(StatField::HitPoints, hp)?,
        attack_bonus: stat(StatField::AttackBonus, atk)?,
        damage: stat(StatField::Damage, damage)?,
        save_dc: if save_dc.is_empty() {
            None
        } else {
            Some(stat(StatField::SaveDc, save_dc)?)
        },
    };

    let monster = Monster::new(table, stats).map_err(|e| e.to_string())?;
    Scaler::new(table)
        .scale(&monster, rating(target)?)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(values: [&str; 7]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn session_output(input: &str) -> String {
        let dirs = SketchDirs {
            source: PathBuf::from("does/not/exist"),
            output: PathBuf::from("does/not/exist/either"),
            threshold: ict_sketch::DEFAULT_THRESHOLD,
        };
        let mut out = Vec::new();
        let mut session = Session {
            input: input.as_bytes(),
            out: &mut out,
            table: ReferenceTable::standard(),
            dirs: &dirs,
        };
        session.run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn scales_from_answers() {
        let scaled = scale_from_answers(
            ReferenceTable::standard(),
            &answers(["1", "15", "78", "5", "11", "15", "5"]),
        )
        .unwrap();
        assert_eq!(scaled.ac(), 17);
        assert_eq!(scaled.hp(), 138);
        assert_eq!(scaled.atk_bonus(), 8);
        assert_eq!(scaled.damage(), 35);
        assert_eq!(scaled.save_dc(), Some(17));
        assert_eq!(scaled.xp(), 1800);
    }

    #[test]
    fn blank_save_dc_is_absent() {
        let scaled = scale_from_answers(
            ReferenceTable::standard(),
            &answers(["1/2", "13", "60", "3", "7", "", "1"]),
        )
        .unwrap();
        assert_eq!(scaled.save_dc(), None);
        assert_eq!(scaled.xp(), 200);
    }

    #[test]
    fn bad_answers_report_field() {
        let err = scale_from_answers(
            ReferenceTable::standard(),
            &answers(["1", "3.5", "78", "5", "11", "", "5"]),
        )
        .unwrap_err();
        assert_eq!(err, "Armor class must be an integer, got 3.5");

        let err = scale_from_answers(
            ReferenceTable::standard(),
            &answers(["1", "15", "78", "5", "11", "", "0.3"]),
        )
        .unwrap_err();
        assert_eq!(err, "invalid challenge rating: 0.3");
    }

    #[test]
    fn menu_scales_then_exits() {
        let out = session_output("1\n1\n15\n78\n5\n11\n\n5\n0\n");
        assert!(out.contains("Scaled to CR 5:"), "{out}");
        assert!(out.contains("Armor class"));
        assert!(out.contains("1800"));
    }

    #[test]
    fn menu_reports_invalid_choice() {
        let out = session_output("9\n0\n");
        assert!(out.contains("Invalid choice."));
    }

    #[test]
    fn menu_stops_at_end_of_input() {
        let out = session_output("1\n1\n");
        assert!(out.contains("Enter monster stats:"));
        assert!(!out.contains("Scaled to CR"));
    }

    #[test]
    fn menu_reports_missing_sketch_directory() {
        let out = session_output("2\nn\nn\n0\n");
        assert!(out.contains("error: source directory not found"), "{out}");
    }

    #[test]
    fn yes_is_case_insensitive() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        assert!(!is_yes("yes"));
        assert!(!is_yes(""));
    }
}
