//! The monster statistics reference table.
//!
//! One row per challenge rating, holding the baselines a monster of that
//! tier is expected to have. Lookups are exact: a rating without a row is
//! an error, never an approximation.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::cr::ChallengeRating;
use crate::error::{TableError, TableResult};

/// Expected combat statistics for one challenge rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// The tier this row describes.
    pub challenge_rating: ChallengeRating,
    /// Experience awarded for defeating a monster of this tier.
    pub xp: u32,
    /// Proficiency bonus for this tier.
    pub proficiency_bonus: i64,
    /// Baseline armor class.
    pub expected_ac: i64,
    /// Baseline attack bonus.
    pub expected_attack_bonus: i64,
    /// Baseline save DC.
    pub expected_save_dc: i64,
    /// Lowest hit points for this tier.
    pub hp_min: i64,
    /// Highest hit points for this tier.
    pub hp_max: i64,
    /// Lowest damage per round for this tier.
    pub damage_min: i64,
    /// Highest damage per round for this tier.
    pub damage_max: i64,
}

impl ReferenceRow {
    /// Hit point range for this tier.
    pub fn hp_range(&self) -> RangeInclusive<i64> {
        self.hp_min..=self.hp_max
    }

    /// Damage-per-round range for this tier.
    pub fn damage_range(&self) -> RangeInclusive<i64> {
        self.damage_min..=self.damage_max
    }
}

macro_rules! rows {
    ($($cr:expr => $xp:expr, $pb:expr, $ac:expr, $hp_min:expr, $hp_max:expr, $atk:expr, $dmg_min:expr, $dmg_max:expr, $dc:expr;)*) => {
        &[$(ReferenceRow {
            challenge_rating: ChallengeRating($cr),
            xp: $xp,
            proficiency_bonus: $pb,
            expected_ac: $ac,
            expected_attack_bonus: $atk,
            expected_save_dc: $dc,
            hp_min: $hp_min,
            hp_max: $hp_max,
            damage_min: $dmg_min,
            damage_max: $dmg_max,
        }),*]
    };
}

/// Monster Statistics by Challenge Rating (5th edition).
#[rustfmt::skip]
const STANDARD_ROWS: &[ReferenceRow] = rows![
//   CR        XP      PB  AC  HP         ATK DMG        DC
    0.0   =>      10,  2, 13,   1,   6,  3,   0,   1, 13;
    0.125 =>      25,  2, 13,   7,  35,  3,   2,   3, 13;
    0.25  =>      50,  2, 13,  36,  49,  3,   4,   5, 13;
    0.5   =>     100,  2, 13,  50,  70,  3,   6,   8, 13;
    1.0   =>     200,  2, 13,  71,  85,  3,   9,  14, 13;
    2.0   =>     450,  2, 13,  86, 100,  3,  15,  20, 13;
    3.0   =>     700,  2, 13, 101, 115,  4,  21,  26, 13;
    4.0   =>    1100,  2, 14, 116, 130,  5,  27,  32, 14;
    5.0   =>    1800,  3, 15, 131, 145,  6,  33,  38, 15;
    6.0   =>    2300,  3, 15, 146, 160,  6,  39,  44, 15;
    7.0   =>    2900,  3, 15, 161, 175,  6,  45,  50, 15;
    8.0   =>    3900,  3, 16, 176, 190,  7,  51,  56, 16;
    9.0   =>    5000,  4, 16, 191, 205,  7,  57,  62, 16;
    10.0  =>    5900,  4, 17, 206, 220,  7,  63,  68, 16;
    11.0  =>    7200,  4, 17, 221, 235,  8,  69,  74, 17;
    12.0  =>    8400,  4, 17, 236, 250,  8,  75,  80, 17;
    13.0  =>   10000,  5, 18, 251, 265,  8,  81,  86, 18;
    14.0  =>   11500,  5, 18, 266, 280,  8,  87,  92, 18;
    15.0  =>   13000,  5, 18, 281, 295,  8,  93,  98, 18;
    16.0  =>   15000,  5, 18, 296, 310,  9,  99, 104, 18;
    17.0  =>   18000,  6, 19, 311, 325, 10, 105, 110, 19;
    18.0  =>   20000,  6, 19, 326, 340, 10, 111, 116, 19;
    19.0  =>   22000,  6, 19, 341, 355, 10, 117, 122, 19;
    20.0  =>   25000,  6, 19, 356, 400, 10, 123, 140, 19;
    21.0  =>   33000,  7, 19, 401, 445, 11, 141, 158, 20;
    22.0  =>   41000,  7, 19, 446, 490, 11, 159, 176, 20;
    23.0  =>   50000,  7, 19, 491, 535, 11, 177, 194, 20;
    24.0  =>   62000,  7, 19, 536, 580, 12, 195, 212, 21;
    25.0  =>   75000,  8, 19, 581, 625, 12, 213, 230, 21;
    26.0  =>   90000,  8, 19, 626, 670, 12, 231, 248, 21;
    27.0  =>  105000,  8, 19, 671, 715, 13, 249, 266, 22;
    28.0  =>  120000,  8, 19, 716, 760, 13, 267, 284, 22;
    29.0  =>  135000,  9, 19, 761, 805, 13, 285, 302, 22;
    30.0  =>  155000,  9, 19, 806, 850, 14, 303, 320, 23;
];

static STANDARD: LazyLock<ReferenceTable> = LazyLock::new(|| ReferenceTable {
    rows: STANDARD_ROWS
        .iter()
        .map(|row| (row.challenge_rating, *row))
        .collect(),
});

/// An immutable lookup from challenge rating to its reference row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    rows: BTreeMap<ChallengeRating, ReferenceRow>,
}

impl ReferenceTable {
    /// The built-in table covering CR 0 through CR 30.
    pub fn standard() -> &'static ReferenceTable {
        &STANDARD
    }

    /// Build a table from custom rows.
    ///
    /// Rejects an empty row set, duplicate ratings, and rows whose hit
    /// point or damage range has no width.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> TableResult<Self> {
        let mut map = BTreeMap::new();
        for row in rows {
            check_range(&row, "hit point", row.hp_min, row.hp_max)?;
            check_range(&row, "damage", row.damage_min, row.damage_max)?;
            match map.entry(row.challenge_rating) {
                Entry::Occupied(_) => return Err(TableError::DuplicateRating(row.challenge_rating)),
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }
        if map.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { rows: map })
    }

    /// Parse a JSON array of rows. Ratings may be numbers or fraction strings.
    pub fn from_json(json: &str) -> TableResult<Self> {
        let rows: Vec<ReferenceRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Exact-match lookup.
    pub fn get(&self, cr: ChallengeRating) -> Option<&ReferenceRow> {
        self.rows.get(&cr)
    }

    /// Rows in ascending rating order.
    pub fn rows(&self) -> impl Iterator<Item = &ReferenceRow> {
        self.rows.values()
    }

    /// Every rating that has a row, ascending.
    pub fn ratings(&self) -> impl Iterator<Item = ChallengeRating> + '_ {
        self.rows.keys().copied()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn check_range(row: &ReferenceRow, column: &'static str, min: i64, max: i64) -> TableResult<()> {
    if max <= min {
        return Err(TableError::DegenerateRange {
            rating: row.challenge_rating,
            column,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cr(s: &str) -> ChallengeRating {
        s.parse().unwrap()
    }

    #[test]
    fn standard_has_every_tier() {
        let table = ReferenceTable::standard();
        assert_eq!(table.len(), 34);
        assert!(table.get(cr("0")).is_some());
        assert!(table.get(cr("30")).is_some());
    }

    #[test]
    fn standard_rows_pass_validation() {
        let rebuilt = ReferenceTable::from_rows(STANDARD_ROWS.iter().copied()).unwrap();
        assert_eq!(&rebuilt, ReferenceTable::standard());
    }

    #[test]
    fn cr_maps_to_xp() {
        let table = ReferenceTable::standard();
        for (rating, xp) in [("1/8", 25), ("1/4", 50), ("1/2", 100), ("1", 200), ("2", 450)] {
            assert_eq!(table.get(cr(rating)).unwrap().xp, xp, "CR {rating}");
        }
    }

    #[test]
    fn cr_one_baselines() {
        let row = ReferenceTable::standard().get(cr("1")).unwrap();
        assert_eq!(row.proficiency_bonus, 2);
        assert_eq!(row.expected_ac, 13);
        assert_eq!(row.expected_attack_bonus, 3);
        assert_eq!(row.expected_save_dc, 13);
        assert_eq!(row.hp_range(), 71..=85);
        assert_eq!(row.damage_range(), 9..=14);
    }

    #[test]
    fn cr_five_baselines() {
        let row = ReferenceTable::standard().get(cr("5")).unwrap();
        assert_eq!(row.xp, 1800);
        assert_eq!(row.proficiency_bonus, 3);
        assert_eq!(row.expected_ac, 15);
        assert_eq!(row.expected_attack_bonus, 6);
        assert_eq!(row.hp_range(), 131..=145);
        assert_eq!(row.damage_range(), 33..=38);
    }

    #[test]
    fn lookup_is_exact() {
        let table = ReferenceTable::standard();
        assert!(table.get(cr("0.3")).is_none());
        assert!(table.get(cr("31")).is_none());
        assert!(table.get(cr("1.0000001")).is_none());
    }

    #[test]
    fn rows_are_ascending() {
        let ratings: Vec<_> = ReferenceTable::standard().ratings().collect();
        let mut sorted = ratings.clone();
        sorted.sort();
        assert_eq!(ratings, sorted);
        assert_eq!(ratings[1], cr("1/8"));
    }

    fn sample_row(rating: &str) -> ReferenceRow {
        ReferenceRow {
            challenge_rating: cr(rating),
            xp: 10,
            proficiency_bonus: 2,
            expected_ac: 12,
            expected_attack_bonus: 3,
            expected_save_dc: 12,
            hp_min: 1,
            hp_max: 10,
            damage_min: 1,
            damage_max: 4,
        }
    }

    #[test]
    fn from_rows_rejects_duplicates() {
        let err = ReferenceTable::from_rows([sample_row("1"), sample_row("1")]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateRating(r) if r == cr("1")));
    }

    #[test]
    fn from_rows_rejects_empty() {
        let err = ReferenceTable::from_rows(Vec::new()).unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn from_rows_rejects_degenerate_ranges() {
        let mut row = sample_row("2");
        row.damage_max = row.damage_min;
        let err = ReferenceTable::from_rows([row]).unwrap_err();
        assert_eq!(err.to_string(), "challenge rating 2: damage range 1-1 is empty");
    }

    #[test]
    fn from_json_accepts_fraction_strings() {
        let json = r#"[
            {"challenge_rating": "1/2", "xp": 100, "proficiency_bonus": 2,
             "expected_ac": 13, "expected_attack_bonus": 3, "expected_save_dc": 13,
             "hp_min": 50, "hp_max": 70, "damage_min": 6, "damage_max": 8},
            {"challenge_rating": 1, "xp": 200, "proficiency_bonus": 2,
             "expected_ac": 13, "expected_attack_bonus": 3, "expected_save_dc": 13,
             "hp_min": 71, "hp_max": 85, "damage_min": 9, "damage_max": 14}
        ]"#;
        let table = ReferenceTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(cr("0.5")).unwrap().xp, 100);
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let err = ReferenceTable::from_json("{not json").unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }
}
