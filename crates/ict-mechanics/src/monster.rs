//! Raw stat blocks and validated monsters.
//!
//! [`MonsterStats`] is whatever the caller typed in. [`Monster`] is the
//! checked value: its rating has a reference row, every combat stat is a
//! positive integer, and XP and proficiency bonus come from the table.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::cr::ChallengeRating;
use crate::error::{MonsterValidationError, ParseChallengeRatingError};
use crate::table::ReferenceTable;

/// The fields of a stat block that are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    /// The monster's challenge rating.
    ChallengeRating,
    /// Armor class.
    ArmorClass,
    /// Hit points.
    HitPoints,
    /// Attack bonus.
    AttackBonus,
    /// Damage per round.
    Damage,
    /// Save DC.
    SaveDc,
}

impl StatField {
    /// Human-readable name used in messages and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::ChallengeRating => "Challenge rating",
            Self::ArmorClass => "Armor class",
            Self::HitPoints => "Hit points",
            Self::AttackBonus => "Attack bonus",
            Self::Damage => "Damage",
            Self::SaveDc => "Save DC",
        }
    }

    /// Key used for this field in JSON stat blocks.
    pub fn key(self) -> &'static str {
        match self {
            Self::ChallengeRating => "challenge_rating",
            Self::ArmorClass => "armor_class",
            Self::HitPoints => "hit_points",
            Self::AttackBonus => "attack_bonus",
            Self::Damage => "damage",
            Self::SaveDc => "save_dc",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unvalidated stat block.
///
/// Deserializing goes through [`MonsterStats::from_json`], so serde input
/// gets the same integer checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonsterStats {
    /// Challenge rating; must match a reference row.
    pub challenge_rating: ChallengeRating,
    /// Armor class.
    pub armor_class: i64,
    /// Hit points.
    pub hit_points: i64,
    /// Attack bonus.
    pub attack_bonus: i64,
    /// Damage per round.
    pub damage: i64,
    /// Save DC, if the monster forces saves at all.
    pub save_dc: Option<i64>,
}

impl MonsterStats {
    /// Read a stat block from a JSON object.
    ///
    /// Numbers must be written as integers: `3.5` and `3.0` are both
    /// rejected with [`MonsterValidationError::NotAnInteger`]. A missing or
    /// `null` `save_dc` means the monster has none.
    pub fn from_json(value: &Value) -> Result<Self, MonsterValidationError> {
        let object = value
            .as_object()
            .ok_or(MonsterValidationError::NotAnObject)?;

        let required = |field: StatField| {
            integer_field(object, field)?.ok_or(MonsterValidationError::MissingField(field))
        };

        Ok(Self {
            challenge_rating: rating_field(object)?,
            armor_class: required(StatField::ArmorClass)?,
            hit_points: required(StatField::HitPoints)?,
            attack_bonus: required(StatField::AttackBonus)?,
            damage: required(StatField::Damage)?,
            save_dc: integer_field(object, StatField::SaveDc)?,
        })
    }
}

impl<'de> Deserialize<'de> for MonsterStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn rating_field(object: &Map<String, Value>) -> Result<ChallengeRating, MonsterValidationError> {
    match object.get(StatField::ChallengeRating.key()) {
        None | Some(Value::Null) => Err(MonsterValidationError::MissingField(
            StatField::ChallengeRating,
        )),
        Some(Value::String(text)) => Ok(text.parse()?),
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(ChallengeRating::new)
            .ok_or_else(|| ParseChallengeRatingError(n.to_string()).into()),
        Some(other) => Err(ParseChallengeRatingError(other.to_string()).into()),
    }
}

fn integer_field(
    object: &Map<String, Value>,
    field: StatField,
) -> Result<Option<i64>, MonsterValidationError> {
    match object.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| MonsterValidationError::NotAnInteger {
                field,
                value: n.to_string(),
            }),
        Some(other) => Err(MonsterValidationError::NotAnInteger {
            field,
            value: other.to_string(),
        }),
    }
}

/// Parse one integer stat from user input.
///
/// Only the integer check happens here; positivity is checked by
/// [`Monster::new`] so that `"-1"` and `"3.5"` fail with different errors.
pub fn parse_stat(field: StatField, text: &str) -> Result<i64, MonsterValidationError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| MonsterValidationError::NotAnInteger {
            field,
            value: text.to_string(),
        })
}

/// A validated monster. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Monster {
    cr: ChallengeRating,
    xp: u32,
    proficiency_bonus: i64,
    ac: i64,
    hp: i64,
    atk_bonus: i64,
    damage: i64,
    save_dc: Option<i64>,
}

impl Monster {
    /// Validate a stat block against a reference table.
    pub fn new(table: &ReferenceTable, stats: MonsterStats) -> Result<Self, MonsterValidationError> {
        let row = table
            .get(stats.challenge_rating)
            .ok_or(MonsterValidationError::UnknownChallengeRating(
                stats.challenge_rating,
            ))?;

        Ok(Self {
            cr: row.challenge_rating,
            xp: row.xp,
            proficiency_bonus: row.proficiency_bonus,
            ac: ensure_positive(StatField::ArmorClass, stats.armor_class)?,
            hp: ensure_positive(StatField::HitPoints, stats.hit_points)?,
            atk_bonus: ensure_positive(StatField::AttackBonus, stats.attack_bonus)?,
            damage: ensure_positive(StatField::Damage, stats.damage)?,
            save_dc: stats
                .save_dc
                .map(|dc| ensure_positive(StatField::SaveDc, dc))
                .transpose()?,
        })
    }

    /// Challenge rating.
    pub fn cr(&self) -> ChallengeRating {
        self.cr
    }

    /// Experience awarded, from the reference row.
    pub fn xp(&self) -> u32 {
        self.xp
    }

    /// Proficiency bonus, from the reference row.
    pub fn proficiency_bonus(&self) -> i64 {
        self.proficiency_bonus
    }

    /// Armor class.
    pub fn ac(&self) -> i64 {
        self.ac
    }

    /// Hit points.
    pub fn hp(&self) -> i64 {
        self.hp
    }

    /// Attack bonus.
    pub fn atk_bonus(&self) -> i64 {
        self.atk_bonus
    }

    /// Damage per round.
    pub fn damage(&self) -> i64 {
        self.damage
    }

    /// Save DC, if any.
    pub fn save_dc(&self) -> Option<i64> {
        self.save_dc
    }

    /// The stat block this monster was built from.
    pub fn to_stats(&self) -> MonsterStats {
        MonsterStats {
            challenge_rating: self.cr,
            armor_class: self.ac,
            hit_points: self.hp,
            attack_bonus: self.atk_bonus,
            damage: self.damage,
            save_dc: self.save_dc,
        }
    }
}

fn ensure_positive(field: StatField, value: i64) -> Result<i64, MonsterValidationError> {
    if value <= 0 {
        return Err(MonsterValidationError::NotPositive { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: [StatField; 5] = [
        StatField::ArmorClass,
        StatField::HitPoints,
        StatField::AttackBonus,
        StatField::Damage,
        StatField::SaveDc,
    ];

    fn base_stats() -> MonsterStats {
        MonsterStats {
            challenge_rating: ChallengeRating::whole(1),
            armor_class: 13,
            hit_points: 75,
            attack_bonus: 4,
            damage: 10,
            save_dc: Some(13),
        }
    }

    fn with_field(field: StatField, value: i64) -> MonsterStats {
        let mut stats = base_stats();
        match field {
            StatField::ArmorClass => stats.armor_class = value,
            StatField::HitPoints => stats.hit_points = value,
            StatField::AttackBonus => stats.attack_bonus = value,
            StatField::Damage => stats.damage = value,
            StatField::SaveDc => stats.save_dc = Some(value),
            StatField::ChallengeRating => unreachable!(),
        }
        stats
    }

    fn build(stats: MonsterStats) -> Result<Monster, MonsterValidationError> {
        Monster::new(ReferenceTable::standard(), stats)
    }

    #[test]
    fn derives_rating_values_from_table() {
        let monster = build(base_stats()).unwrap();
        assert_eq!(monster.cr(), ChallengeRating::whole(1));
        assert_eq!(monster.xp(), 200);
        assert_eq!(monster.proficiency_bonus(), 2);
        assert_eq!(monster.ac(), 13);
        assert_eq!(monster.hp(), 75);
        assert_eq!(monster.atk_bonus(), 4);
        assert_eq!(monster.damage(), 10);
        assert_eq!(monster.save_dc(), Some(13));
    }

    #[test]
    fn unknown_rating_rejected() {
        let mut stats = base_stats();
        stats.challenge_rating = ChallengeRating::whole(999);
        let err = build(stats).unwrap_err();
        assert_eq!(
            err,
            MonsterValidationError::UnknownChallengeRating(ChallengeRating::whole(999))
        );
        assert_eq!(err.to_string(), "invalid challenge rating: 999");
    }

    #[test]
    fn zero_rejected() {
        for field in FIELDS {
            let err = build(with_field(field, 0)).unwrap_err();
            assert_eq!(err, MonsterValidationError::NotPositive { field, value: 0 });
        }
    }

    #[test]
    fn negative_rejected() {
        for field in FIELDS {
            let err = build(with_field(field, -1)).unwrap_err();
            assert_eq!(err, MonsterValidationError::NotPositive { field, value: -1 });
        }
    }

    #[test]
    fn error_names_field() {
        let err = build(with_field(StatField::ArmorClass, -1)).unwrap_err();
        assert_eq!(err.to_string(), "Armor class must be greater than 0, got -1");
    }

    #[test]
    fn missing_save_dc_is_valid() {
        let mut stats = base_stats();
        stats.save_dc = None;
        let monster = build(stats).unwrap();
        assert_eq!(monster.save_dc(), None);
    }

    #[test]
    fn to_stats_round_trips() {
        let stats = base_stats();
        assert_eq!(build(stats).unwrap().to_stats(), stats);
    }

    #[test]
    fn parse_stat_rejects_fractions() {
        let err = parse_stat(StatField::ArmorClass, "3.5").unwrap_err();
        assert_eq!(
            err,
            MonsterValidationError::NotAnInteger {
                field: StatField::ArmorClass,
                value: "3.5".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Armor class must be an integer, got 3.5");
    }

    #[test]
    fn parse_stat_leaves_sign_to_validation() {
        assert_eq!(parse_stat(StatField::HitPoints, " -1 ").unwrap(), -1);
        assert_eq!(parse_stat(StatField::HitPoints, "42").unwrap(), 42);
        assert!(parse_stat(StatField::HitPoints, "lots").is_err());
    }

    #[test]
    fn json_block_parses() {
        let stats = MonsterStats::from_json(&json!({
            "challenge_rating": "1/2",
            "armor_class": 12,
            "hit_points": 60,
            "attack_bonus": 3,
            "damage": 7,
        }))
        .unwrap();
        assert_eq!(stats.challenge_rating, ChallengeRating::fraction(1, 2).unwrap());
        assert_eq!(stats.save_dc, None);
        assert_eq!(build(stats).unwrap().xp(), 100);
    }

    #[test]
    fn json_rejects_float_typed_stats() {
        for field in [
            StatField::ArmorClass,
            StatField::HitPoints,
            StatField::AttackBonus,
            StatField::Damage,
        ] {
            let mut block = json!({
                "challenge_rating": 1,
                "armor_class": 13,
                "hit_points": 75,
                "attack_bonus": 4,
                "damage": 10,
            });
            block[field.key()] = json!(3.5);
            let err = MonsterStats::from_json(&block).unwrap_err();
            assert!(
                matches!(err, MonsterValidationError::NotAnInteger { field: f, .. } if f == field),
                "{field}: {err}"
            );
        }
    }

    #[test]
    fn json_rejects_whole_floats() {
        let block = json!({
            "challenge_rating": 1,
            "armor_class": 13.0,
            "hit_points": 75,
            "attack_bonus": 4,
            "damage": 10,
        });
        let err = MonsterStats::from_json(&block).unwrap_err();
        assert_eq!(err.to_string(), "Armor class must be an integer, got 13.0");
    }

    #[test]
    fn json_rejects_strings_and_missing_fields() {
        let err = MonsterStats::from_json(&json!({
            "challenge_rating": 1,
            "armor_class": "13",
            "hit_points": 75,
            "attack_bonus": 4,
            "damage": 10,
        }))
        .unwrap_err();
        assert!(matches!(err, MonsterValidationError::NotAnInteger { .. }));

        let err = MonsterStats::from_json(&json!({"challenge_rating": 1})).unwrap_err();
        assert_eq!(err, MonsterValidationError::MissingField(StatField::ArmorClass));

        let err = MonsterStats::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err, MonsterValidationError::NotAnObject);
    }

    #[test]
    fn serde_applies_integer_checks() {
        let err = serde_json::from_str::<MonsterStats>(
            r#"{"challenge_rating": 1, "armor_class": 13.0, "hit_points": 75,
                "attack_bonus": 4, "damage": 10}"#,
        )
        .unwrap_err();
        assert!(
            err.to_string().contains("Armor class must be an integer, got 13.0"),
            "{err}"
        );

        let stats = base_stats();
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(serde_json::from_str::<MonsterStats>(&json).unwrap(), stats);
    }
}
