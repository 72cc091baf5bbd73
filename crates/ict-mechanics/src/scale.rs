//! Re-deriving a monster's stats at another challenge rating.
//!
//! Two policies, chosen per stat:
//! - **Offset** (armor class, attack bonus, save DC): keep the distance from
//!   the tier baseline. A monster 2 AC above its tier stays 2 AC above.
//! - **Range** (hit points, damage): keep the fractional position inside
//!   the tier's min-max range. Positions outside `[0, 1]` are kept as-is.
//!
//! Every result is floored at 1.

use std::ops::RangeInclusive;

use crate::cr::ChallengeRating;
use crate::error::ScaleError;
use crate::monster::{Monster, MonsterStats};
use crate::table::{ReferenceRow, ReferenceTable};

/// Scales monsters using one reference table.
#[derive(Debug, Clone, Copy)]
pub struct Scaler<'a> {
    table: &'a ReferenceTable,
}

impl<'a> Scaler<'a> {
    /// Create a scaler over the given table.
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    /// Produce a new monster at `target_cr`.
    ///
    /// Fails with [`ScaleError::InvalidChallengeRating`] if either the
    /// monster's rating or the target has no row. The source monster is
    /// never modified.
    pub fn scale(&self, monster: &Monster, target_cr: ChallengeRating) -> Result<Monster, ScaleError> {
        let source = self.lookup(monster.cr())?;
        let target = self.lookup(target_cr)?;

        let stats = MonsterStats {
            challenge_rating: target.challenge_rating,
            armor_class: scale_offset(monster.ac(), source.expected_ac, target.expected_ac),
            hit_points: scale_range(monster.hp(), source.hp_range(), target.hp_range()),
            attack_bonus: scale_offset(
                monster.atk_bonus(),
                source.expected_attack_bonus,
                target.expected_attack_bonus,
            ),
            damage: scale_range(monster.damage(), source.damage_range(), target.damage_range()),
            save_dc: monster
                .save_dc()
                .map(|dc| scale_offset(dc, source.expected_save_dc, target.expected_save_dc)),
        };

        Monster::new(self.table, stats).map_err(ScaleError::from)
    }

    fn lookup(&self, cr: ChallengeRating) -> Result<&'a ReferenceRow, ScaleError> {
        self.table
            .get(cr)
            .ok_or(ScaleError::InvalidChallengeRating(cr))
    }
}

/// Scale a monster using the standard reference table.
pub fn scale_monster(monster: &Monster, target_cr: ChallengeRating) -> Result<Monster, ScaleError> {
    Scaler::new(ReferenceTable::standard()).scale(monster, target_cr)
}

fn scale_offset(value: i64, source_expected: i64, target_expected: i64) -> i64 {
    let offset = value.saturating_sub(source_expected);
    target_expected.saturating_add(offset).max(1)
}

/// `target.min + t * (target.max - target.min)` where `t` is the position of
/// `value` in `source`, truncated toward zero. Evaluated as one exact
/// integer division so that scaling into the same range returns `value`.
fn scale_range(value: i64, source: RangeInclusive<i64>, target: RangeInclusive<i64>) -> i64 {
    let (source_min, source_max) = (i128::from(*source.start()), i128::from(*source.end()));
    let (target_min, target_max) = (i128::from(*target.start()), i128::from(*target.end()));

    let source_span = source_max - source_min;
    debug_assert!(source_span > 0, "reference ranges are validated non-empty");

    let numerator = target_min.saturating_mul(source_span).saturating_add(
        (i128::from(value) - source_min).saturating_mul(target_max - target_min),
    );
    let scaled = (numerator / source_span).max(1);

    i64::try_from(scaled).unwrap_or(i64::MAX)
}
