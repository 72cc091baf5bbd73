//! Monster statistics for Iradeh campaign preparation.
//!
//! Provides the challenge-rating reference table, validation of raw stat
//! blocks into [`Monster`] values, and a [`Scaler`] that re-derives a
//! monster's stats at a different challenge rating. Everything here is a
//! pure function of its inputs and the immutable [`ReferenceTable`].

pub mod cr;
pub mod error;
pub mod monster;
pub mod scale;
pub mod table;

pub use cr::ChallengeRating;
pub use error::{
    MonsterValidationError, ParseChallengeRatingError, ScaleError, TableError, TableResult,
};
pub use monster::{Monster, MonsterStats, StatField, parse_stat};
pub use scale::{Scaler, scale_monster};
pub use table::{ReferenceRow, ReferenceTable};
