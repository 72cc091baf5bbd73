//! Error types for monster validation, scaling, and reference tables.

use crate::cr::ChallengeRating;
use crate::monster::StatField;

/// Text that could not be read as a challenge rating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid challenge rating: \"{0}\"")]
pub struct ParseChallengeRatingError(
    /// The offending input text.
    pub String,
);

/// Errors raised while turning a raw stat block into a [`Monster`](crate::Monster).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonsterValidationError {
    /// The challenge rating has no row in the reference table.
    #[error("invalid challenge rating: {0}")]
    UnknownChallengeRating(ChallengeRating),

    /// A stat was supplied as something other than an integer.
    #[error("{field} must be an integer, got {value}")]
    NotAnInteger {
        /// The stat being validated.
        field: StatField,
        /// The rejected value as it was written.
        value: String,
    },

    /// A stat was zero or negative.
    #[error("{field} must be greater than 0, got {value}")]
    NotPositive {
        /// The stat being validated.
        field: StatField,
        /// The rejected value.
        value: i64,
    },

    /// A required stat was absent.
    #[error("{0} is required")]
    MissingField(StatField),

    /// The challenge rating could not be parsed at all.
    #[error(transparent)]
    ChallengeRating(#[from] ParseChallengeRatingError),

    /// A JSON stat block was not an object.
    #[error("monster stats must be a JSON object")]
    NotAnObject,
}

/// Errors raised while scaling a monster to another challenge rating.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    /// The source or target rating has no row in the reference table.
    #[error("invalid challenge rating: {0}")]
    InvalidChallengeRating(ChallengeRating),

    /// The rescaled stats failed validation.
    #[error(transparent)]
    Validation(#[from] MonsterValidationError),
}

/// Errors raised while building a reference table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table has no rows.
    #[error("reference table is empty")]
    Empty,

    /// Two rows share a challenge rating.
    #[error("duplicate row for challenge rating {0}")]
    DuplicateRating(ChallengeRating),

    /// A min/max range has no width, so positions inside it are undefined.
    #[error("challenge rating {rating}: {column} range {min}-{max} is empty")]
    DegenerateRange {
        /// The row with the bad range.
        rating: ChallengeRating,
        /// Which range ("hit point" or "damage").
        column: &'static str,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// The table source was not valid JSON.
    #[error("invalid reference table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for reference table construction.
pub type TableResult<T> = Result<T, TableError>;
