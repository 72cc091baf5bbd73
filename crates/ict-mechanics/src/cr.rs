//! Challenge ratings.
//!
//! A challenge rating is a difficulty tier. Most tiers are whole numbers,
//! but the lowest ones are fractions (1/8, 1/4, 1/2), so the value is held
//! as a finite `f64` and compared exactly.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseChallengeRatingError;

/// A monster's difficulty tier.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeRating(pub(crate) f64);

impl ChallengeRating {
    /// Wrap a rating value. Returns `None` for NaN or infinite values.
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // -0.0 and 0.0 must select the same row
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// A whole-number rating.
    pub fn whole(value: u32) -> Self {
        Self(f64::from(value))
    }

    /// A fractional rating such as 1/8. Returns `None` when `den` is zero.
    pub fn fraction(num: u32, den: u32) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Self::new(f64::from(num) / f64::from(den))
    }

    /// The numeric value of this rating.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for ChallengeRating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ChallengeRating {}

impl PartialOrd for ChallengeRating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChallengeRating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ChallengeRating {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.fract() == 0.0 {
            return write!(f, "{value:.0}");
        }
        if value > 0.0 && value < 1.0 {
            for den in [2u32, 4, 8] {
                let num = value * f64::from(den);
                if num.fract() == 0.0 {
                    return write!(f, "{num:.0}/{den}");
                }
            }
        }
        write!(f, "{value}")
    }
}

impl FromStr for ChallengeRating {
    type Err = ParseChallengeRatingError;

    /// Accepts `"5"`, `"0.5"`, and fractions like `"1/8"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseChallengeRatingError(s.trim().to_string());
        let text = s.trim();

        let value = match text.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.trim().parse().map_err(|_| err())?;
                let den: f64 = den.trim().parse().map_err(|_| err())?;
                if den == 0.0 {
                    return Err(err());
                }
                num / den
            }
            None => text.parse().map_err(|_| err())?,
        };

        Self::new(value).ok_or_else(err)
    }
}

impl Serialize for ChallengeRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for ChallengeRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => {
                Self::new(n).ok_or_else(|| D::Error::custom(format!("invalid challenge rating: {n}")))
            }
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}
