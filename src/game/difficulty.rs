use std::fmt;

use rand::Rng;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// Policy deciding which value a freshly spawned tile receives.
///
/// Written out by name (`two_or_four`); read back from either the name or
/// the numeric level (`2`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Every new tile is a 2.
    #[value(alias = "1")]
    AlwaysTwo,
    /// 2 or 4 with equal probability.
    #[default]
    #[value(alias = "2")]
    TwoOrFour,
    /// 2 with probability 2/3, 4 with probability 1/3.
    #[value(alias = "3")]
    TwoWeighted,
}

const NAMES: &[&str] = &["always_two", "two_or_four", "two_weighted"];

/// Draw pool for `TwoWeighted`: one uniform pick gives 2 twice as often as 4.
const WEIGHTED_POOL: [u32; 3] = [2, 2, 4];

impl Difficulty {
    /// Numeric level (1..=3) as shown to players.
    pub fn level(self) -> u8 {
        match self {
            Difficulty::AlwaysTwo => 1,
            Difficulty::TwoOrFour => 2,
            Difficulty::TwoWeighted => 3,
        }
    }

    /// Look up a difficulty by its numeric level.
    pub fn from_level(level: u8) -> Option<Difficulty> {
        match level {
            1 => Some(Difficulty::AlwaysTwo),
            2 => Some(Difficulty::TwoOrFour),
            3 => Some(Difficulty::TwoWeighted),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::AlwaysTwo => "Always 2",
            Difficulty::TwoOrFour => "2 or 4",
            Difficulty::TwoWeighted => "2 (2/3) or 4 (1/3)",
        }
    }

    /// Sample the value of a new tile under this policy.
    pub fn sample_tile<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        match self {
            Difficulty::AlwaysTwo => 2,
            Difficulty::TwoOrFour => {
                if rng.random_bool(0.5) {
                    2
                } else {
                    4
                }
            }
            Difficulty::TwoWeighted => WEIGHTED_POOL[rng.random_range(0..WEIGHTED_POOL.len())],
        }
    }
}

struct DifficultyVisitor;

impl<'de> Visitor<'de> for DifficultyVisitor {
    type Value = Difficulty;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a difficulty name or a level from 1 to 3")
    }

    fn visit_u64<E: de::Error>(self, level: u64) -> Result<Difficulty, E> {
        u8::try_from(level)
            .ok()
            .and_then(Difficulty::from_level)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(level), &self))
    }

    fn visit_i64<E: de::Error>(self, level: i64) -> Result<Difficulty, E> {
        u8::try_from(level)
            .ok()
            .and_then(Difficulty::from_level)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(level), &self))
    }

    fn visit_str<E: de::Error>(self, name: &str) -> Result<Difficulty, E> {
        match name {
            "always_two" => Ok(Difficulty::AlwaysTwo),
            "two_or_four" => Ok(Difficulty::TwoOrFour),
            "two_weighted" => Ok(Difficulty::TwoWeighted),
            _ => Err(E::unknown_variant(name, NAMES)),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DifficultyVisitor)
    }
}
