//! Game identifiers.
//!
//! A game id is 4 uppercase alphanumeric characters, generated client-side
//! at creation time and shared out-of-band for the second player to join.
//! There is no collision detection against existing ids.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a game id in characters.
pub const GAME_ID_LEN: usize = 4;

/// Characters a game id may contain.
pub const GAME_ID_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A validated game identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Generate a fresh id from the given RNG.
    #[must_use]
    pub fn generate(rng: &mut impl Rng) -> Self {
        let alphabet = GAME_ID_ALPHABET.as_bytes();
        let id: String = (0..GAME_ID_LEN)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();
        GameId(id)
    }

    /// Parse a user-supplied id, validating length and alphabet.
    pub fn parse(value: &str) -> Result<Self, GameIdError> {
        if value.len() != GAME_ID_LEN {
            return Err(GameIdError::InvalidLength {
                expected: GAME_ID_LEN,
                found: value.len(),
            });
        }
        for (index, ch) in value.chars().enumerate() {
            if !GAME_ID_ALPHABET.contains(ch) {
                return Err(GameIdError::InvalidCharacter { ch, index });
            }
        }
        Ok(GameId(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for GameId {
    type Err = GameIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// A game id failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameIdError {
    InvalidLength { expected: usize, found: usize },
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for GameIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameIdError::InvalidLength { expected, found } => {
                write!(f, "game id must be {expected} chars, got {found}")
            }
            GameIdError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character '{ch}' at position {index}")
            }
        }
    }
}

impl std::error::Error for GameIdError {}
