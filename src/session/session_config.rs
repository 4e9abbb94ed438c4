use crate::game_state::chess_types::Color;
use crate::utils::room_code::{DEFAULT_ROOM_CODE_LENGTH, ROOM_CODE_ALPHABET};

pub const ROOM_CODE_LENGTH_ENV: &str = "DUEL_ROOM_CODE_LENGTH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub room_code_length: usize,
    pub room_code_alphabet: &'static [u8],
    /// Colour of the seat that moves first; the room creator always holds it.
    pub first_to_move: Color,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room_code_length: DEFAULT_ROOM_CODE_LENGTH,
            room_code_alphabet: ROOM_CODE_ALPHABET,
            first_to_move: Color::White,
        }
    }
}

impl SessionConfig {
    /// Defaults, with `DUEL_ROOM_CODE_LENGTH` applied when it holds a
    /// positive integer.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(length) = std::env::var(ROOM_CODE_LENGTH_ENV)
            .ok()
            .and_then(|raw| parse_code_length(&raw).ok())
        {
            config.room_code_length = length;
        }
        config
    }
}

pub fn parse_code_length(raw: &str) -> Result<usize, String> {
    let length = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid room code length '{raw}': {e}"))?;
    if length == 0 {
        return Err("room code length must be positive".to_owned());
    }
    Ok(length)
}
