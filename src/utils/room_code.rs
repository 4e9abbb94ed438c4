//! Random room codes.

use rand::prelude::IndexedRandom;
use rand::Rng;

/// Characters a room code is drawn from.
pub const ROOM_CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_ROOM_CODE_LENGTH: usize = 6;

/// Draw `length` characters uniformly from `alphabet`. An empty alphabet
/// yields an empty code.
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R, length: usize, alphabet: &[u8]) -> String {
    (0..length)
        .filter_map(|_| alphabet.choose(&mut *rng).map(|&byte| char::from(byte)))
        .collect()
}
