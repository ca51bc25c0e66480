// Passbox password generation.
//
// Draws independent uniform characters from the 62-character
// alphanumeric alphabet. `rand::rng()` is a CSPRNG, so the output is
// suitable for real credentials. There is no repetition avoidance and
// no guarantee that every character class appears.

use rand::Rng;

/// The alphabet passwords are drawn from: `a-z`, `A-Z`, `0-9`.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default password length.
pub const DEFAULT_LENGTH: usize = 15;

/// Generate a random password of exactly `length` characters,
/// concatenated in draw order. `random_range` keeps each draw uniform
/// over the alphabet (no modulo bias).
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
