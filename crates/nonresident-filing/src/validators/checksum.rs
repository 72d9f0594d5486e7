//! Mod-23 checksum primitives shared by the tax-ID and cadastral validators.

/// Positional weights for the cadastral control characters.
pub const POSITION_WEIGHTS: [u32; 11] = [13, 15, 12, 5, 4, 17, 9, 21, 3, 7, 1];

/// Control alphabet indexed by the weighted cadastral checksum.
pub const CONTROL_LETTERS: &[u8; 23] = b"MQWERTYUIOPASDFGHJKLBZX";

/// Check-letter alphabet for NIF/NIE bodies (`body mod 23`).
pub const DNI_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Numeric value of an identifier character.
///
/// Digits map to themselves, `A..=N` to `1..=14` and `O..=Z` to `16..=27`. Nothing maps
/// to 15. Any other byte is worth 0.
pub const fn char_value(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'A'..=b'N' => (c - b'A') as u32 + 1,
        b'O'..=b'Z' => (c - b'A') as u32 + 2,
        _ => 0,
    }
}

/// Weighted sum of `sequence` modulo 23.
///
/// Weights are applied from index 0 of `weights` and the walk stops at whichever of the
/// two slices is shorter.
pub fn weighted_checksum(sequence: &[u8], weights: &[u32]) -> usize {
    sequence
        .iter()
        .zip(weights)
        .fold(0u32, |sum, (&c, &weight)| {
            (sum + (char_value(c) * weight) % 23) % 23
        }) as usize
}

/// Control letter for `sequence` under [`POSITION_WEIGHTS`].
pub fn control_letter(sequence: &[u8]) -> char {
    char::from(CONTROL_LETTERS[weighted_checksum(sequence, &POSITION_WEIGHTS)])
}

/// Letter of `alphabet` at `value mod 23`.
pub fn mod23_letter(value: u32, alphabet: &[u8; 23]) -> char {
    char::from(alphabet[(value % 23) as usize])
}
