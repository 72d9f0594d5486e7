use super::checksum::control_letter;
use serde::Serialize;
use std::fmt;

pub const CADASTRAL_REFERENCE_LENGTH: usize = 20;

const PARCEL: std::ops::Range<usize> = 0..7;
const SHEET: std::ops::Range<usize> = 7..14;
const SEQUENCE: std::ops::Range<usize> = 14..18;
const CONTROL: std::ops::Range<usize> = 18..20;

/// Normalized 20-character cadastral reference with verified control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CadastralReference(String);

impl CadastralReference {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_cadastral_reference(raw);
        let bytes = normalized.as_bytes();
        if !is_reference_shape(bytes, CADASTRAL_REFERENCE_LENGTH) {
            return None;
        }

        let expected = control_pair(bytes);
        (bytes[CONTROL] == expected[..]).then_some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cadastral parcel code (positions 0-6).
    pub fn parcel(&self) -> &str {
        &self.0[PARCEL]
    }

    /// Map sheet code (positions 7-13).
    pub fn sheet(&self) -> &str {
        &self.0[SHEET]
    }

    /// Property sequence number within the parcel (positions 14-17).
    pub fn sequence(&self) -> &str {
        &self.0[SEQUENCE]
    }

    pub fn control(&self) -> &str {
        &self.0[CONTROL]
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CadastralReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uppercase ASCII letters and drop all whitespace.
pub fn normalize_cadastral_reference(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn validate_cadastral_reference(raw: &str) -> bool {
    CadastralReference::parse(raw).is_some()
}

/// Control characters for the first 18 characters of a reference.
pub fn cadastral_control_characters(prefix: &str) -> Option<[char; 2]> {
    let bytes = prefix.as_bytes();
    if !is_reference_shape(bytes, SEQUENCE.end) {
        return None;
    }
    let [first, second] = control_pair(bytes);
    Some([char::from(first), char::from(second)])
}

fn is_reference_shape(bytes: &[u8], length: usize) -> bool {
    bytes.len() == length
        && bytes
            .iter()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Each control letter covers one 7-character segment followed by the shared sequence.
fn control_pair(bytes: &[u8]) -> [u8; 2] {
    let sequence = &bytes[SEQUENCE];
    let letter_for = |segment: &[u8]| {
        let mut window = [0u8; 11];
        window[..7].copy_from_slice(segment);
        window[7..].copy_from_slice(sequence);
        control_letter(&window) as u8
    };
    [letter_for(&bytes[PARCEL]), letter_for(&bytes[SHEET])]
}
