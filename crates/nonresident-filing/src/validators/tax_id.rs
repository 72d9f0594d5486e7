use super::checksum::{mod23_letter, DNI_LETTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

const TAX_ID_LENGTH: usize = 9;

/// Flavor of a valid Spanish tax identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxIdKind {
    /// Citizen DNI-based NIF: 8 digits and a check letter.
    #[serde(rename = "NIF")]
    Nif,
    /// Foreigner identity number: X/Y/Z, 7 digits and a check letter.
    #[serde(rename = "NIE")]
    Nie,
}

impl TaxIdKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaxIdKind::Nif => "NIF",
            TaxIdKind::Nie => "NIE",
        }
    }
}

impl fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized NIF/NIE whose check letter has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaxId {
    value: String,
    kind: TaxIdKind,
}

impl TaxId {
    /// Normalize and verify `raw`. `None` for anything that is not a valid NIF or NIE.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = normalize_nie_nif(raw);
        let kind = classify_normalized(value.as_bytes())?;
        Some(Self { value, kind })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> TaxIdKind {
        self.kind
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Uppercase ASCII letters and drop whitespace and ASCII punctuation.
pub fn normalize_nie_nif(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn validate_nie_nif(raw: &str) -> bool {
    TaxId::parse(raw).is_some()
}

/// Kind of `raw`, only when it is also valid.
pub fn nie_nif_type(raw: &str) -> Option<TaxIdKind> {
    TaxId::parse(raw).map(|tax_id| tax_id.kind())
}

fn classify_normalized(value: &[u8]) -> Option<TaxIdKind> {
    if value.len() != TAX_ID_LENGTH {
        return None;
    }

    let (body, check) = value.split_at(TAX_ID_LENGTH - 1);
    let (kind, prefix) = match body[0] {
        b'X' => (TaxIdKind::Nie, 0),
        b'Y' => (TaxIdKind::Nie, 1),
        b'Z' => (TaxIdKind::Nie, 2),
        b'0'..=b'9' => (TaxIdKind::Nif, u32::from(body[0] - b'0')),
        _ => return None,
    };

    let mut number = prefix;
    for &c in &body[1..] {
        if !c.is_ascii_digit() {
            return None;
        }
        number = number * 10 + u32::from(c - b'0');
    }

    let expected = mod23_letter(number, DNI_LETTERS);
    (char::from(check[0]) == expected).then_some(kind)
}
