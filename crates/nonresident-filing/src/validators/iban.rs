use serde::{Deserialize, Serialize};
use std::fmt;

/// IBAN registry: country code, total length, and BBAN structure in ISO 13616 notation
/// (`n` digits, `a` uppercase letters, `c` alphanumerics, each preceded by its count).
const IBAN_REGISTRY: &[(&str, usize, &str)] = &[
    ("AD", 24, "4n4n12c"),
    ("AE", 23, "3n16n"),
    ("AL", 28, "8n16c"),
    ("AT", 20, "5n11n"),
    ("AZ", 28, "4a20c"),
    ("BA", 20, "3n3n8n2n"),
    ("BE", 16, "3n7n2n"),
    ("BG", 22, "4a4n2n8c"),
    ("BH", 22, "4a14c"),
    ("BI", 27, "5n5n11n2n"),
    ("BR", 29, "8n5n10n1a1c"),
    ("BY", 28, "4c4n16c"),
    ("CH", 21, "5n12c"),
    ("CR", 22, "4n14n"),
    ("CY", 28, "3n5n16c"),
    ("CZ", 24, "4n6n10n"),
    ("DE", 22, "8n10n"),
    ("DJ", 27, "5n5n11n2n"),
    ("DK", 18, "4n9n1n"),
    ("DO", 28, "4c20n"),
    ("EE", 20, "2n2n11n1n"),
    ("EG", 29, "4n4n17n"),
    ("ES", 24, "4n4n1n1n10n"),
    ("FI", 18, "3n11n"),
    ("FK", 18, "2a12n"),
    ("FO", 18, "4n9n1n"),
    ("FR", 27, "5n5n11c2n"),
    ("GB", 22, "4a6n8n"),
    ("GE", 22, "2a16n"),
    ("GI", 23, "4a15c"),
    ("GL", 18, "4n9n1n"),
    ("GR", 27, "3n4n16c"),
    ("GT", 28, "4c20c"),
    ("HN", 28, "4a20n"),
    ("HR", 21, "7n10n"),
    ("HU", 28, "3n4n1n15n1n"),
    ("IE", 22, "4a6n8n"),
    ("IL", 23, "3n3n13n"),
    ("IQ", 23, "4a3n12n"),
    ("IS", 26, "4n2n6n10n"),
    ("IT", 27, "1a5n5n12c"),
    ("JO", 30, "4a4n18c"),
    ("KW", 30, "4a22c"),
    ("KZ", 20, "3n13c"),
    ("LB", 28, "4n20c"),
    ("LC", 32, "4a24c"),
    ("LI", 21, "5n12c"),
    ("LT", 20, "5n11n"),
    ("LU", 20, "3n13c"),
    ("LV", 21, "4a13c"),
    ("LY", 25, "3n3n15n"),
    ("MC", 27, "5n5n11c2n"),
    ("MD", 24, "2c18c"),
    ("ME", 22, "3n13n2n"),
    ("MK", 19, "3n10c2n"),
    ("MN", 20, "4n12n"),
    ("MR", 27, "5n5n11n2n"),
    ("MT", 31, "4a5n18c"),
    ("MU", 30, "4a2n2n12n3n3a"),
    ("NI", 28, "4a20n"),
    ("NL", 18, "4a10n"),
    ("NO", 15, "4n6n1n"),
    ("OM", 23, "3n16c"),
    ("PK", 24, "4a16c"),
    ("PL", 28, "8n16n"),
    ("PS", 29, "4a21c"),
    ("PT", 25, "4n4n11n2n"),
    ("QA", 29, "4a21c"),
    ("RO", 24, "4a16c"),
    ("RS", 22, "3n13n2n"),
    ("RU", 33, "9n5n15c"),
    ("SA", 24, "2n18c"),
    ("SC", 31, "4a2n2n16n3a"),
    ("SD", 18, "2n12n"),
    ("SE", 24, "3n16n1n"),
    ("SI", 19, "5n8n2n"),
    ("SK", 24, "4n6n10n"),
    ("SM", 27, "1a5n5n12c"),
    ("SO", 23, "4n3n12n"),
    ("ST", 25, "4n4n11n2n"),
    ("SV", 28, "4a20n"),
    ("TL", 23, "3n14n2n"),
    ("TN", 24, "2n3n13n2n"),
    ("TR", 26, "5n1n16c"),
    ("UA", 29, "6n19c"),
    ("VA", 22, "3n15n"),
    ("VG", 24, "4a16n"),
    ("XK", 20, "4n10n2n"),
    ("YE", 30, "4a4n18c"),
];

const SPANISH_CONTROL_WEIGHTS: [u32; 10] = [1, 2, 4, 8, 5, 10, 9, 7, 3, 6];

/// Reason an IBAN was rejected. Serialized as the code the UI keys its messages on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
pub enum IbanErrorCode {
    #[error("an IBAN is required")]
    IbanRequired,
    #[error("the IBAN country code is not recognized")]
    IbanCountryInvalid,
    #[error("the IBAN length does not match its country")]
    IbanLengthInvalid,
    #[error("the IBAN check digits do not match")]
    IbanChecksumInvalid,
    #[error("the IBAN is malformed")]
    IbanInvalid,
}

impl IbanErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            IbanErrorCode::IbanRequired => "ibanRequired",
            IbanErrorCode::IbanCountryInvalid => "ibanCountryInvalid",
            IbanErrorCode::IbanLengthInvalid => "ibanLengthInvalid",
            IbanErrorCode::IbanChecksumInvalid => "ibanChecksumInvalid",
            IbanErrorCode::IbanInvalid => "ibanInvalid",
        }
    }
}

/// Verified IBAN held in electronic format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Iban(String);

impl Iban {
    pub fn parse(raw: &str) -> Result<Self, IbanErrorCode> {
        let electronic = format_iban_for_storage(raw);
        check_electronic(&electronic)?;
        Ok(Self(electronic))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    pub fn bban(&self) -> &str {
        &self.0[4..]
    }

    /// Print format: blocks of four separated by single spaces.
    pub fn print_format(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + self.0.len() / 4);
        for (index, c) in self.0.chars().enumerate() {
            if index > 0 && index % 4 == 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured verdict for form handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbanValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<IbanErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl From<Result<Iban, IbanErrorCode>> for IbanValidation {
    fn from(result: Result<Iban, IbanErrorCode>) -> Self {
        match result {
            Ok(iban) => Self {
                valid: true,
                error_code: None,
                formatted: Some(iban.into_inner()),
            },
            Err(code) => Self {
                valid: false,
                error_code: Some(code),
                formatted: None,
            },
        }
    }
}

pub fn validate_iban(raw: &str) -> IbanValidation {
    Iban::parse(raw).into()
}

/// Electronic format: no spaces or hyphens, ASCII letters uppercased.
pub fn format_iban_for_storage(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn check_electronic(iban: &str) -> Result<(), IbanErrorCode> {
    if iban.is_empty() {
        return Err(IbanErrorCode::IbanRequired);
    }

    let (expected_length, structure) = iban
        .get(..2)
        .and_then(registry_entry)
        .ok_or(IbanErrorCode::IbanCountryInvalid)?;

    if iban.chars().count() != expected_length {
        return Err(IbanErrorCode::IbanLengthInvalid);
    }

    // Non-ASCII input can match the char count but never the byte count.
    let bytes = iban.as_bytes();
    let bban = &bytes[4..];
    if bytes.len() != expected_length || !bban_matches(bban, structure) {
        return Err(IbanErrorCode::IbanInvalid);
    }

    if &bytes[..2] == b"ES" && !spanish_bban_is_consistent(bban) {
        return Err(IbanErrorCode::IbanInvalid);
    }

    if !bytes[2..4].iter().all(u8::is_ascii_digit) {
        return Err(IbanErrorCode::IbanInvalid);
    }

    if mod97(bytes) != 1 {
        return Err(IbanErrorCode::IbanChecksumInvalid);
    }

    Ok(())
}

fn registry_entry(country: &str) -> Option<(usize, &'static str)> {
    IBAN_REGISTRY
        .iter()
        .find(|(code, _, _)| *code == country)
        .map(|(_, length, structure)| (*length, *structure))
}

/// Walks `structure` segment by segment; the BBAN must be consumed exactly.
fn bban_matches(bban: &[u8], structure: &str) -> bool {
    let mut rest = bban;
    let mut count = 0usize;
    for class in structure.bytes() {
        if class.is_ascii_digit() {
            count = count * 10 + usize::from(class - b'0');
            continue;
        }
        if rest.len() < count {
            return false;
        }
        let (segment, tail) = rest.split_at(count);
        if !segment.iter().all(|&c| class_allows(class, c)) {
            return false;
        }
        rest = tail;
        count = 0;
    }
    rest.is_empty()
}

fn class_allows(class: u8, c: u8) -> bool {
    match class {
        b'n' => c.is_ascii_digit(),
        b'a' => c.is_ascii_uppercase(),
        _ => c.is_ascii_uppercase() || c.is_ascii_digit(),
    }
}

/// ISO 7064 mod 97-10 over the rearranged IBAN, folded digit by digit.
fn mod97(iban: &[u8]) -> u32 {
    let (head, tail) = iban.split_at(4);
    tail.iter().chain(head).fold(0u32, |remainder, &c| match c {
        b'0'..=b'9' => (remainder * 10 + u32::from(c - b'0')) % 97,
        b'A'..=b'Z' => (remainder * 100 + u32::from(c - b'A') + 10) % 97,
        _ => remainder,
    })
}

/// Spanish "digitos de control": bank(4) branch(4) dc(2) account(10).
fn spanish_bban_is_consistent(bban: &[u8]) -> bool {
    if bban.len() != 20 || !bban.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let mut office = [b'0'; 10];
    office[2..].copy_from_slice(&bban[..8]);
    let first = spanish_control_digit(&office);
    let second = spanish_control_digit(&bban[10..]);

    bban[8] == first && bban[9] == second
}

fn spanish_control_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(SPANISH_CONTROL_WEIGHTS)
        .map(|(&d, weight)| u32::from(d - b'0') * weight)
        .sum();
    match 11 - sum % 11 {
        11 => b'0',
        10 => b'1',
        digit => b'0' + digit as u8,
    }
}
