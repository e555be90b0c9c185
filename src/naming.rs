//! Filename ordering and the `prefix + number` naming convention.
//!
//! Two pure helpers drive every naming decision in a run:
//!
//! - [`natural_key`] orders filenames the way a person reads them: digit runs
//!   compare by value, text compares case-insensitively. `frame2.png` sorts
//!   before `frame10.png`.
//! - [`split_prefix_number`] splits a stem into its text prefix and trailing
//!   number. The base image's stem seeds output naming:
//!   - `ff1pr0` → prefix `ff1pr`, start `0` → outputs `ff1pr1.png`, `ff1pr2.png`, ...
//!   - `cover` → prefix `cover`, start `0` → outputs `cover1.png`, `cover2.png`, ...
//!   - `x5` → prefix `x`, start `5` → outputs `x6.png`, `x7.png`, ...
//!
//!   Trailing numbers of any length are supported ([`StemNumber`]).

use std::cmp::Ordering;

/// Extension of every generated file. Output is always PNG.
pub const OUTPUT_EXTENSION: &str = "png";

/// One run of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyPart {
    /// Lowercased non-digit run (possibly empty).
    Text(String),
    /// Digit run with leading zeros stripped; compared by value.
    Number(String),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            (KeyPart::Number(a), KeyPart::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Keys alternate text/number from a text start, so mixed pairs
            // only happen through misuse; keep the order total anyway.
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Less,
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key produced by [`natural_key`].
///
/// Always starts and ends with a text part, alternating with digit runs in
/// between, so two keys line up part-for-part when compared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<KeyPart>);

/// Build a natural-sort key for `text`.
///
/// Digit runs of any length compare numerically (no overflow), so
/// `item2 < item10` and `img007 == img7` as keys.
pub fn natural_key(text: &str) -> NaturalKey {
    let mut parts = Vec::new();
    let mut rest = text;
    loop {
        let digits_at = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        parts.push(KeyPart::Text(rest[..digits_at].to_lowercase()));
        rest = &rest[digits_at..];
        if rest.is_empty() {
            break;
        }
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest[..digits_end].trim_start_matches('0');
        parts.push(KeyPart::Number(digits.to_string()));
        rest = &rest[digits_end..];
    }
    NaturalKey(parts)
}

/// Total natural ordering: equal keys fall back to the raw string so the
/// result never depends on directory listing order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b)).then_with(|| a.cmp(b))
}

/// Trailing number of a stem, kept as decimal digits so any length works.
///
/// Leading zeros are dropped (`007` → `7`); zero is `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemNumber(String);

impl StemNumber {
    /// `None` unless `digits` is a non-empty run of ASCII digits.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        Some(Self(if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }))
    }

    /// `self + n`, with schoolbook carry over the decimal digits.
    pub fn add(&self, n: u64) -> Self {
        let mut digits: Vec<u8> = self.0.bytes().rev().map(|b| b - b'0').collect();
        let mut carry = u128::from(n);
        let mut i = 0;
        while carry > 0 {
            if i == digits.len() {
                digits.push(0);
            }
            let total = u128::from(digits[i]) + carry;
            digits[i] = (total % 10) as u8;
            carry = total / 10;
            i += 1;
        }
        Self(digits.iter().rev().map(|d| char::from(b'0' + d)).collect())
    }
}

impl From<u64> for StemNumber {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl std::fmt::Display for StemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A filename stem split into text prefix and optional trailing number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemParts {
    /// Everything before the trailing digit run. Empty for all-digit stems.
    pub prefix: String,
    /// Value of the trailing digit run, if the stem ends in digits.
    pub number: Option<StemNumber>,
}

impl StemParts {
    /// Number that output numbering counts up from. Stems without a
    /// trailing number behave as if they ended in `0`.
    pub fn start_offset(&self) -> StemNumber {
        self.number.clone().unwrap_or_else(|| StemNumber::from(0))
    }

    /// Output filename for the overlay at 1-based position `index`.
    pub fn output_name(&self, index: u64) -> String {
        output_filename(&self.prefix, self.start_offset().add(index))
    }
}

/// Split a stem (extension already removed) into prefix and trailing number.
///
/// - `"ff1pr0"` → (`"ff1pr"`, `Some(0)`) — only the trailing run counts
/// - `"abc"` → (`"abc"`, `None`)
/// - `"007"` → (`""`, `Some(7)`)
///
/// The trailing run may be arbitrarily long.
pub fn split_prefix_number(stem: &str) -> StemParts {
    let prefix_len = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, digits) = stem.split_at(prefix_len);
    match StemNumber::parse(digits) {
        Some(number) => StemParts {
            prefix: prefix.to_string(),
            number: Some(number),
        },
        None => StemParts {
            prefix: stem.to_string(),
            number: None,
        },
    }
}

/// `{prefix}{number}.png`
pub fn output_filename(prefix: &str, number: impl std::fmt::Display) -> String {
    format!("{prefix}{number}.{OUTPUT_EXTENSION}")
}
