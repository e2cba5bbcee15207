//! Brazilian individual taxpayer id (CPF).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const DIGITS: usize = 11;

/// A CPF that passed the two-check-digit validation.
///
/// Stored as the bare 11 digits; punctuation is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Parses and validates a CPF such as `"529.982.247-25"` or `"52998224725"`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTaxId(input.to_string());

        let mut digits = Vec::with_capacity(DIGITS);
        for c in input.trim().chars() {
            match c {
                '0'..='9' => digits.push(c as u32 - '0' as u32),
                '.' | '-' => {}
                _ => return Err(invalid()),
            }
        }

        if digits.len() != DIGITS || digits.iter().all(|d| *d == digits[0]) {
            return Err(invalid());
        }

        if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
            return Err(invalid());
        }

        Ok(Self(digits.iter().map(|d| d.to_string()).collect()))
    }

    /// Returns the bare digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional `000.000.000-00` rendering.
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

/// Weighted modulo-11 check digit over `digits`, with weights counting down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        rem => 11 - rem,
    }
}

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl TryFrom<String> for TaxId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxId> for String {
    fn from(id: TaxId) -> Self {
        id.0
    }
}
