//! Identifier normalization.
//!
//! NIMBY Rails exports write the same object id either as a hex literal
//! (`0x1a`) or as plain decimal text (`26`). Each textual id is resolved once,
//! at ingestion, into an [`Identifier`] that keeps the original text for
//! storage and a [`CanonicalId`] for cross-source comparison. Values of any
//! width are supported.

use std::cmp::Ordering;
use std::fmt;

/// Marker that introduces a hexadecimal identifier.
pub const HEX_MARKER: &str = "0x";

/// Base of the limbs used while converting hex digits to decimal text
const LIMB_BASE: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported identifier format {value:?}: {reason}")]
pub struct UnsupportedIdentifierFormat {
    pub value: String,
    pub reason: &'static str,
}

impl UnsupportedIdentifierFormat {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

/// Textual encodings an identifier may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `0x` followed by one or more hex digits
    Hex,
    /// Decimal digits only
    Decimal,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Hex => write!(f, "hex"),
            Encoding::Decimal => write!(f, "decimal"),
        }
    }
}

/// Canonical form of an identifier: decimal digits without leading zeros.
///
/// Orders numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for CanonicalId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Ord for CanonicalId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CanonicalId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An identifier as written in a source document, resolved to canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    original: String,
    encoding: Encoding,
    canonical: CanonicalId,
}

impl Identifier {
    /// Parse an identifier in any supported encoding.
    pub fn parse(text: &str) -> Result<Self, UnsupportedIdentifierFormat> {
        let (encoding, canonical) = resolve(text)?;
        Ok(Self {
            original: text.to_string(),
            encoding,
            canonical,
        })
    }

    /// The text as it appeared in the source; this is what gets persisted.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn canonical(&self) -> &CanonicalId {
        &self.canonical
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Canonical decimal-string form of `text`.
///
/// Equal values yield equal strings regardless of encoding, and the output is
/// itself a supported identifier that canonicalizes to itself.
pub fn canonicalize(text: &str) -> Result<String, UnsupportedIdentifierFormat> {
    resolve(text).map(|(_, id)| id.0)
}

fn resolve(text: &str) -> Result<(Encoding, CanonicalId), UnsupportedIdentifierFormat> {
    let hex_digits = text
        .strip_prefix(HEX_MARKER)
        .or_else(|| text.strip_prefix("0X"));

    if let Some(digits) = hex_digits {
        if digits.is_empty() {
            return Err(UnsupportedIdentifierFormat::new(text, "no digits after hex marker"));
        }
        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16))
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| UnsupportedIdentifierFormat::new(text, "invalid hex digit"))?;
        return Ok((Encoding::Hex, CanonicalId(hex_to_decimal(&nibbles))));
    }

    if text.is_empty() {
        return Err(UnsupportedIdentifierFormat::new(text, "empty identifier"));
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnsupportedIdentifierFormat::new(
            text,
            "expected hex literal or decimal digits",
        ));
    }
    let trimmed = text.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };
    Ok((Encoding::Decimal, CanonicalId(digits.to_string())))
}

/// Decimal text of a big-endian run of hex digit values.
fn hex_to_decimal(nibbles: &[u32]) -> String {
    // little-endian base 10^9 limbs
    let mut limbs: Vec<u64> = vec![0];
    for &nibble in nibbles {
        let mut carry = u64::from(nibble);
        for limb in limbs.iter_mut() {
            let value = *limb * 16 + carry;
            *limb = value % LIMB_BASE;
            carry = value / LIMB_BASE;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }

    let mut out = String::with_capacity(limbs.len() * 9);
    let mut rest = limbs.iter().rev();
    if let Some(top) = rest.next() {
        out.push_str(&top.to_string());
    }
    for limb in rest {
        out.push_str(&format!("{:09}", limb));
    }
    out
}
