//! Boundary recognition for number and boolean literals.
//!
//! Nothing here converts text into values. The recognizers only decide where
//! a literal ends and whether it is well formed, so the caller can store the
//! exact source bytes in the tree.

use crate::NodeKind;
use std::fmt;

#[cfg(test)]
#[path = "./number_tests.rs"]
mod tests;

/// Reason a numeric literal was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumberFault {
    /// A decimal integer part starts with `0` followed by more digits.
    LeadingZero,
    /// An underscore that is not placed between two digits.
    Underscore,
    /// A character that is not a valid digit for the literal's radix, or
    /// identifier characters directly after the literal.
    InvalidDigit,
    /// A `+` or `-` not followed by digits, `inf` or `nan`.
    DanglingSign,
    /// A sign in front of a `0x`, `0o` or `0b` prefix.
    SignedRadix,
    /// A radix prefix with no digits after it.
    MissingDigits,
    /// A `.` not followed by digits.
    MalformedFraction,
    /// An `e`/`E` not followed by an optionally signed digit sequence.
    MalformedExponent,
}

impl NumberFault {
    /// Stable kebab-case code identifying the fault.
    pub fn code(self) -> &'static str {
        match self {
            Self::LeadingZero => "leading-zero",
            Self::Underscore => "underscore",
            Self::InvalidDigit => "invalid-digit",
            Self::DanglingSign => "dangling-sign",
            Self::SignedRadix => "signed-radix",
            Self::MissingDigits => "missing-digits",
            Self::MalformedFraction => "malformed-fraction",
            Self::MalformedExponent => "malformed-exponent",
        }
    }
}

impl fmt::Display for NumberFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LeadingZero => "leading zeros are not allowed",
            Self::Underscore => "underscores must sit between two digits",
            Self::InvalidDigit => "invalid digit",
            Self::DanglingSign => "sign is not followed by a number",
            Self::SignedRadix => "prefixed integers cannot be signed",
            Self::MissingDigits => "missing digits after radix prefix",
            Self::MalformedFraction => "decimal point must be followed by digits",
            Self::MalformedExponent => "exponent must be followed by digits",
        };
        f.write_str(text)
    }
}

/// A recognized literal: its exclusive end offset and its classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    /// Offset one past the last byte of the literal.
    pub end: usize,
    /// [`NodeKind::Integer`], [`NodeKind::Float`] or [`NodeKind::Bool`].
    pub kind: NodeKind,
}

/// A rejected literal: the reason and the offset where it was detected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Malformed {
    /// Why the literal was rejected.
    pub fault: NumberFault,
    /// Offset of the offending byte.
    pub at: usize,
}

#[inline]
pub(crate) fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Recognizes the numeric literal starting at `bytes[start]`.
///
/// Returns the maximal literal span that satisfies the number grammar. The
/// literal must end at a byte that cannot continue it (anything except an
/// identifier byte or `.`), otherwise it is reported as malformed.
pub fn recognize_number(bytes: &[u8], start: usize) -> Result<Literal, Malformed> {
    let mut pos = start;
    let signed = matches!(bytes.get(pos), Some(b'+' | b'-'));
    if signed {
        pos += 1;
    }

    if let Some(end) = special_float(bytes, pos) {
        return finish(bytes, end, NodeKind::Float);
    }

    match bytes.get(pos) {
        Some(b) if b.is_ascii_digit() => {}
        Some(b'_') => return Err(malformed(NumberFault::Underscore, pos)),
        _ if signed => return Err(malformed(NumberFault::DanglingSign, pos)),
        _ => return Err(malformed(NumberFault::InvalidDigit, pos)),
    }

    if bytes[pos] == b'0' {
        let radix = match bytes.get(pos + 1) {
            Some(b'x') => 16,
            Some(b'o') => 8,
            Some(b'b') => 2,
            _ => 10,
        };
        if radix != 10 {
            if signed {
                return Err(malformed(NumberFault::SignedRadix, start));
            }
            return radix_integer(bytes, pos + 2, radix);
        }
        if let Some(b'0'..=b'9' | b'_') = bytes.get(pos + 1) {
            return Err(malformed(NumberFault::LeadingZero, pos));
        }
    }

    pos = digits(bytes, pos, 10)?;
    let mut kind = NodeKind::Integer;

    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        match bytes.get(pos) {
            Some(b) if b.is_ascii_digit() => {}
            Some(b'_') => return Err(malformed(NumberFault::Underscore, pos)),
            _ => return Err(malformed(NumberFault::MalformedFraction, pos)),
        }
        pos = digits(bytes, pos, 10)?;
        kind = NodeKind::Float;
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        pos += 1;
        if let Some(b'+' | b'-') = bytes.get(pos) {
            pos += 1;
        }
        match bytes.get(pos) {
            Some(b) if b.is_ascii_digit() => {}
            Some(b'_') => return Err(malformed(NumberFault::Underscore, pos)),
            _ => return Err(malformed(NumberFault::MalformedExponent, pos)),
        }
        pos = digits(bytes, pos, 10)?;
        kind = NodeKind::Float;
    }

    finish(bytes, pos, kind)
}

/// Recognizes `true` or `false` at `bytes[start]`.
///
/// The whole identifier run is compared, so `trueish` is rejected rather than
/// split after `true`.
pub fn recognize_bool(bytes: &[u8], start: usize) -> Option<Literal> {
    let mut end = start;
    while end < bytes.len() && is_keylike_byte(bytes[end]) {
        end += 1;
    }
    match &bytes[start..end] {
        b"true" | b"false" => Some(Literal {
            end,
            kind: NodeKind::Bool,
        }),
        _ => None,
    }
}

/// Returns the end of `inf`/`nan` at `pos`, if either keyword is there.
fn special_float(bytes: &[u8], pos: usize) -> Option<usize> {
    let rest = bytes.get(pos..)?;
    if rest.starts_with(b"inf") || rest.starts_with(b"nan") {
        Some(pos + 3)
    } else {
        None
    }
}

fn radix_integer(bytes: &[u8], pos: usize, radix: u32) -> Result<Literal, Malformed> {
    match bytes.get(pos) {
        Some(&b) if is_digit(b, radix) => {}
        Some(b'_') => return Err(malformed(NumberFault::Underscore, pos)),
        Some(&b) if b.is_ascii_alphanumeric() => {
            return Err(malformed(NumberFault::InvalidDigit, pos));
        }
        _ => return Err(malformed(NumberFault::MissingDigits, pos)),
    }
    let end = digits(bytes, pos, radix)?;
    finish(bytes, end, NodeKind::Integer)
}

/// Consumes a digit sequence with single interior underscores. The byte at
/// `pos` must already be a digit of `radix`.
fn digits(bytes: &[u8], mut pos: usize, radix: u32) -> Result<usize, Malformed> {
    debug_assert!(bytes.get(pos).is_some_and(|&b| is_digit(b, radix)));
    while let Some(&b) = bytes.get(pos) {
        if is_digit(b, radix) {
            pos += 1;
        } else if b == b'_' {
            match bytes.get(pos + 1) {
                Some(&next) if is_digit(next, radix) => pos += 2,
                _ => return Err(malformed(NumberFault::Underscore, pos)),
            }
        } else {
            break;
        }
    }
    Ok(pos)
}

fn finish(bytes: &[u8], end: usize, kind: NodeKind) -> Result<Literal, Malformed> {
    match bytes.get(end) {
        Some(&b) if is_keylike_byte(b) || b == b'.' => Err(malformed(NumberFault::InvalidDigit, end)),
        _ => Ok(Literal { end, kind }),
    }
}

#[inline]
fn is_digit(b: u8, radix: u32) -> bool {
    (b as char).is_digit(radix)
}

#[cold]
fn malformed(fault: NumberFault, at: usize) -> Malformed {
    Malformed { fault, at }
}
