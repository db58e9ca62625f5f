//! Member code - the short numeric code that identifies a roster member
//!
//! Codes are handed to guardians so they can claim a member. They are drawn
//! uniformly at random and never change once assigned.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of freshly allocated codes
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Number of random draws at one length before the length is increased
pub const DRAWS_PER_LENGTH: usize = 20;

/// Short numeric member code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberCode(String);

impl MemberCode {
    /// Draw a random code of exactly `length` decimal digits
    pub fn random<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let code = (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// Parse user-supplied text such as `#1234` or `1234`
    pub fn parse(input: &str) -> Result<Self, MemberCodeParseError> {
        let raw = input.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(MemberCodeParseError::InvalidFormat);
        }
        Ok(Self(raw.to_string()))
    }

    /// Wrap a code read back from storage
    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MemberCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error when parsing a member code from text
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MemberCodeParseError {
    #[error("member code must be digits, optionally prefixed with '#'")]
    InvalidFormat,
}
