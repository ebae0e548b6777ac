//! Entropy seed handling and deterministic selector derivation.
//!
//! The seed comes from the authoritative game state as an opaque unsigned
//! integer of up to 256 bits. It is never recomputed here, only consumed.
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::constants::ENCOUNTER_DOMAIN_TAG;
use crate::error::ForecastError;

const ENTROPY_BYTES: usize = 32;

/// Opaque big-endian 256-bit entropy value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Entropy([u8; ENTROPY_BYTES]);

impl Entropy {
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; ENTROPY_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_be_bytes(&self) -> &[u8; ENTROPY_BYTES] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    /// Reject a zero seed, which the game uses for "not yet revealed".
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::EntropyUnavailable`] for the zero value.
    pub fn ensure_available(&self) -> Result<(), ForecastError> {
        if self.is_zero() {
            return Err(ForecastError::EntropyUnavailable);
        }
        Ok(())
    }

    fn parse_hex(digits: &str) -> Result<Self, &'static str> {
        if digits.len() > ENTROPY_BYTES * 2 {
            return Err("more than 256 bits");
        }
        let mut bytes = [0u8; ENTROPY_BYTES];
        // Fill nibbles from the least significant end.
        for (position, ch) in digits.chars().rev().enumerate() {
            let nibble = ch.to_digit(16).ok_or("invalid hex digit")?;
            let slot = ENTROPY_BYTES - 1 - position / 2;
            let shift = if position % 2 == 0 { 0 } else { 4 };
            bytes[slot] |= (nibble as u8) << shift;
        }
        Ok(Self(bytes))
    }

    fn parse_decimal(digits: &str) -> Result<Self, &'static str> {
        let mut bytes = [0u8; ENTROPY_BYTES];
        for ch in digits.chars() {
            let mut carry = ch.to_digit(10).ok_or("invalid decimal digit")?;
            for byte in bytes.iter_mut().rev() {
                let value = u32::from(*byte) * 10 + carry;
                *byte = (value & 0xFF) as u8;
                carry = value >> 8;
            }
            if carry != 0 {
                return Err("more than 256 bits");
            }
        }
        Ok(Self(bytes))
    }

    /// Derive the eight 32-bit selectors used to generate the encounter at
    /// `xp`. Identical inputs always yield identical selectors.
    #[must_use]
    pub fn selectors(&self, xp: u32) -> Selectors {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(&self.0).expect("256-bit entropy is a valid key");
        mac.update(ENCOUNTER_DOMAIN_TAG);
        mac.update(&xp.to_be_bytes());
        let digest = mac.finalize().into_bytes();
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(digest.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Selectors(words)
    }
}

impl From<u128> for Entropy {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; ENTROPY_BYTES];
        bytes[ENTROPY_BYTES / 2..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for Entropy {
    type Err = ForecastError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let malformed = |reason| ForecastError::MalformedEntropy {
            value: text.to_string(),
            reason,
        };
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"));
        let digits = hex.unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(malformed("no digits"));
        }
        match hex {
            Some(_) => Self::parse_hex(digits),
            None => Self::parse_decimal(digits),
        }
        .map_err(malformed)
    }
}

impl TryFrom<String> for Entropy {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Entropy> for String {
    fn from(value: Entropy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.0.iter().position(|byte| *byte != 0);
        let Some(first) = first else {
            return f.write_str("0x0");
        };
        write!(f, "0x{:x}", self.0[first])?;
        for byte in &self.0[first + 1..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entropy({self})")
    }
}

/// Pseudo-random words derived from `(entropy, xp)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors([u32; 8]);

impl Selectors {
    #[must_use]
    pub const fn word(&self, index: usize) -> u32 {
        self.0[index % 8]
    }

    /// `word % modulus`, treating a zero modulus as one.
    #[must_use]
    pub const fn pick(&self, index: usize, modulus: u32) -> u32 {
        let modulus = if modulus == 0 { 1 } else { modulus };
        self.word(index) % modulus
    }
}
