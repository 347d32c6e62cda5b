//! Environment snapshot and typed variable parsing
//!
//! Variables are read once into an [`EnvSource`]. Command configs pull their
//! values through a [`Requirements`] collector so that every missing variable
//! is reported in a single error.

use std::collections::BTreeMap;
use std::str::FromStr;

use alloy_primitives::{keccak256, Address, B256};
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;
use url::Url;

use crate::error::{OftError, Result};

/// Outcome of parsing one raw value; the error is a human-readable reason
pub type ParseResult<T> = std::result::Result<T, String>;

/// Immutable snapshot of configuration variables
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: BTreeMap<String, String>,
}

impl EnvSource {
    /// Loads `.env` (when present) into the process environment, then
    /// snapshots it
    pub fn from_process() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), event = "dotenv_loaded"),
            Err(e) if e.not_found() => debug!(event = "dotenv_not_found"),
            Err(e) => debug!(error = %e, event = "dotenv_unreadable"),
        }
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Trimmed value of `name`; blank values count as unset
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn requirements(&self) -> Requirements<'_> {
        Requirements {
            env: self,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }
}

/// Collects missing and malformed variables while a config is assembled
#[derive(Debug)]
pub struct Requirements<'a> {
    env: &'a EnvSource,
    missing: Vec<String>,
    invalid: Vec<OftError>,
}

impl Requirements<'_> {
    /// Parses a required variable, recording it as missing when unset
    pub fn required<T>(&mut self, name: &str, parse: fn(&str) -> ParseResult<T>) -> Option<T> {
        match self.env.get(name) {
            Some(raw) => self.parse(name, raw, parse),
            None => {
                self.missing.push(name.to_string());
                None
            }
        }
    }

    pub fn optional<T>(&mut self, name: &str, parse: fn(&str) -> ParseResult<T>) -> Option<T> {
        let raw = self.env.get(name)?;
        self.parse(name, raw, parse)
    }

    /// Parses `name` if set, falling back to `default` otherwise
    pub fn with_default<T>(
        &mut self,
        name: &str,
        default: &str,
        parse: fn(&str) -> ParseResult<T>,
    ) -> Option<T> {
        let raw = self.env.get(name).unwrap_or(default);
        self.parse(name, raw, parse)
    }

    fn parse<T>(&mut self, name: &str, raw: &str, parse: fn(&str) -> ParseResult<T>) -> Option<T> {
        match parse(raw) {
            Ok(value) => Some(value),
            Err(reason) => {
                self.invalid.push(OftError::InvalidConfig {
                    name: name.to_string(),
                    reason,
                });
                None
            }
        }
    }

    /// Fails with every missing variable, or else with the first malformed one
    pub fn finish(self) -> Result<()> {
        if !self.missing.is_empty() {
            return Err(OftError::MissingConfig {
                names: self.missing,
            });
        }
        match self.invalid.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Unwraps a value whose absence was already reported by [`Requirements::finish`]
pub(crate) fn present<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| OftError::MissingConfig {
        names: vec![name.to_string()],
    })
}

pub fn parse_address(raw: &str) -> ParseResult<Address> {
    Address::from_str(raw).map_err(|e| format!("not an EVM address: {e}"))
}

pub fn parse_private_key(raw: &str) -> ParseResult<PrivateKeySigner> {
    PrivateKeySigner::from_str(raw).map_err(|_| "not a valid secp256k1 private key".to_string())
}

pub fn parse_url(raw: &str) -> ParseResult<Url> {
    Url::parse(raw).map_err(|e| format!("not a URL: {e}"))
}

pub fn parse_string(raw: &str) -> ParseResult<String> {
    Ok(raw.to_string())
}

/// Only `true` enables a flag; any other value leaves it off
pub fn parse_flag(raw: &str) -> ParseResult<bool> {
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}

/// A 32-byte hex salt is used as-is; any other string is hashed
pub fn parse_salt(raw: &str) -> ParseResult<B256> {
    if raw.len() == 66 && raw.starts_with("0x") {
        return B256::from_str(raw).map_err(|e| format!("bad hex salt: {e}"));
    }
    Ok(keccak256(raw.as_bytes()))
}
