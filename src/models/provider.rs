//! Mobile network operators and their ARCEP operator codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mobile network operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provider {
    Orange,
    #[serde(rename = "SFR")]
    Sfr,
    Free,
    Bouygue,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown provider name '{0}'")]
pub struct UnknownProvider(pub String);

impl Provider {
    /// All providers, in payload order
    pub fn all() -> &'static [Provider] {
        &[
            Provider::Orange,
            Provider::Sfr,
            Provider::Free,
            Provider::Bouygue,
        ]
    }

    /// Map a French MCC+MNC operator code to its provider.
    pub fn from_operator_code(code: &str) -> Option<Self> {
        match code.trim() {
            "20801" => Some(Provider::Orange),
            "20810" => Some(Provider::Sfr),
            "20815" => Some(Provider::Free),
            "20820" => Some(Provider::Bouygue),
            _ => None,
        }
    }

    pub fn operator_code(&self) -> &'static str {
        match self {
            Provider::Orange => "20801",
            Provider::Sfr => "20810",
            Provider::Free => "20815",
            Provider::Bouygue => "20820",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Orange => "Orange",
            Provider::Sfr => "SFR",
            Provider::Free => "Free",
            Provider::Bouygue => "Bouygue",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::all()
            .iter()
            .copied()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
