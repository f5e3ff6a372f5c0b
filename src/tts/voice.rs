//! The closed set of synthesis voices.
//!
//! Voices are a fixed catalogue of wire identifiers understood by the remote
//! synthesis endpoints.  Using an enum instead of a raw string means an
//! invalid voice is rejected when it is parsed (config load, CLI), not
//! somewhere inside a dispatch call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// A synthesis voice, identified on the wire by ids like `en_us_001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    #[serde(rename = "en_us_001")]
    UsFemale1,
    #[serde(rename = "en_us_002")]
    UsFemale2,
    #[serde(rename = "en_us_006")]
    UsMale1,
    #[serde(rename = "en_us_007")]
    UsMale2,
    #[serde(rename = "en_uk_001")]
    UkMale1,
    #[serde(rename = "en_uk_003")]
    UkMale2,
    #[serde(rename = "en_au_001")]
    AuFemale,
    #[serde(rename = "en_au_002")]
    AuMale,
}

impl Voice {
    /// Every known voice, in catalogue order.
    pub const ALL: [Voice; 8] = [
        Voice::UsFemale1,
        Voice::UsFemale2,
        Voice::UsMale1,
        Voice::UsMale2,
        Voice::UkMale1,
        Voice::UkMale2,
        Voice::AuFemale,
        Voice::AuMale,
    ];

    /// The identifier sent to synthesis endpoints in the request body.
    pub fn id(self) -> &'static str {
        match self {
            Voice::UsFemale1 => "en_us_001",
            Voice::UsFemale2 => "en_us_002",
            Voice::UsMale1 => "en_us_006",
            Voice::UsMale2 => "en_us_007",
            Voice::UkMale1 => "en_uk_001",
            Voice::UkMale2 => "en_uk_003",
            Voice::AuFemale => "en_au_001",
            Voice::AuMale => "en_au_002",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A voice id that is not in the catalogue.
#[derive(Debug, Error)]
#[error("unknown voice id: {0:?}")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
