//! Supported speech languages and their wire codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language the speaker can be asked to use.
///
/// Each language maps to at most one loaded voice at runtime; a request for a
/// language with no loaded voice is degraded to a logged no-op rather than an
/// error (the capability is permanently absent, not transiently failing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Japanese,
    English,
}

impl Language {
    /// Short wire code used in DTOs and log fields (`"ja"` / `"en"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Japanese => "ja",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unrecognized language code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown language code {0:?} (expected \"ja\" or \"en\")")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ja" => Ok(Self::Japanese),
            "en" => Ok(Self::English),
            other => Err(ParseLanguageError(other.to_owned())),
        }
    }
}
