use crate::error::{AtmError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("firmware pattern is valid"));

/// Firmware version in `X.Y.Z` form. Components are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FirmwareVersion(String);

impl FirmwareVersion {
    pub fn parse(raw: &str) -> Result<Self> {
        let candidate = raw.trim();
        if VERSION_PATTERN.is_match(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(AtmError::InvalidFirmwareVersion(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FirmwareVersion {
    fn default() -> Self {
        Self("1.0.0".to_string())
    }
}

impl TryFrom<String> for FirmwareVersion {
    type Error = AtmError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FirmwareVersion> for String {
    fn from(version: FirmwareVersion) -> Self {
        version.0
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
