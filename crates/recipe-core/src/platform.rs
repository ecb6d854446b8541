//! Cross-compilation target parsing.

use crate::error::RecipeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform given as `<os>-<arch>`, e.g. `linux-amd64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPlatform {
    pub os: String,
    pub arch: String,
}

impl TargetPlatform {
    /// Toolchain environment selecting this target.
    pub fn env_vars(&self) -> [(String, String); 2] {
        [
            ("GOOS".to_string(), self.os.clone()),
            ("GOARCH".to_string(), self.arch.clone()),
        ]
    }
}

impl FromStr for TargetPlatform {
    type Err = RecipeError;

    /// Exactly two non-empty fields separated by `-`. Variant suffixes
    /// (`linux-arm-v7`) are rejected rather than folded into the arch.
    fn from_str(target: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RecipeError::InvalidTarget {
            target: target.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = target.split('-');
        let os = fields.next().unwrap_or_default();
        let arch = fields
            .next()
            .ok_or_else(|| invalid("expected <os>-<arch>"))?;
        if fields.next().is_some() {
            return Err(invalid("more than two fields"));
        }
        if os.is_empty() || arch.is_empty() {
            return Err(invalid("empty os or arch"));
        }

        Ok(TargetPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
