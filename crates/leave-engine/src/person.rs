//! Normalized person identity.
//!
//! Names arrive as free text from users and from the booking store. Every
//! comparison of identity goes through [`PersonId::new`], so "Alice", " alice "
//! and "ALICE" all refer to the same person.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LeaveError, Result};

/// A canonicalized person identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(String);

impl PersonId {
    /// Canonicalize a raw name: trim, collapse internal whitespace runs to a
    /// single space, and apply Unicode lowercase mapping.
    ///
    /// # Errors
    /// Returns `LeaveError::EmptyPerson` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self> {
        let canonical = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if canonical.is_empty() {
            return Err(LeaveError::EmptyPerson);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PersonId {
    type Err = LeaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for PersonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PersonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PersonId::new(&raw).map_err(serde::de::Error::custom)
    }
}
