//! Engine configuration: the annual allowance and how public holidays relate to it.
//!
//! Built once at startup (from defaults, a JSON file, or CLI overrides) and then
//! passed by reference to every entry point.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LeaveError, Result};

/// Annual allowance used when none is configured.
pub const DEFAULT_ANNUAL_ENTITLEMENT: u32 = 28;

/// How public holidays interact with the personal allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayPolicy {
    /// A booked public holiday is charged like any other booked day.
    #[default]
    CountAgainst,
    /// Public holidays never consume allowance, booked or not.
    Excluded,
    /// Every public holiday of the year is deducted from the allowance up front,
    /// so booking one costs nothing extra.
    Reserved,
}

impl HolidayPolicy {
    /// Whether public holidays are free when they fall inside a requested range.
    pub fn holidays_are_free(self) -> bool {
        !matches!(self, HolidayPolicy::CountAgainst)
    }
}

impl fmt::Display for HolidayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HolidayPolicy::CountAgainst => "count-against",
            HolidayPolicy::Excluded => "excluded",
            HolidayPolicy::Reserved => "reserved",
        };
        f.write_str(name)
    }
}

impl FromStr for HolidayPolicy {
    type Err = LeaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count-against" => Ok(HolidayPolicy::CountAgainst),
            "excluded" => Ok(HolidayPolicy::Excluded),
            "reserved" => Ok(HolidayPolicy::Reserved),
            other => Err(LeaveError::Config(format!(
                "unknown holiday policy '{}'. Available policies: count-against, excluded, reserved",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Leave days each person may book per calendar year.
    pub annual_entitlement: u32,
    pub holiday_policy: HolidayPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            annual_entitlement: DEFAULT_ANNUAL_ENTITLEMENT,
            holiday_policy: HolidayPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(annual_entitlement: u32, holiday_policy: HolidayPolicy) -> Self {
        Self {
            annual_entitlement,
            holiday_policy,
        }
    }

    /// Parse a JSON configuration document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LeaveError::Config(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LeaveError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}
