use std::fmt;

use serde::{Deserialize, Serialize};

/// Region selection applied before aggregation.
///
/// Matching is exact but case-insensitive. A region that does not occur in
/// the data simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionFilter {
    /// No filtering; every record is selected.
    #[default]
    All,
    /// Records whose region equals this value, ignoring case.
    Region(String),
}

impl RegionFilter {
    /// The sentinel accepted for "no filter".
    pub const ALL: &'static str = "all";

    /// Interpret a user-supplied value.  `"all"` (any case) or a blank
    /// string select everything.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL) {
            RegionFilter::All
        } else {
            RegionFilter::Region(trimmed.to_lowercase())
        }
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Region(wanted) => region.to_lowercase() == wanted.to_lowercase(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RegionFilter::All)
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str(Self::ALL),
            RegionFilter::Region(r) => f.write_str(&r.to_lowercase()),
        }
    }
}
