use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionGroup {
    Forward,
    Midfield,
    Defense,
    Goalkeeper,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 4] = [
        PositionGroup::Forward,
        PositionGroup::Midfield,
        PositionGroup::Defense,
        PositionGroup::Goalkeeper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PositionGroup::Forward => "forward",
            PositionGroup::Midfield => "midfield",
            PositionGroup::Defense => "defense",
            PositionGroup::Goalkeeper => "goalkeeper",
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionGroup {
    type Err = ScoutError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let id = raw.trim().to_lowercase();
        PositionGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == id)
            .ok_or_else(|| ScoutError::UnknownGroup(raw.to_string()))
    }
}

// First match wins; order matters ("Defensive Midfield" must land in midfield).
const RULES: &[(&[&str], PositionGroup)] = &[
    (&["keeper"], PositionGroup::Goalkeeper),
    (&["midfield"], PositionGroup::Midfield),
    (&["back", "defender"], PositionGroup::Defense),
    (&["winger", "striker", "forward"], PositionGroup::Forward),
];

/// Map a free-text position label to its group. Unrecognised labels (including "")
/// fall back to midfield.
pub fn classify(raw: &str) -> PositionGroup {
    let s = raw.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| s.contains(n)))
        .map(|(_, group)| *group)
        .unwrap_or(PositionGroup::Midfield)
}
