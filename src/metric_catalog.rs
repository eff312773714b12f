use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::error::ScoutResult;
use crate::position::PositionGroup;

const FORWARD: &[&str] = &[
    "Goals",
    "Expected Goals (xG)",
    "Assists",
    "Expected Assists (xA)",
    "Shots (per match)",
    "Shots on Target (per match)",
    "Big Chances Created",
    "Big Chances Missed",
    "Penalties Awarded",
    "Successful Dribbles (per match)",
    "Possession Won Final 3rd (per match)",
];

const MIDFIELD: &[&str] = &[
    "Goals",
    "Assists",
    "Expected Assists (xA)",
    "Big Chances Created",
    "Accurate Long Balls (per match)",
    "Successful Dribbles (per match)",
    "Possession Won Final 3rd (per match)",
    "Successful Tackles (per match)",
    "Interceptions (per match)",
    "Blocks (per match)",
    "Fouls (per match)",
];

const DEFENSE: &[&str] = &[
    "Successful Tackles (per match)",
    "Clearances (per match)",
    "Interceptions (per match)",
    "Blocks (per match)",
    "Fouls (per match)",
    "Yellow Card",
    "Red Card",
];

const GOALKEEPER: &[&str] = &[
    "Saves (per match)",
    "Save Percentage",
    "Clean Sheets",
    "Goals Conceded (per match)",
    "Goals Prevented",
];

static STANDARD: Lazy<MetricCatalog> = Lazy::new(|| {
    MetricCatalog::new([
        (PositionGroup::Forward, FORWARD),
        (PositionGroup::Midfield, MIDFIELD),
        (PositionGroup::Defense, DEFENSE),
        (PositionGroup::Goalkeeper, GOALKEEPER),
    ])
});

/// Which metrics matter for each position group. Immutable once built.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    by_group: HashMap<PositionGroup, Vec<String>>,
    universal: Vec<String>,
}

impl MetricCatalog {
    /// Groups left out of `entries` get an empty metric list.
    pub fn new<I, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PositionGroup, M)>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        let mut by_group: HashMap<PositionGroup, Vec<String>> = PositionGroup::ALL
            .into_iter()
            .map(|g| (g, Vec::new()))
            .collect();
        for (group, metrics) in entries {
            let list = by_group.entry(group).or_default();
            for m in metrics {
                let m = m.as_ref();
                if !list.iter().any(|existing| existing == m) {
                    list.push(m.to_string());
                }
            }
        }
        let universal = by_group
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        Self { by_group, universal }
    }

    pub fn standard() -> &'static MetricCatalog {
        &STANDARD
    }

    pub fn metrics_for(&self, group: PositionGroup) -> &[String] {
        self.by_group.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn metrics_for_id(&self, group_id: &str) -> ScoutResult<&[String]> {
        let group: PositionGroup = group_id.parse()?;
        Ok(self.metrics_for(group))
    }

    /// Sorted union of every group's metrics. Fixed before normalization.
    pub fn universal_metrics(&self) -> &[String] {
        &self.universal
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        STANDARD.clone()
    }
}

pub fn metrics_for_id(group_id: &str) -> ScoutResult<&'static [String]> {
    STANDARD.metrics_for_id(group_id)
}
