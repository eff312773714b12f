use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::market_value::RawMarketValue;
use crate::position::{PositionGroup, classify};

pub const STATS_FILE: &str = "player_stats.json";
pub const METADATA_FILE: &str = "player_metadata.json";

const ABSENT_VALUE: &str = "—";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub position: String,
    pub group: PositionGroup,
    pub team: String,
    /// Kept unrounded; exports often carry fractional ages.
    pub age: Option<f64>,
    pub market_value_raw: String,
    pub market_value: Option<f64>,
    /// Absent metrics are missing keys, not zeros.
    pub metrics: HashMap<String, f64>,
}

impl PlayerRecord {
    /// Bare record for synthetic populations; the group is classified from `position`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: impl Into<String>) -> Self {
        let position = position.into();
        Self {
            id: id.into(),
            name: name.into(),
            group: classify(&position),
            position,
            team: String::new(),
            age: None,
            market_value_raw: ABSENT_VALUE.to_string(),
            market_value: None,
            metrics: HashMap::new(),
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    pub fn with_age(mut self, age: impl Into<f64>) -> Self {
        self.age = Some(age.into());
        self
    }

    pub fn with_market_value(mut self, raw: &str) -> Self {
        self.market_value_raw = raw.to_string();
        self.market_value = crate::market_value::parse_market_value(raw);
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// The fixed player snapshot. Order is the load order and is used for tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct Population {
    players: Vec<PlayerRecord>,
}

impl Population {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn get(&self, idx: usize) -> Option<&PlayerRecord> {
        self.players.get(idx)
    }

    /// Index of the first player whose display name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Display names containing `query`, case-insensitively, in population order.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MetadataRow {
    #[serde(rename = "PlayerID", default)]
    player_id: Value,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "PrimaryPosition", default)]
    primary_position: Option<String>,
    #[serde(rename = "Team", default)]
    team: Option<String>,
    #[serde(rename = "Age", default)]
    age: Value,
    #[serde(rename = "MarketValue", default)]
    market_value: Option<RawMarketValue>,
}

pub fn load_population(data_dir: &Path) -> Result<Population> {
    let stats_path = data_dir.join(STATS_FILE);
    let meta_path = data_dir.join(METADATA_FILE);
    info!("Loading player tables from {}", data_dir.display());

    let stats_raw = fs::read_to_string(&stats_path)
        .with_context(|| format!("read {}", stats_path.display()))?;
    let meta_raw = fs::read_to_string(&meta_path)
        .with_context(|| format!("read {}", meta_path.display()))?;

    let players = merge_player_tables_json(&stats_raw, &meta_raw)?;
    info!("Loaded {} players", players.len());
    Ok(Population::new(players))
}

/// Left-join the stats table onto the metadata table by `PlayerID`.
/// Every stats row yields exactly one player, in stats order.
pub fn merge_player_tables_json(stats_raw: &str, meta_raw: &str) -> Result<Vec<PlayerRecord>> {
    let stats: Vec<Map<String, Value>> =
        serde_json::from_str(stats_raw).context("parse player stats json")?;
    let meta: Vec<MetadataRow> =
        serde_json::from_str(meta_raw).context("parse player metadata json")?;

    let mut meta_by_id: HashMap<String, MetadataRow> = HashMap::new();
    for row in meta {
        let Some(id) = id_key(&row.player_id) else {
            warn!("Skipping metadata row without a usable PlayerID");
            continue;
        };
        if meta_by_id.contains_key(&id) {
            debug!("Duplicate metadata for PlayerID {id}; keeping the first row");
            continue;
        }
        meta_by_id.insert(id, row);
    }

    let mut players = Vec::with_capacity(stats.len());
    for (row_idx, row) in stats.iter().enumerate() {
        let id = row
            .get("PlayerID")
            .and_then(id_key)
            .ok_or_else(|| anyhow!("stats row {row_idx} has no PlayerID"))?;
        let meta = meta_by_id.get(&id).cloned().unwrap_or_default();
        players.push(build_record(id, row, meta));
    }
    Ok(players)
}

fn build_record(id: String, stats: &Map<String, Value>, meta: MetadataRow) -> PlayerRecord {
    let name = meta
        .name
        .or_else(|| stats.get("Player").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();
    let position = meta.primary_position.unwrap_or_default();
    let age = age_value(&meta.age);
    let (market_value_raw, market_value) = match meta.market_value {
        Some(raw) => (raw.display(), raw.parsed()),
        None => (ABSENT_VALUE.to_string(), None),
    };
    let metrics = stats
        .iter()
        .filter(|(key, _)| key.as_str() != "PlayerID")
        .filter_map(|(key, value)| metric_value(value).map(|v| (key.clone(), v)))
        .collect();

    PlayerRecord {
        id,
        name,
        group: classify(&position),
        position,
        team: meta.team.unwrap_or_default(),
        age,
        market_value_raw,
        market_value,
        metrics,
    }
}

// Ages arrive as ints, floats ("24.0") or strings depending on the export.
fn age_value(value: &Value) -> Option<f64> {
    let age = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (age.is_finite() && age > 0.0).then_some(age)
}

fn metric_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn id_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None => n.as_f64().filter(|f| f.fract() == 0.0).map(|f| format!("{f:.0}")),
        },
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
