use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{PlayerRecord, Population};
use crate::error::{ScoutError, ScoutResult};
use crate::metric_catalog::MetricCatalog;
use crate::normalize::NormalizedTable;
use crate::position::classify;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityQuery {
    pub top_n: usize,
    /// Inclusive; players with unknown age are dropped when set.
    pub age_max: Option<u32>,
    /// Inclusive; players with unknown market value are dropped when set.
    pub value_max: Option<f64>,
}

impl Default for SimilarityQuery {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            age_max: None,
            value_max: None,
        }
    }
}

impl SimilarityQuery {
    pub fn top(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }
}

/// One ranked peer, shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPlayer {
    #[serde(rename = "Name")]
    pub name: String,
    /// 0 when unknown.
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "PrimaryPosition")]
    pub position: String,
    #[serde(rename = "MarketValue")]
    pub market_value: String,
    #[serde(rename = "Similarity")]
    pub similarity: f64,
}

impl SimilarPlayer {
    fn from_record(p: &PlayerRecord, similarity: f64) -> Self {
        Self {
            name: p.name.clone(),
            age: p.age.unwrap_or(0.0),
            team: p.team.clone(),
            position: p.position.clone(),
            market_value: p.market_value_raw.clone(),
            similarity,
        }
    }
}

/// Ranks peers against a fixed population. Everything inside is read-only after
/// construction, so one engine can serve concurrent queries behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    population: Population,
    catalog: MetricCatalog,
    table: NormalizedTable,
}

impl SimilarityEngine {
    /// Standardizes the whole population over the catalog's universal metric set.
    pub fn new(population: Population, catalog: MetricCatalog) -> Self {
        let table = NormalizedTable::build(&population, catalog.universal_metrics());
        debug!(
            players = population.len(),
            metrics = table.metric_count(),
            "normalized population"
        );
        Self::from_parts(population, catalog, table)
    }

    pub fn from_parts(population: Population, catalog: MetricCatalog, table: NormalizedTable) -> Self {
        Self {
            population,
            catalog,
            table,
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn rank_by_name(&self, name: &str, query: &SimilarityQuery) -> ScoutResult<Vec<SimilarPlayer>> {
        let idx = self
            .population
            .find_by_name(name)
            .ok_or_else(|| ScoutError::PlayerNotFound(name.to_string()))?;
        self.rank(idx, query)
    }

    pub fn rank_by_id(&self, id: &str, query: &SimilarityQuery) -> ScoutResult<Vec<SimilarPlayer>> {
        let idx = self
            .population
            .players()
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ScoutError::PlayerNotFound(id.to_string()))?;
        self.rank(idx, query)
    }

    /// Top peers of the player at `target_idx`, scored on the target group's metrics.
    /// Candidates of any group are eligible; the group only picks the metrics.
    pub fn rank(&self, target_idx: usize, query: &SimilarityQuery) -> ScoutResult<Vec<SimilarPlayer>> {
        let target = self
            .population
            .get(target_idx)
            .ok_or_else(|| ScoutError::PlayerNotFound(format!("#{target_idx}")))?;
        let group = classify(&target.position);
        let metrics = self.catalog.metrics_for(group);
        let target_vec = self.table.vector(target_idx, metrics);

        let candidates: Vec<usize> = self
            .population
            .players()
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != target_idx)
            .filter(|(_, p)| passes_age(p, query.age_max))
            .filter(|(_, p)| passes_value(p, query.value_max))
            .map(|(idx, _)| idx)
            .collect();

        debug!(
            player = %target.name,
            %group,
            candidates = candidates.len(),
            "ranking similar players"
        );
        if candidates.is_empty() || query.top_n == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f64)> = candidates
            .into_iter()
            .map(|idx| {
                let v = self.table.vector(idx, metrics);
                (idx, cosine_similarity(&v, &target_vec))
            })
            .collect();
        // Stable: equal scores keep population order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(query.top_n);

        Ok(scored
            .into_iter()
            .filter_map(|(idx, sim)| self.population.get(idx).map(|p| SimilarPlayer::from_record(p, sim)))
            .collect())
    }
}

fn passes_age(p: &PlayerRecord, age_max: Option<u32>) -> bool {
    let Some(max) = age_max else { return true };
    p.age.is_some_and(|a| a > 0.0 && a <= f64::from(max))
}

fn passes_value(p: &PlayerRecord, value_max: Option<f64>) -> bool {
    let Some(max) = value_max else { return true };
    p.market_value.is_some_and(|v| v > 0.0 && v <= max)
}

/// Cosine of the angle between `a` and `b`. Zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let sim = dot / (na.sqrt() * nb.sqrt());
    if sim.is_finite() {
        // Also folds -0.0 into 0.0.
        sim.clamp(-1.0, 1.0) + 0.0
    } else {
        0.0
    }
}
