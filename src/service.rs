use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::dataset::{self, Population};
use crate::error::ScoutResult;
use crate::market_value::parse_market_value;
use crate::metric_catalog::MetricCatalog;
use crate::similarity::{SimilarPlayer, SimilarityEngine, SimilarityQuery};

/// The two lookups the outside world gets: name search and similar players.
#[derive(Debug, Clone)]
pub struct ScoutService {
    engine: SimilarityEngine,
}

impl ScoutService {
    pub fn new(population: Population, catalog: MetricCatalog) -> Self {
        Self {
            engine: SimilarityEngine::new(population, catalog),
        }
    }

    /// Load both tables from `data_dir` and normalize once with the standard catalog.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let population = dataset::load_population(data_dir)?;
        let started = Instant::now();
        let service = Self::new(population, MetricCatalog::default());
        info!(
            "Normalized {} players over {} metrics in {:?}",
            service.player_count(),
            service.engine.table().metric_count(),
            started.elapsed()
        );
        Ok(service)
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    pub fn player_count(&self) -> usize {
        self.engine.population().len()
    }

    pub fn find_by_name_substring(&self, query: &str) -> Vec<String> {
        self.engine.population().search(query)
    }

    /// `value_max_text` goes through the market-value parser; text it cannot read
    /// leaves the value filter off.
    pub fn similar(
        &self,
        player_name: &str,
        top_n: usize,
        age_max: Option<u32>,
        value_max_text: Option<&str>,
    ) -> ScoutResult<Vec<SimilarPlayer>> {
        let query = SimilarityQuery {
            top_n,
            age_max,
            value_max: value_max_text.and_then(parse_market_value),
        };
        self.engine.rank_by_name(player_name, &query)
    }
}
