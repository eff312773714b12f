use std::collections::HashMap;

use rayon::prelude::*;

use crate::dataset::Population;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Population z-scores for every (player, metric) pair, computed once.
///
/// Absent raw values count as 0 before standardizing. A constant column scores 0 for
/// every player.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    metric_index: HashMap<String, usize>,
    stats: Vec<ColumnStats>,
    // Column-major: columns[metric][player].
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl NormalizedTable {
    pub fn build(population: &Population, metrics: &[String]) -> Self {
        let players = population.players();
        let computed: Vec<(ColumnStats, Vec<f64>)> = metrics
            .par_iter()
            .map(|metric| {
                let raw: Vec<f64> = players
                    .iter()
                    .map(|p| p.metric(metric).unwrap_or(0.0))
                    .collect();
                standardize_column(&raw)
            })
            .collect();

        let mut metric_index = HashMap::with_capacity(metrics.len());
        let mut stats = Vec::with_capacity(metrics.len());
        let mut columns = Vec::with_capacity(metrics.len());
        for (metric, (col_stats, column)) in metrics.iter().zip(computed) {
            if metric_index.contains_key(metric) {
                continue;
            }
            metric_index.insert(metric.clone(), columns.len());
            stats.push(col_stats);
            columns.push(column);
        }

        Self {
            metric_index,
            stats,
            columns,
            rows: players.len(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn metric_count(&self) -> usize {
        self.columns.len()
    }

    pub fn stats(&self, metric: &str) -> Option<ColumnStats> {
        self.metric_index.get(metric).map(|&i| self.stats[i])
    }

    pub fn column(&self, metric: &str) -> Option<&[f64]> {
        self.metric_index.get(metric).map(|&i| self.columns[i].as_slice())
    }

    pub fn score(&self, player_idx: usize, metric: &str) -> Option<f64> {
        self.column(metric).and_then(|col| col.get(player_idx).copied())
    }

    /// Scores for one player over `metrics`, in order. Unknown metrics read as 0.
    pub fn vector(&self, player_idx: usize, metrics: &[String]) -> Vec<f64> {
        metrics
            .iter()
            .map(|m| self.score(player_idx, m).unwrap_or(0.0))
            .collect()
    }
}

fn standardize_column(raw: &[f64]) -> (ColumnStats, Vec<f64>) {
    if raw.is_empty() {
        return (ColumnStats { mean: 0.0, std_dev: 0.0 }, Vec::new());
    }
    let n = raw.len() as f64;
    let mean = raw.iter().sum::<f64>() / n;
    // Summation rounding can leave a tiny nonzero spread on a constant column.
    if raw.iter().all(|v| *v == raw[0]) {
        return (ColumnStats { mean, std_dev: 0.0 }, vec![0.0; raw.len()]);
    }
    let var = raw
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std_dev = var.sqrt();
    let column = if std_dev > 0.0 && std_dev.is_finite() {
        raw.iter().map(|v| (v - mean) / std_dev).collect()
    } else {
        vec![0.0; raw.len()]
    };
    (ColumnStats { mean, std_dev }, column)
}
