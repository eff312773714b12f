use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::similarity::SimilarPlayer;

pub struct ExportReport {
    pub rows: usize,
}

/// Write `rows` to a workbook with a "Similar" sheet and a one-line "Query" sheet.
pub fn export_similar_players(path: &Path, target: &str, rows: &[SimilarPlayer]) -> Result<ExportReport> {
    let mut table = vec![vec![
        "Rank".to_string(),
        "Player".to_string(),
        "Age".to_string(),
        "Team".to_string(),
        "Position".to_string(),
        "Market Value".to_string(),
        "Similarity".to_string(),
    ]];
    table.extend(rows.iter().enumerate().map(|(idx, row)| similar_row(idx + 1, row)));

    let query = vec![
        vec!["Target".to_string(), "Generated".to_string(), "Results".to_string()],
        vec![
            target.to_string(),
            chrono::Utc::now().to_rfc3339(),
            rows.len().to_string(),
        ],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Similar").context("name similar sheet")?;
        write_rows(sheet, &table)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Query").context("name query sheet")?;
        write_rows(sheet, &query)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport { rows: rows.len() })
}

fn similar_row(rank: usize, row: &SimilarPlayer) -> Vec<String> {
    vec![
        rank.to_string(),
        row.name.clone(),
        if row.age > 0.0 { row.age.to_string() } else { String::new() },
        row.team.clone(),
        row.position.clone(),
        row.market_value.clone(),
        format!("{:.4}", row.similarity),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
