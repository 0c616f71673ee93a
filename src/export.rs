use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::pipeline::Projection;
use crate::predict::PredictedOutcome;
use crate::tables::standings_rows;

#[derive(Serialize)]
struct SummaryFile<'a> {
    generated_at: String,
    #[serde(flatten)]
    projection: &'a Projection,
}

pub fn prediction_rows(predictions: &[PredictedOutcome]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Home".to_string(),
        "Away".to_string(),
        "Score".to_string(),
        "Home points".to_string(),
        "Away points".to_string(),
        "Chance".to_string(),
        "Basis".to_string(),
    ]];
    for p in predictions {
        rows.push(vec![
            p.home.clone(),
            p.away.clone(),
            p.label.to_string(),
            p.home_points.to_string(),
            p.away_points.to_string(),
            format!("{:.3}", p.chance),
            format!("{:?}", p.tier),
        ]);
    }
    rows
}

pub fn save_workbook(path: &Path, projection: &Projection) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standings_rows(&projection.standings), &[1])?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &prediction_rows(&projection.predictions), &[0, 1, 2, 6])?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

pub fn save_summary_json(path: &Path, projection: &Projection) -> Result<()> {
    let summary = SummaryFile {
        generated_at: Utc::now().to_rfc3339(),
        projection,
    };
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
    fs::write(&tmp, json).context("write run summary")?;
    fs::rename(&tmp, path).context("swap run summary")?;
    Ok(())
}

/// Row 0 and the `text_cols` are always written as strings; other cells that
/// parse as numbers are written as numbers.
fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>], text_cols: &[usize]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let numeric = row_idx > 0 && !text_cols.contains(&col_idx);
            let written = match value.parse::<f64>() {
                Ok(n) if numeric => worksheet.write_number(r, c, n),
                _ => worksheet.write_string(r, c, value),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
