//! View-ready shapes for the rate table and the trend chart

use super::aggregate::CurrencySeries;
use super::rate::DailySnapshot;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Label format for chart X values.
pub const CHART_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Unique within one table; derived from the numeric currency id.
    pub key: String,
    pub currency_label: String,
    pub currency_code: String,
    pub rate: f64,
}

pub fn table_rows(snapshot: &DailySnapshot) -> Vec<TableRow> {
    let mut used = HashSet::with_capacity(snapshot.len());
    snapshot
        .records()
        .iter()
        .map(|record| {
            let base = record.currency_numeric_id.to_string();
            let mut key = base.clone();
            let mut suffix = 1;
            while !used.insert(key.clone()) {
                key = format!("{base}-{suffix}");
                suffix += 1;
            }
            TableRow {
                key,
                currency_label: record.currency_label.clone(),
                currency_code: record.currency_code.clone(),
                rate: record.rate,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    pub currency_code: String,
    pub label: String,
    /// Y values; a day without a published rate charts as 0.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// X values, oldest first.
    pub labels: Vec<String>,
    pub lines: Vec<ChartLine>,
}

pub fn chart_data(series: &[CurrencySeries], date_labels: &[NaiveDate]) -> ChartData {
    ChartData {
        labels: date_labels
            .iter()
            .map(|d| d.format(CHART_DATE_FORMAT).to_string())
            .collect(),
        lines: series
            .iter()
            .map(|s| ChartLine {
                currency_code: s.currency_code.clone(),
                label: format!("Exchange Rate for {}", s.currency_code),
                values: s.points.iter().map(|p| p.rate.unwrap_or(0.0)).collect(),
            })
            .collect(),
    }
}
