use super::ui;
use crate::core::aggregate::aggregate_with_progress;
use crate::core::present::{CHART_DATE_FORMAT, chart_data};
use crate::core::{
    CurrencySeries, RangeAggregate, RateProvider, RequestWindow, filter_by_substring,
    order_by_priority,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::Cell;

pub async fn run(
    provider: &dyn RateProvider,
    anchor: NaiveDate,
    search: &str,
    pinned: &[String],
    json: bool,
) -> Result<()> {
    let window = RequestWindow::chart(anchor);
    let pb = ui::new_progress_bar(u64::from(window.lookback_days()), true);
    pb.set_message("Fetching rates");
    let result = aggregate_with_progress(provider, &window, &|_| pb.inc(1)).await;
    pb.finish_and_clear();
    let result = result.with_context(|| format!("Failed to load rates for week ending {anchor}"))?;

    let series = select_series(&result, search, pinned);
    if json {
        let chart = chart_data(&series, &result.date_labels);
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        println!("{}", render(&series, &result.date_labels));
    }
    Ok(())
}

/// Picks the series to show: priority order, matching `search` against the
/// oldest day's codes and labels, and limited to `pinned` when it is set.
pub fn select_series(
    result: &RangeAggregate,
    search: &str,
    pinned: &[String],
) -> Vec<CurrencySeries> {
    let Some(oldest) = result.snapshots.first() else {
        return Vec::new();
    };

    let visible = filter_by_substring(&order_by_priority(oldest), search);
    visible
        .codes()
        .filter(|code| pinned.is_empty() || pinned.iter().any(|p| p.as_str() == *code))
        .filter_map(|code| {
            result
                .series
                .iter()
                .find(|s| s.currency_code == code)
                .cloned()
        })
        .collect()
}

pub fn render(series: &[CurrencySeries], date_labels: &[NaiveDate]) -> String {
    let (Some(first), Some(last)) = (date_labels.first(), date_labels.last()) else {
        return "No dates requested.".to_string();
    };

    let mut output = format!(
        "Exchange rates {} to {}\n\n",
        ui::style_text(&first.to_string(), ui::StyleType::Title),
        ui::style_text(&last.to_string(), ui::StyleType::Title)
    );

    if series.is_empty() {
        output.push_str("No currencies to chart.");
        return output;
    }

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Code")];
    header.extend(
        date_labels
            .iter()
            .map(|d| ui::header_cell(&d.format(CHART_DATE_FORMAT).to_string())),
    );
    table.set_header(header);

    for s in series {
        let mut row = vec![Cell::new(&s.currency_code)];
        let mut previous = None;
        for point in &s.points {
            row.push(match point.rate {
                Some(rate) => ui::trend_cell(rate, previous),
                None => ui::na_cell(),
            });
            if point.rate.is_some() {
                previous = point.rate;
            }
        }
        table.add_row(row);
    }

    output.push_str(&table.to_string());
    output
}
