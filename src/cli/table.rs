use super::ui;
use crate::core::present::{TableRow, table_rows};
use crate::core::window::format_query_date;
use crate::core::{RateProvider, fetch_table_data, filter_by_substring};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::Cell;

pub async fn run(provider: &dyn RateProvider, date: NaiveDate, search: &str) -> Result<()> {
    let spinner = ui::new_spinner(format!("Fetching rates for {date}"));
    let result = fetch_table_data(provider, date).await;
    spinner.finish_and_clear();
    let snapshot = result.with_context(|| format!("Failed to load rates for {date}"))?;

    let visible = filter_by_substring(&snapshot, search);
    println!("{}", render(date, &table_rows(&visible), snapshot.len()));
    Ok(())
}

/// Renders table rows, noting how many were hidden by the search.
pub fn render(date: NaiveDate, rows: &[TableRow], total: usize) -> String {
    let mut output = format!(
        "Rates for {} {}\n\n",
        ui::style_text(&date.to_string(), ui::StyleType::Title),
        ui::style_text(
            &format!("(date={})", format_query_date(date)),
            ui::StyleType::Subtle
        )
    );

    if total == 0 {
        output.push_str("No rates published for this date.");
        return output;
    }
    if rows.is_empty() {
        output.push_str("No currencies match the search.");
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Code"),
        ui::header_cell("Rate"),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.currency_label),
            Cell::new(&row.currency_code),
            ui::rate_cell(row.rate),
        ]);
    }
    output.push_str(&table.to_string());

    if rows.len() < total {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("{} of {} currencies shown", rows.len(), total),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}
