//! Entry points used by the table and chart views

use super::aggregate::{CurrencySeries, aggregate};
use super::error::RateError;
use super::ordering::order_by_priority;
use super::provider::RateProvider;
use super::rate::DailySnapshot;
use super::window::RequestWindow;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub series: Vec<CurrencySeries>,
    pub date_labels: Vec<NaiveDate>,
}

/// Fetches one day in priority order. Filtering is left to the caller.
pub async fn fetch_table_data(
    provider: &dyn RateProvider,
    date: NaiveDate,
) -> Result<DailySnapshot, RateError> {
    let window = RequestWindow::single(date);
    let snapshot = provider.fetch_snapshot(window.anchor()).await?;
    debug!(
        date = %window.anchor(),
        records = snapshot.len(),
        "Fetched table data"
    );
    Ok(order_by_priority(&snapshot))
}

/// Fetches the chart window ending at `anchor`.
pub async fn fetch_chart_data(
    provider: &dyn RateProvider,
    anchor: NaiveDate,
) -> Result<ChartSeries, RateError> {
    let result = aggregate(provider, &RequestWindow::chart(anchor)).await?;
    Ok(ChartSeries {
        series: result.series,
        date_labels: result.date_labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::tests::MockRateProvider;
    use chrono::Duration;

    #[tokio::test]
    async fn test_fetch_table_data_is_ordered() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        let provider =
            MockRateProvider::new().with_day(date, vec![("RUB", 0.35), ("EUR", 29.1), ("USD", 26.5)]);

        let snapshot = fetch_table_data(&provider, date).await.unwrap();
        assert_eq!(snapshot.codes().collect::<Vec<_>>(), vec!["USD", "EUR", "RUB"]);
    }

    #[tokio::test]
    async fn test_fetch_table_data_empty_day() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
        let snapshot = fetch_table_data(&MockRateProvider::new(), date)
            .await
            .unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_table_data_propagates_transport_error() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        let mut provider = MockRateProvider::new();
        provider.failing = Some(date);

        let err = fetch_table_data(&provider, date).await.unwrap_err();
        assert!(matches!(err, RateError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_chart_data_covers_seven_days() {
        let anchor = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        let mut provider = MockRateProvider::new();
        for offset in 0..7 {
            provider = provider.with_day(anchor - Duration::days(offset), vec![("USD", 26.5)]);
        }

        let chart = fetch_chart_data(&provider, anchor).await.unwrap();
        assert_eq!(chart.date_labels.len(), 7);
        assert_eq!(chart.date_labels[6], anchor);
        assert_eq!(chart.series.len(), 1);
        assert!(chart.series[0].points.iter().all(|p| p.rate == Some(26.5)));
    }
}
