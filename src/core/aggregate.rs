//! Multi-day aggregation of daily snapshots into per-currency series

use super::error::RateError;
use super::provider::RateProvider;
use super::rate::DailySnapshot;
use super::window::RequestWindow;
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// `None` when the currency was not published that day.
    pub rate: Option<f64>,
}

/// One currency's rates across a window, one point per window date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencySeries {
    pub currency_code: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeAggregate {
    pub series: Vec<CurrencySeries>,
    pub snapshots: Vec<DailySnapshot>,
    /// Oldest first; `date_labels[i]` is the date of every series' `points[i]`.
    pub date_labels: Vec<NaiveDate>,
}

/// Fetches every date in `window` concurrently and folds the results.
///
/// All fetches must succeed. The first failure aborts the remaining fetches
/// and is returned wrapped in [`RateError::Aggregation`] with its date.
pub async fn aggregate(
    provider: &dyn RateProvider,
    window: &RequestWindow,
) -> Result<RangeAggregate, RateError> {
    aggregate_with_progress(provider, window, &|_| ()).await
}

/// Same as [`aggregate`], calling `on_fetched` as each day arrives.
pub async fn aggregate_with_progress(
    provider: &dyn RateProvider,
    window: &RequestWindow,
    on_fetched: &(dyn Fn(NaiveDate) + Sync),
) -> Result<RangeAggregate, RateError> {
    let dates = window.dates();
    debug!(
        anchor = %window.anchor(),
        days = dates.len(),
        "Fetching rate window"
    );

    let fetches = dates.into_iter().map(|date| async move {
        let snapshot = provider
            .fetch_snapshot(date)
            .await
            .map_err(|e| RateError::Aggregation {
                date,
                source: Box::new(e),
            })?;
        on_fetched(date);
        Ok::<_, RateError>(snapshot)
    });

    // try_join_all yields results in input order, so date order survives
    // whatever order the fetches complete in.
    let snapshots = try_join_all(fetches).await?;
    Ok(fold_snapshots(snapshots))
}

/// Folds snapshots, already in date order, into per-currency series.
///
/// The oldest snapshot decides which currencies get a series. A currency that
/// only shows up on later days is left out; one that disappears later gets
/// empty points for those days.
pub fn fold_snapshots(snapshots: Vec<DailySnapshot>) -> RangeAggregate {
    let date_labels: Vec<NaiveDate> = snapshots.iter().map(DailySnapshot::date).collect();

    let series = snapshots
        .first()
        .map(|oldest| {
            oldest
                .codes()
                .map(|code| CurrencySeries {
                    currency_code: code.to_string(),
                    points: snapshots
                        .iter()
                        .map(|snapshot| SeriesPoint {
                            date: snapshot.date(),
                            rate: snapshot.find(code).map(|r| r.rate),
                        })
                        .collect(),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    debug!(
        series = series.len(),
        days = date_labels.len(),
        "Folded rate snapshots"
    );

    RangeAggregate {
        series,
        snapshots,
        date_labels,
    }
}
