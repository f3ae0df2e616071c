//! Request lifecycle for the point-in-time rate table

use super::engine::fetch_table_data;
use super::error::RateError;
use super::ordering::filter_by_substring;
use super::present::{TableRow, table_rows};
use super::provider::RateProvider;
use super::rate::DailySnapshot;
use chrono::NaiveDate;
use tracing::debug;

/// Identifies one table request. Later requests always get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub enum TableState {
    #[default]
    Idle,
    Loading {
        token: RequestToken,
        date: NaiveDate,
    },
    Ready {
        token: RequestToken,
        date: NaiveDate,
        snapshot: DailySnapshot,
    },
    Failed {
        token: RequestToken,
        date: NaiveDate,
        error: RateError,
    },
}

impl TableState {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TableState::Idle => None,
            TableState::Loading { date, .. }
            | TableState::Ready { date, .. }
            | TableState::Failed { date, .. } => Some(*date),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, TableState::Loading { .. })
    }
}

/// Owns the table state for one view.
///
/// Only the most recent request may change the state: a response carrying an
/// older token is dropped when it arrives.
#[derive(Debug, Default)]
pub struct TableController {
    state: TableState,
    last_token: u64,
}

impl TableController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Starts a request for `date`, superseding any request in flight.
    pub fn request(&mut self, date: NaiveDate) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        debug!(?token, %date, "Table request started");
        self.state = TableState::Loading { token, date };
        token
    }

    /// Applies the outcome of the request identified by `token`.
    ///
    /// Returns `false` when the response is stale or already applied.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<DailySnapshot, RateError>,
    ) -> bool {
        let date = match &self.state {
            TableState::Loading {
                token: current,
                date,
            } if *current == token => *date,
            _ => {
                debug!(?token, "Discarding stale table response");
                return false;
            }
        };

        self.state = match result {
            Ok(snapshot) => TableState::Ready {
                token,
                date,
                snapshot,
            },
            Err(error) => TableState::Failed { token, date, error },
        };
        true
    }

    /// Requests `date` and waits for it.
    pub async fn load(&mut self, provider: &dyn RateProvider, date: NaiveDate) -> &TableState {
        let token = self.request(date);
        let result = fetch_table_data(provider, date).await;
        self.resolve(token, result);
        &self.state
    }

    /// The ready snapshot filtered by `query`, or `None` outside `Ready`.
    pub fn visible(&self, query: &str) -> Option<DailySnapshot> {
        match &self.state {
            TableState::Ready { snapshot, .. } => Some(filter_by_substring(snapshot, query)),
            _ => None,
        }
    }

    pub fn rows(&self, query: &str) -> Vec<TableRow> {
        self.visible(query)
            .map(|snapshot| table_rows(&snapshot))
            .unwrap_or_default()
    }
}
