//! Rate records and daily snapshots

use super::error::RateError;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Date format used by the rate service inside `exchangedate`.
const EXCHANGE_DATE_FORMAT: &str = "%d.%m.%Y";

/// One currency's official rate on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRecord {
    pub currency_numeric_id: i64,
    pub currency_label: String,
    pub currency_code: String,
    pub rate: f64,
    pub date: NaiveDate,
}

impl RateRecord {
    /// Builds a record from one element of the service payload.
    ///
    /// Expected shape: `{ r030: integer, txt: string, rate: number, cc: string,
    /// exchangedate: "DD.MM.YYYY" }`. Unknown keys are ignored.
    pub fn normalize(raw: &Value) -> Result<Self, RateError> {
        let entry = raw
            .as_object()
            .ok_or_else(|| RateError::malformed("entry is not an object"))?;

        let currency_numeric_id = field(entry, "r030")?
            .as_i64()
            .ok_or_else(|| RateError::malformed("field `r030` is not an integer"))?;

        let currency_label = field(entry, "txt")?
            .as_str()
            .ok_or_else(|| RateError::malformed("field `txt` is not a string"))?
            .trim()
            .to_string();

        let rate = field(entry, "rate")?
            .as_f64()
            .ok_or_else(|| RateError::malformed("field `rate` is not a number"))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateError::malformed(format!(
                "field `rate` must be positive, got {rate}"
            )));
        }

        let currency_code = parse_code(
            field(entry, "cc")?
                .as_str()
                .ok_or_else(|| RateError::malformed("field `cc` is not a string"))?,
        )?;

        let date_str = field(entry, "exchangedate")?
            .as_str()
            .ok_or_else(|| RateError::malformed("field `exchangedate` is not a string"))?;
        let date = NaiveDate::parse_from_str(date_str.trim(), EXCHANGE_DATE_FORMAT).map_err(|e| {
            RateError::malformed(format!("field `exchangedate` '{date_str}' is invalid: {e}"))
        })?;

        Ok(RateRecord {
            currency_numeric_id,
            currency_label,
            currency_code,
            rate,
            date,
        })
    }
}

fn field<'a>(entry: &'a Map<String, Value>, name: &str) -> Result<&'a Value, RateError> {
    match entry.get(name) {
        Some(Value::Null) | None => Err(RateError::malformed(format!("missing field `{name}`"))),
        Some(value) => Ok(value),
    }
}

fn parse_code(raw: &str) -> Result<String, RateError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(RateError::malformed("field `cc` is empty"));
    }
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RateError::malformed(format!(
            "field `cc` '{code}' is not a 3-letter currency code"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// All rates published for one requested date, in a defined order.
///
/// Records are immutable; ordering and filtering produce new snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySnapshot {
    date: NaiveDate,
    records: Vec<RateRecord>,
}

impl DailySnapshot {
    /// Creates a snapshot, checking that currency codes are unique and that
    /// every record carries the same exchange date.
    pub fn new(date: NaiveDate, records: Vec<RateRecord>) -> Result<Self, RateError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.currency_code.as_str()) {
                return Err(RateError::malformed(format!(
                    "duplicate currency code {} for {date}",
                    record.currency_code
                )));
            }
        }

        if let Some(first) = records.first()
            && let Some(other) = records.iter().find(|r| r.date != first.date)
        {
            return Err(RateError::malformed(format!(
                "mixed exchange dates {} and {} in one snapshot",
                first.date, other.date
            )));
        }

        Ok(Self { date, records })
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            records: Vec::new(),
        }
    }

    /// Builds a derived snapshot from records already validated by `new`.
    pub(crate) fn derived(&self, records: Vec<RateRecord>) -> Self {
        Self {
            date: self.date,
            records,
        }
    }

    /// The date this snapshot was requested for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, currency_code: &str) -> Option<&RateRecord> {
        self.records
            .iter()
            .find(|r| r.currency_code == currency_code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.currency_code.as_str())
    }
}

/// Parses a raw service response body for `date` into a snapshot.
///
/// A body that is not a JSON array is a transport failure; an array element
/// that does not normalize is a malformed record. An empty array is a day
/// without published rates.
pub fn parse_snapshot(date: NaiveDate, body: &str) -> Result<DailySnapshot, RateError> {
    let entries: Vec<Value> = serde_json::from_str(body).map_err(|e| RateError::Transport {
        date,
        message: format!("invalid JSON payload: {e}"),
    })?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            RateRecord::normalize(entry).map_err(|e| match e {
                RateError::MalformedRecord(reason) => {
                    RateError::malformed(format!("entry {i}: {reason}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    DailySnapshot::new(date, records)
}
