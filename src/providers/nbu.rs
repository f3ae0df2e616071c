use super::util::with_retry;
use crate::core::config::NbuProviderConfig;
use crate::core::rate::parse_snapshot;
use crate::core::window::format_query_date;
use crate::core::{DailySnapshot, RateError, RateProvider};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, instrument};

const EXCHANGE_PATH: &str = "/NBUStatService/v1/statdirectory/exchange";

/// Official daily rates from the National Bank of Ukraine.
#[derive(Clone)]
pub struct NbuProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl NbuProvider {
    /// Creates a provider that makes exactly one request per date.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxrates/0.1")
            .build()?;
        Ok(NbuProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: 0,
            retry_delay_ms: 0,
        })
    }

    pub fn from_config(config: &NbuProviderConfig) -> Result<Self> {
        Ok(Self::new(&config.base_url)?.with_retry_policy(config.retries, config.retry_delay_ms))
    }

    pub fn with_retry_policy(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    fn exchange_url(&self, date: NaiveDate) -> String {
        format!(
            "{}{}?date={}&json",
            self.base_url,
            EXCHANGE_PATH,
            format_query_date(date)
        )
    }
}

#[async_trait]
impl RateProvider for NbuProvider {
    #[instrument(name = "NbuRateFetch", skip(self), fields(date = %date))]
    async fn fetch_snapshot(&self, date: NaiveDate) -> Result<DailySnapshot, RateError> {
        let url = self.exchange_url(date);
        debug!("Requesting exchange rates from {}", url);

        let transport_error = |message: String| RateError::Transport { date, message };

        let response = with_retry(
            || async { self.client.get(&url).send().await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| transport_error(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(format!("Failed to read response body: {e}")))?;

        let snapshot = parse_snapshot(date, &body)?;
        debug!(records = snapshot.len(), "Received exchange rates");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{filter_by_substring, order_by_priority};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(date: &str, status_code: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EXCHANGE_PATH))
            .and(query_param("date", date))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    const MOCK_JSON: &str = r#"[
        {"r030": 840, "txt": "US Dollar", "rate": 26.5, "cc": "USD", "exchangedate": "02.03.2020"},
        {"r030": 978, "txt": "Euro", "rate": 29.1, "cc": "EUR", "exchangedate": "02.03.2020"},
        {"r030": 643, "txt": "Russian Ruble", "rate": 0.35, "cc": "RUB", "exchangedate": "02.03.2020"}
    ]"#;

    fn march_2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 2).unwrap()
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_server = create_mock_server("20200302", 200, MOCK_JSON).await;
        let provider = NbuProvider::new(&mock_server.uri()).unwrap();

        let snapshot = provider.fetch_snapshot(march_2()).await.unwrap();

        assert_eq!(snapshot.date(), march_2());
        assert_eq!(snapshot.len(), 3);
        let usd = snapshot.find("USD").unwrap();
        assert_eq!(usd.currency_numeric_id, 840);
        assert_eq!(usd.currency_label, "US Dollar");
        assert_eq!(usd.rate, 26.5);

        let ordered = order_by_priority(&snapshot);
        let found: Vec<_> = filter_by_substring(&ordered, "ru").codes().map(String::from).collect();
        assert_eq!(found, vec!["RUB"]);
    }

    #[tokio::test]
    async fn test_weekend_empty_payload() {
        let mock_server = create_mock_server("20200307", 200, "[]").await;
        let provider = NbuProvider::new(&mock_server.uri()).unwrap();

        let date = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
        let snapshot = provider.fetch_snapshot(date).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let mock_server = create_mock_server("20200302", 500, "Server Error").await;
        let provider = NbuProvider::new(&mock_server.uri()).unwrap();

        let err = provider.fetch_snapshot(march_2()).await.unwrap_err();
        assert!(matches!(err, RateError::Transport { .. }), "{err}");
        assert!(err.to_string().contains("500"), "{err}");
    }

    #[tokio::test]
    async fn test_invalid_json_is_transport_error() {
        let mock_server = create_mock_server("20200302", 200, "<html>oops</html>").await;
        let provider = NbuProvider::new(&mock_server.uri()).unwrap();

        let err = provider.fetch_snapshot(march_2()).await.unwrap_err();
        assert!(err.is_transport(), "{err}");
    }

    #[tokio::test]
    async fn test_malformed_entry_is_reported() {
        let body = r#"[{"r030": 840, "txt": "US Dollar", "rate": "n/a", "cc": "USD", "exchangedate": "02.03.2020"}]"#;
        let mock_server = create_mock_server("20200302", 200, body).await;
        let provider = NbuProvider::new(&mock_server.uri()).unwrap();

        let err = provider.fetch_snapshot(march_2()).await.unwrap_err();
        assert!(err.is_malformed(), "{err}");
    }

    #[tokio::test]
    async fn test_retry_policy_repeats_failed_requests() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EXCHANGE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let provider = NbuProvider::from_config(&NbuProviderConfig {
            base_url: mock_server.uri(),
            retries: 2,
            retry_delay_ms: 1,
        })
        .unwrap();

        let err = provider.fetch_snapshot(march_2()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_bad_request_is_not_retried() {
        let mock_server = create_mock_server("20200302", 400, "Wrong parameters format").await;
        let provider = NbuProvider::new(&mock_server.uri())
            .unwrap()
            .with_retry_policy(2, 1);

        let err = provider.fetch_snapshot(march_2()).await.unwrap_err();
        assert!(err.is_transport(), "{err}");
        assert!(err.to_string().contains("400"), "{err}");
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn test_exchange_url_format() {
        let provider = NbuProvider::new("https://bank.gov.ua/").unwrap();
        assert_eq!(
            provider.exchange_url(march_2()),
            "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange?date=20200302&json"
        );
    }
}
