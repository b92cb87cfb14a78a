use crate::core::{FundProvider, FundRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Client for the public `mfapi.in` scheme NAV endpoint.
pub struct MfApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MfApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mfnav/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(MfApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl FundProvider for MfApiProvider {
    async fn fetch_fund(&self, identifier: &str) -> Result<FundRecord> {
        let url = format!("{}/{}", self.base_url, identifier);
        debug!("Requesting NAV data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("error fetching data from API")?;

        // Status is not checked: unknown schemes still come back as 200 with
        // empty metadata, anything else fails to decode below.
        let body = response
            .bytes()
            .await
            .context("error decoding API response")?;

        let record: FundRecord =
            serde_json::from_slice(&body).context("error decoding API response")?;

        debug!(
            scheme_code = record.meta.scheme_code,
            points = record.data.len(),
            "Fetched NAV data for {}",
            identifier
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mfapi_mock_server(
        scheme_code: &str,
        mock_response: &str,
        status_code: u16,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let expected_path = format!("/mf/{scheme_code}");

        Mock::given(method("GET"))
            .and(path(&expected_path))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;
        mock_server
    }

    const SCHEME_CODE: &str = "119551";
    const MOCK_JSON: &str = r#"{
        "meta": {
            "fund_house": "Aditya Birla Sun Life Mutual Fund",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Debt Scheme - Banking and PSU Fund",
            "scheme_code": 119551,
            "scheme_name": "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW"
        },
        "data": [
            {"date": "15-02-2023", "nav": "107.19090"},
            {"date": "15-01-2023", "nav": "106.87470"}
        ],
        "status": "SUCCESS"
    }"#;

    #[tokio::test]
    async fn test_successful_fund_fetch() {
        let mock_server = create_mfapi_mock_server(SCHEME_CODE, MOCK_JSON, 200).await;
        let provider = MfApiProvider::new(&format!("{}/mf", mock_server.uri())).unwrap();

        let record = provider.fetch_fund(SCHEME_CODE).await.unwrap();

        assert_eq!(record.meta.scheme_code, 119551);
        assert_eq!(record.meta.fund_house, "Aditya Birla Sun Life Mutual Fund");
        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data[1].date, "15-01-2023");
        assert_eq!(record.data[1].nav, "106.87470");
    }

    #[tokio::test]
    async fn test_base_url_with_trailing_slash() {
        let mock_server = create_mfapi_mock_server(SCHEME_CODE, MOCK_JSON, 200).await;
        let provider = MfApiProvider::new(&format!("{}/mf/", mock_server.uri())).unwrap();

        let record = provider.fetch_fund(SCHEME_CODE).await.unwrap();
        assert_eq!(record.meta.scheme_code, 119551);
    }

    #[tokio::test]
    async fn test_unknown_scheme_returns_empty_metadata() {
        let mock_server =
            create_mfapi_mock_server("100", r#"{"meta": {}, "data": [], "status": "SUCCESS"}"#, 200)
                .await;
        let provider = MfApiProvider::new(&format!("{}/mf", mock_server.uri())).unwrap();

        let record = provider.fetch_fund("100").await.unwrap();
        assert!(record.meta.is_empty());
        assert!(record.data.is_empty());
    }

    #[tokio::test]
    async fn test_error_page_fails_to_decode() {
        let mock_server = create_mfapi_mock_server(SCHEME_CODE, "Server Error", 500).await;
        let provider = MfApiProvider::new(&format!("{}/mf", mock_server.uri())).unwrap();

        let err = provider.fetch_fund(SCHEME_CODE).await.unwrap_err();
        assert_eq!(err.to_string(), "error decoding API response");
        assert!(format!("{err:#}").starts_with("error decoding API response: "));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server =
            create_mfapi_mock_server(SCHEME_CODE, r#"{"meta": {"scheme_code": "abc"}}"#, 200)
                .await;
        let provider = MfApiProvider::new(&format!("{}/mf", mock_server.uri())).unwrap();

        let err = provider.fetch_fund(SCHEME_CODE).await.unwrap_err();
        assert_eq!(err.to_string(), "error decoding API response");
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Grab a free port, then release it so nothing is listening there.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let provider = MfApiProvider::new(&format!("http://{addr}/mf")).unwrap();

        let err = provider.fetch_fund(SCHEME_CODE).await.unwrap_err();
        assert_eq!(err.to_string(), "error fetching data from API");
    }
}
