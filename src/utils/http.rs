use anyhow::Result;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::fingerprint::Fingerprint;
use crate::config::{FetchConfig, SupplierConfig};
use crate::error::StrategyError;

pub fn create_client(fetch: &FetchConfig) -> Result<Client> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .pool_max_idle_per_host(6)
        .build()?;

    Ok(client)
}

/// The supplier's search endpoint with `query` as its search parameter.
pub fn build_search_url(supplier: &SupplierConfig, query: &str) -> Result<String, StrategyError> {
    let mut url = Url::parse(&supplier.search_url).map_err(|e| StrategyError::InvalidUrl {
        url: supplier.search_url.clone(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair(&supplier.query_param, query);
    Ok(url.into())
}

/// One GET presenting `fingerprint`. Non-2xx, timeouts and transport errors
/// all come back as [`StrategyError`].
pub async fn fetch_page(
    client: &Client,
    url: &str,
    fingerprint: &Fingerprint,
    timeout: Duration,
) -> Result<String, StrategyError> {
    debug!("GET {} as {}", url, fingerprint.name);

    let response = client
        .get(url)
        .headers(fingerprint.header_map())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify(url, timeout, e))?;

    let status = response.status();
    if !status.is_success() {
        warn!("HTTP error {}: {}", status, url);
        return Err(StrategyError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    response.text().await.map_err(|e| classify(url, timeout, e))
}

fn classify(url: &str, timeout: Duration, error: reqwest::Error) -> StrategyError {
    if error.is_timeout() {
        StrategyError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        StrategyError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fingerprint::default_fingerprints;
    use tokio_test::assert_err;
    use wiremock::matchers::{header, header_exists, headers, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn supplier(search_url: String) -> SupplierConfig {
        SupplierConfig {
            name: "Grainger".to_string(),
            search_url,
            query_param: "searchQuery".to_string(),
            base_url: "https://www.grainger.com".to_string(),
            attempts: 1,
            human_delay: false,
            timeout_secs: 5,
        }
    }

    #[test]
    fn search_url_encodes_the_query() {
        let url = build_search_url(
            &supplier("https://www.grainger.com/search".to_string()),
            "6203 bearing & seal",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://www.grainger.com/search?searchQuery=6203+bearing+%26+seal"
        );
    }

    #[test]
    fn malformed_search_url_is_rejected() {
        let err = build_search_url(&supplier("not a url".to_string()), "x").unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn sends_fingerprint_headers() {
        let server = MockServer::start().await;
        let fingerprint = default_fingerprints().remove(2);
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("searchQuery", "6203"))
            .and(header("user-agent", fingerprint.user_agent.as_str()))
            .and(headers("accept-language", vec!["en-US", "en;q=0.5"]))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&FetchConfig::default()).unwrap();
        let url = format!("{}/search?searchQuery=6203", server.uri());
        let body = fetch_page(&client, &url, &fingerprint, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = create_client(&FetchConfig::default()).unwrap();
        let fingerprint = default_fingerprints().remove(0);
        let result = fetch_page(&client, &server.uri(), &fingerprint, Duration::from_secs(5)).await;
        let err = assert_err!(result);
        assert!(matches!(err, StrategyError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = create_client(&FetchConfig::default()).unwrap();
        let fingerprint = default_fingerprints().remove(0);
        let err = fetch_page(&client, &server.uri(), &fingerprint, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, StrategyError::Timeout { .. }));
    }

    #[tokio::test]
    async fn catalog_cookies_are_not_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("cookie"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc123; Path=/")
                    .set_body_string("<html>ok</html>"),
            )
            .mount(&server)
            .await;

        let client = create_client(&FetchConfig::default()).unwrap();
        let fingerprint = default_fingerprints().remove(0);
        let url = format!("{}/search", server.uri());

        for _ in 0..2 {
            let body = fetch_page(&client, &url, &fingerprint, Duration::from_secs(5)).await;
            assert_eq!(body.unwrap(), "<html>ok</html>");
        }
    }
}
