use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use super::ImageProvider;

/// Unsplash photo search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    urls: ImageUrls,
}

#[derive(Debug, Deserialize)]
struct ImageUrls {
    #[serde(default)]
    regular: String,
}

/// Client for the Unsplash photo search API
#[derive(Debug)]
pub struct UnsplashClient {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL
    endpoint: String,
    /// Access key; lookups short-circuit to "no image" when empty
    access_key: String,
}

impl UnsplashClient {
    /// Create a new Unsplash client with a bounded request timeout
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
        }
    }
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    async fn lookup(&self, word: &str) -> String {
        if self.access_key.is_empty() {
            debug!("No Unsplash access key configured, skipping image lookup");
            return String::new();
        }

        let api_url = format!("{}/search/photos", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .get(&api_url)
            .query(&[
                ("query", word),
                ("per_page", "1"),
                ("client_id", &self.access_key),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("Unsplash request failed for '{}': {}", word, e);
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "Unsplash returned status {} for '{}'",
                response.status(),
                word
            );
            return String::new();
        }

        match response.json::<SearchResponse>().await {
            Ok(search) => search
                .results
                .into_iter()
                .next()
                .map(|r| r.urls.regular)
                .unwrap_or_default(),
            Err(e) => {
                warn!("Failed to parse Unsplash response for '{}': {}", word, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_withoutAccessKey_shouldReturnEmptyWithoutCalling() {
        // Unreachable endpoint proves the request is never attempted
        let client = UnsplashClient::new(
            "http://192.0.2.1",
            "",
            Duration::from_millis(100),
        );

        assert_eq!(client.lookup("apple").await, "");
    }

    #[tokio::test]
    async fn test_lookup_againstUnreachableEndpoint_shouldReturnEmpty() {
        let client = UnsplashClient::new(
            "http://192.0.2.1",
            "some-key",
            Duration::from_millis(200),
        );

        assert_eq!(client.lookup("apple").await, "");
    }

    #[test]
    fn test_searchResponse_shouldDeserializeFirstResultUrl() {
        let json = r#"{
            "results": [
                {"urls": {"regular": "https://images.example/apple.jpg", "small": "https://images.example/apple-s.jpg"}},
                {"urls": {"regular": "https://images.example/other.jpg"}}
            ]
        }"#;

        let search: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            search.results[0].urls.regular,
            "https://images.example/apple.jpg"
        );
    }

    #[test]
    fn test_searchResponse_withNoResults_shouldBeEmpty() {
        let search: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(search.results.is_empty());
    }
}
