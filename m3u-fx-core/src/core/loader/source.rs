use std::fmt::Debug;

use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::core::config::PlayerSettings;
use crate::core::{Error, Result};

/// The source of remote playlist documents.
#[async_trait]
pub trait ContentSource: Debug + Send + Sync {
    /// Retrieve the text of the document at the given url.
    ///
    /// # Returns
    ///
    /// It returns the document text, or [Error::FetchFailure] when the document couldn't be retrieved.
    async fn fetch_text(&self, url: String) -> Result<String>;
}

/// A [ContentSource] which retrieves the documents over HTTP(S).
#[derive(Debug)]
pub struct HttpContentSource {
    client: Client,
}

impl HttpContentSource {
    /// Create a new http content source which uses the user agent and timeout of the given settings.
    pub fn new(settings: &PlayerSettings) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(5))
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.fetch_timeout())
            .build()
            .map_err(|e| Error::FetchFailure(format!("failed to create http client, {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_text(&self, url: String) -> Result<String> {
        trace!("Retrieving playlist document {}", url);
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to retrieve playlist document {}, {}", url, e);
                Error::FetchFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Playlist document {} responded with status {}", url, status);
            return Err(Error::FetchFailure(format!(
                "HTTP error! Status: {}",
                status.as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::FetchFailure(e.to_string()))?;
        debug!("Retrieved playlist document {} ({} bytes)", url, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use httpmock::MockServer;

    use crate::init_logger;

    use super::*;

    #[tokio::test]
    async fn test_fetch_text() {
        init_logger!();
        let server = MockServer::start_async().await;
        let settings = PlayerSettings::default();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/radio/list.m3u")
                    .header("user-agent", settings.user_agent.as_str());
                then.status(200)
                    .header("content-type", "audio/x-mpegurl")
                    .body("#EXTM3U\n#EXTINF:-1,Track A\na.mp3\n");
            })
            .await;
        let source = HttpContentSource::new(&settings).unwrap();

        let result = source
            .fetch_text(server.url("/radio/list.m3u"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!("#EXTM3U\n#EXTINF:-1,Track A\na.mp3\n", result);
    }

    #[tokio::test]
    async fn test_fetch_text_status_error() {
        init_logger!();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/list.m3u");
                then.status(404);
            })
            .await;
        let source = HttpContentSource::new(&PlayerSettings::default()).unwrap();

        let result = source.fetch_text(server.url("/list.m3u")).await;

        assert_eq!(
            Err(Error::FetchFailure("HTTP error! Status: 404".to_string())),
            result
        );
    }

    #[tokio::test]
    async fn test_fetch_text_unreachable() {
        init_logger!();
        let source = HttpContentSource::new(&PlayerSettings::default()).unwrap();

        let result = source
            .fetch_text("http://localhost:1/list.m3u".to_string())
            .await;

        assert!(
            matches!(result, Err(Error::FetchFailure(_))),
            "expected Error::FetchFailure, got {:?} instead",
            result
        );
    }
}
