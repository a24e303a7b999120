use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::loader::ContentSource;
use crate::core::playback::PlaybackController;
use crate::core::playlist;
use crate::core::{Error, Result};

/// The input surface of the player, it loads playlists from pasted text or remote urls
/// into the [PlaybackController].
///
/// Every failure is reported to the controller, so it reaches the presentation layer,
/// and is returned to the caller as well.
#[derive(Debug)]
pub struct PlaylistLoader {
    controller: Arc<PlaybackController>,
    source: Box<dyn ContentSource>,
}

impl PlaylistLoader {
    pub fn new(controller: Arc<PlaybackController>, source: Box<dyn ContentSource>) -> Self {
        Self { controller, source }
    }

    /// Load the given playlist text.
    /// Locations within the text are used as-is, as the text has no known base location.
    ///
    /// # Returns
    ///
    /// It returns the number of loaded entries.
    pub fn load_from_text(&self, text: &str) -> Result<usize> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.reject(Error::EmptySource));
        }

        debug!("Loading playlist from text");
        self.load(playlist::parse(text, None))
    }

    /// Retrieve the playlist at the given url and load it.
    /// Relative locations within the playlist are resolved against the url.
    ///
    /// # Returns
    ///
    /// It returns the number of loaded entries.
    pub async fn load_from_url(&self, url: &str) -> Result<usize> {
        let url = url.trim();
        if url.is_empty() {
            return Err(self.reject(Error::EmptySource));
        }

        debug!("Loading playlist from {}", url);
        let result = match self.source.fetch_text(url.to_string()).await {
            Ok(text) => playlist::parse(text.as_str(), Some(url)),
            Err(e) => Err(e),
        };

        self.load(result)
    }

    fn load(&self, result: Result<Vec<playlist::Entry>>) -> Result<usize> {
        match result.and_then(|e| if e.is_empty() { Err(Error::EmptyParse) } else { Ok(e) }) {
            Ok(entries) => {
                let len = entries.len();
                info!("Loading playlist with {} entries", len);
                self.controller.load_playlist(entries);
                Ok(len)
            }
            Err(e) => {
                let err = self.reject(e);
                // leave the player in a defined state
                self.controller.load_playlist(vec![]);
                Err(err)
            }
        }
    }

    fn reject(&self, err: Error) -> Error {
        warn!("Failed to load playlist, {}", err);
        self.controller.report(err.clone());
        err
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fx_callback::{Callback, MultiThreadedCallback};

    use crate::core::config::PlayerSettings;
    use crate::core::playback::{PlaybackEvent, PlaybackState};
    use crate::core::players::EngineEvent;
    use crate::testing::{MockContentSource, MockPlaybackEngine};
    use crate::{assert_timeout, assert_timeout_eq, init_logger, recv_timeout};

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(500);

    fn create_controller(engine_callbacks: &MultiThreadedCallback<EngineEvent>) -> Arc<PlaybackController> {
        let subscription = engine_callbacks.subscribe();
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_subscribe()
            .times(1)
            .return_once(move || subscription);
        engine.expect_set_source().return_const(());
        engine.expect_play().returning(|| Ok(()));
        engine.expect_pause().return_const(());
        engine.expect_set_position().return_const(());

        Arc::new(PlaybackController::new(
            Arc::new(Box::new(engine)),
            PlayerSettings {
                auto_play: false,
                ..Default::default()
            },
        ))
    }

    #[tokio::test]
    async fn test_load_from_text() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut source = MockContentSource::new();
        source.expect_fetch_text().times(0);
        let loader = PlaylistLoader::new(controller.clone(), Box::new(source));

        let result = loader.load_from_text("  #EXTM3U\n#EXTINF:-1,Track A\na.mp3\nb.mp3\n  ");

        assert_eq!(Ok(2), result);
        assert_timeout!(
            TIMEOUT,
            controller.snapshot().await.entries().len() == 2,
            "expected the playlist to have been loaded"
        );
        assert_eq!(PlaybackState::Stopped, controller.state().await);
        let snapshot = controller.snapshot().await;
        assert_eq!("Track A", snapshot.entries()[0].title());
        assert_eq!("b.mp3", snapshot.entries()[1].location());
    }

    #[tokio::test]
    async fn test_load_from_text_empty() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut receiver = controller.subscribe();
        let loader = PlaylistLoader::new(controller.clone(), Box::new(MockContentSource::new()));

        let result = loader.load_from_text(" \n\t ");

        assert_eq!(Err(Error::EmptySource), result);
        let result = recv_timeout!(&mut receiver, TIMEOUT);
        assert_eq!(PlaybackEvent::Error(Error::EmptySource), *result);
        assert_eq!(PlaybackState::Empty, controller.state().await);
    }

    #[tokio::test]
    async fn test_load_from_text_without_entries() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let loader = PlaylistLoader::new(controller.clone(), Box::new(MockContentSource::new()));
        loader.load_from_text("a.mp3").unwrap();
        assert_timeout_eq!(TIMEOUT, PlaybackState::Stopped, controller.state().await);
        let mut receiver = controller.subscribe();

        let result = loader.load_from_text("#EXTM3U\n#EXTINF:-1,Track A\n");

        assert_eq!(Err(Error::EmptyParse), result);
        let result = recv_timeout!(&mut receiver, TIMEOUT);
        assert_eq!(PlaybackEvent::Error(Error::EmptyParse), *result);
        let result = recv_timeout!(&mut receiver, TIMEOUT);
        assert_eq!(PlaybackEvent::PlaylistChanged, *result);
        assert_timeout_eq!(TIMEOUT, PlaybackState::Empty, controller.state().await);
        assert_eq!(0, controller.snapshot().await.entries().len());
    }

    #[tokio::test]
    async fn test_load_from_url() {
        init_logger!();
        let url = "http://localhost:8080/radio/list.m3u";
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut source = MockContentSource::new();
        source
            .expect_fetch_text()
            .withf(move |e| e == url)
            .times(1)
            .returning(|_| Ok("#EXTINF:-1,Track A\na.mp3\n/b.mp3\nhttp://cdn/c.mp3".to_string()));
        let loader = PlaylistLoader::new(controller.clone(), Box::new(source));

        let result = loader.load_from_url(format!("  {}  ", url).as_str()).await;

        assert_eq!(Ok(3), result);
        assert_timeout_eq!(TIMEOUT, PlaybackState::Stopped, controller.state().await);
        let snapshot = controller.snapshot().await;
        let locations = snapshot
            .entries()
            .iter()
            .map(|e| e.location())
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "http://localhost:8080/radio/a.mp3",
                "http://localhost:8080/b.mp3",
                "http://cdn/c.mp3",
            ],
            locations
        );
    }

    #[tokio::test]
    async fn test_load_from_url_empty() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut source = MockContentSource::new();
        source.expect_fetch_text().times(0);
        let loader = PlaylistLoader::new(controller.clone(), Box::new(source));

        let result = loader.load_from_url("   ").await;

        assert_eq!(Err(Error::EmptySource), result);
    }

    #[tokio::test]
    async fn test_load_from_url_fetch_failure() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut receiver = controller.subscribe();
        let mut source = MockContentSource::new();
        source
            .expect_fetch_text()
            .times(1)
            .returning(|_| Err(Error::FetchFailure("HTTP error! Status: 500".to_string())));
        let loader = PlaylistLoader::new(controller.clone(), Box::new(source));

        let result = loader.load_from_url("http://localhost/list.m3u").await;

        let expected_error = Error::FetchFailure("HTTP error! Status: 500".to_string());
        assert_eq!(Err(expected_error.clone()), result);
        let result = recv_timeout!(&mut receiver, TIMEOUT);
        assert_eq!(PlaybackEvent::Error(expected_error), *result);
        let result = recv_timeout!(&mut receiver, TIMEOUT);
        assert_eq!(PlaybackEvent::PlaylistChanged, *result);
        assert_eq!(PlaybackState::Empty, controller.state().await);
    }

    #[tokio::test]
    async fn test_load_from_url_invalid_base() {
        init_logger!();
        let engine_callbacks = MultiThreadedCallback::new();
        let controller = create_controller(&engine_callbacks);
        let mut source = MockContentSource::new();
        source
            .expect_fetch_text()
            .returning(|_| Ok("/a.mp3".to_string()));
        let loader = PlaylistLoader::new(controller.clone(), Box::new(source));

        let result = loader.load_from_url("radio/list.m3u").await;

        assert!(
            matches!(result, Err(Error::InvalidBaseLocation { .. })),
            "expected Error::InvalidBaseLocation, got {:?} instead",
            result
        );
    }
}
