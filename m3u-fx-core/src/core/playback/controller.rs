use std::sync::Arc;

use derive_more::Display;
use fx_callback::{Callback, MultiThreadedCallback, Subscriber, Subscription};
use log::{debug, error, info, trace, warn};
use tokio::select;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::core::config::PlayerSettings;
use crate::core::playback::{PlaybackEvent, PlaybackSnapshot, PlaybackState};
use crate::core::players::{EngineEvent, PlaybackEngine, PlaybackError};
use crate::core::playlist::{Entry, PlaylistState};
use crate::core::Error;

/// The state machine which drives the playback of a playlist through a [PlaybackEngine].
///
/// All operations are queued as commands and processed one at a time by the controller loop,
/// each command runs to completion before the next one is handled.
/// The outcome of an engine playback request re-enters the loop as a command as well,
/// tagged with the identity of the request so outdated outcomes can be discarded.
///
/// The presentation layer can follow the controller through [Callback::subscribe]
/// or poll it through [PlaybackController::snapshot].
#[derive(Debug)]
pub struct PlaybackController {
    inner: Arc<InnerPlaybackController>,
}

impl PlaybackController {
    /// Create a new controller for the given engine.
    ///
    /// This spawns the controller loop on the current tokio runtime.
    pub fn new(engine: Arc<Box<dyn PlaybackEngine>>, settings: PlayerSettings) -> Self {
        let (command_sender, command_receiver) = unbounded_channel();
        let engine_events = engine.subscribe();
        let inner = Arc::new(InnerPlaybackController {
            engine,
            settings,
            state: Default::default(),
            command_sender,
            callbacks: MultiThreadedCallback::new(),
            cancellation_token: Default::default(),
        });

        let inner_main = inner.clone();
        tokio::spawn(async move {
            inner_main.start(command_receiver, engine_events).await;
        });

        Self { inner }
    }

    /// Replace the playlist with the given entries.
    ///
    /// An empty playlist stops the playback, otherwise the first entry is played
    /// when [PlayerSettings::auto_play] is enabled.
    pub fn load_playlist(&self, entries: Vec<Entry>) {
        self.inner
            .send_command(PlaybackCommand::LoadPlaylist(entries))
    }

    /// Play the entry at the given index.
    /// Out of range indexes are ignored.
    pub fn play_track(&self, index: usize) {
        self.inner.send_command(PlaybackCommand::PlayTrack(index))
    }

    /// Pause the active entry, or resume/start the playback when nothing is being played.
    pub fn toggle_play_pause(&self) {
        self.inner.send_command(PlaybackCommand::TogglePlayPause)
    }

    /// Stop the playback and reset the engine position to the start.
    pub fn stop(&self) {
        self.inner.send_command(PlaybackCommand::Stop)
    }

    /// Play the next entry, wrapping to the first entry after the last one.
    pub fn next(&self) {
        self.inner.send_command(PlaybackCommand::Next)
    }

    /// Play the previous entry, wrapping to the last entry before the first one.
    pub fn prev(&self) {
        self.inner.send_command(PlaybackCommand::Previous)
    }

    /// Notify the controller that the engine finished the playback of the loaded source.
    ///
    /// Engine events are already consumed by the controller itself,
    /// this is only needed for engines which can't publish [EngineEvent::Ended].
    pub fn engine_ended(&self) {
        self.inner.send_command(PlaybackCommand::EngineEnded)
    }

    /// Report the given error to the presentation layer.
    pub fn report(&self, error: Error) {
        self.inner.send_command(PlaybackCommand::Report(error))
    }

    /// Get the current state of the playback.
    pub async fn state(&self) -> PlaybackState {
        self.inner.state.lock().await.playback_state
    }

    /// Get a snapshot of the playback for rendering.
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.inner.state.lock().await;

        PlaybackSnapshot {
            state: state.playback_state,
            playlist: state.playlist.clone(),
            active_index: state.active_index,
        }
    }
}

impl Callback<PlaybackEvent> for PlaybackController {
    fn subscribe(&self) -> Subscription<PlaybackEvent> {
        self.inner.callbacks.subscribe()
    }

    fn subscribe_with(&self, subscriber: Subscriber<PlaybackEvent>) {
        self.inner.callbacks.subscribe_with(subscriber)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.inner.cancellation_token.cancel();
    }
}

#[derive(Debug)]
enum PlaybackCommand {
    LoadPlaylist(Vec<Entry>),
    PlayTrack(usize),
    TogglePlayPause,
    Stop,
    Next,
    Previous,
    EngineEnded,
    Report(Error),
    PlayOutcome(PlayRequest, Result<(), PlaybackError>),
}

/// The identity of a playback request which has been handed to the engine.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("request {} for index {} ({})", id, index, location)]
struct PlayRequest {
    id: u64,
    index: usize,
    location: String,
}

/// The source which has been set on the engine.
#[derive(Debug, Clone, PartialEq)]
struct LoadedSource {
    index: usize,
    location: String,
}

#[derive(Debug, Default)]
struct ControllerState {
    playback_state: PlaybackState,
    playlist: PlaylistState,
    active_index: Option<usize>,
    loaded: Option<LoadedSource>,
    /// The id of the latest playback request, outcomes of other requests are outdated
    request_id: u64,
}

impl ControllerState {
    fn invalidate_request(&mut self) {
        self.request_id += 1;
    }
}

#[derive(Debug)]
struct InnerPlaybackController {
    engine: Arc<Box<dyn PlaybackEngine>>,
    settings: PlayerSettings,
    state: Mutex<ControllerState>,
    command_sender: UnboundedSender<PlaybackCommand>,
    callbacks: MultiThreadedCallback<PlaybackEvent>,
    cancellation_token: CancellationToken,
}

impl InnerPlaybackController {
    async fn start(
        &self,
        mut command_receiver: UnboundedReceiver<PlaybackCommand>,
        mut engine_events: Subscription<EngineEvent>,
    ) {
        loop {
            select! {
                _ = self.cancellation_token.cancelled() => break,
                Some(command) = command_receiver.recv() => self.handle_command(command).await,
                Some(event) = engine_events.recv() => self.handle_engine_event(&event).await,
            }
        }

        debug!("Playback controller main loop ended");
    }

    fn send_command(&self, command: PlaybackCommand) {
        trace!("Queueing playback command {:?}", command);
        if let Err(e) = self.command_sender.send(command) {
            warn!("Playback controller is no longer running, {}", e);
        }
    }

    async fn handle_command(&self, command: PlaybackCommand) {
        trace!("Processing playback command {:?}", command);
        let mut state = self.state.lock().await;

        match command {
            PlaybackCommand::LoadPlaylist(entries) => self.load_playlist(&mut state, entries).await,
            PlaybackCommand::PlayTrack(index) => self.play_track(&mut state, index).await,
            PlaybackCommand::TogglePlayPause => self.toggle_play_pause(&mut state).await,
            PlaybackCommand::Stop => self.stop(&mut state).await,
            PlaybackCommand::Next => self.next(&mut state).await,
            PlaybackCommand::Previous => self.previous(&mut state).await,
            PlaybackCommand::EngineEnded => self.engine_ended(&mut state).await,
            PlaybackCommand::Report(error) => self.report(error),
            PlaybackCommand::PlayOutcome(request, result) => {
                self.handle_play_outcome(&mut state, request, result)
            }
        }
    }

    async fn handle_engine_event(&self, event: &EngineEvent) {
        trace!("Processing engine event {:?}", event);
        match event {
            EngineEvent::Ended => {
                let mut state = self.state.lock().await;
                self.engine_ended(&mut state).await
            }
        }
    }

    async fn load_playlist(&self, state: &mut ControllerState, entries: Vec<Entry>) {
        debug!("Loading new playlist with {} entries", entries.len());
        state.invalidate_request();
        state.playlist = PlaylistState::replace(entries);
        state.loaded = None;
        self.update_active_index(state, None);
        self.callbacks.invoke(PlaybackEvent::PlaylistChanged);

        if state.playlist.is_empty() {
            self.reset_engine().await;
            self.update_state(state, PlaybackState::Empty);
            info!("Playlist has been cleared");
            return;
        }

        self.update_state(state, PlaybackState::Stopped);
        info!("Playlist with {} entries has been loaded", state.playlist.len());
        if self.settings.auto_play {
            self.play_track(state, 0).await;
        }
    }

    async fn play_track(&self, state: &mut ControllerState, index: usize) {
        if let Err(e) = state.playlist.select(Some(index)) {
            warn!("Unable to play track, {}", e);
            return;
        }

        let location = match state.playlist.get(index) {
            Some(entry) => {
                debug!("Starting playback of track {}", entry);
                entry.location().to_string()
            }
            None => return,
        };

        self.update_state(state, PlaybackState::Loading);
        self.engine.set_source(location.clone()).await;
        state.loaded = Some(LoadedSource {
            index,
            location: location.clone(),
        });
        self.request_playback(state, index, location);
    }

    async fn toggle_play_pause(&self, state: &mut ControllerState) {
        match state.playback_state {
            PlaybackState::Playing => {
                self.engine.pause().await;
                self.update_state(state, PlaybackState::Paused);
            }
            PlaybackState::Loading => {
                debug!("Cancelling pending playback request {}", state.request_id);
                state.invalidate_request();
                self.engine.pause().await;
                let index = state.loaded.as_ref().map(|e| e.index);
                self.update_state(state, PlaybackState::Paused);
                self.update_active_index(state, index);
            }
            PlaybackState::Paused | PlaybackState::Stopped if state.loaded.is_some() => {
                self.resume(state)
            }
            _ if !state.playlist.is_empty() => self.play_track(state, 0).await,
            _ => {
                debug!("Unable to toggle the playback, no playlist has been loaded");
                self.report(Error::NoPlaylistLoaded);
            }
        }
    }

    fn resume(&self, state: &mut ControllerState) {
        let loaded = match state.loaded.clone() {
            Some(e) => e,
            None => return,
        };

        if let Err(e) = state.playlist.select(Some(loaded.index)) {
            warn!("Unable to resume the loaded source, {}", e);
            return;
        }

        debug!("Resuming playback of {}", loaded.location);
        self.update_state(state, PlaybackState::Loading);
        self.request_playback(state, loaded.index, loaded.location);
    }

    async fn stop(&self, state: &mut ControllerState) {
        trace!("Stopping the playback");
        state.invalidate_request();
        self.reset_engine().await;
        // the selection is always valid to clear
        let _ = state.playlist.select(None);
        self.update_active_index(state, None);

        if state.playlist.is_empty() {
            self.update_state(state, PlaybackState::Empty);
        } else {
            self.update_state(state, PlaybackState::Stopped);
        }
    }

    async fn next(&self, state: &mut ControllerState) {
        match state.playlist.next_index() {
            Some(index) => self.play_track(state, index).await,
            None => trace!("Ignoring next track, playlist is empty"),
        }
    }

    async fn previous(&self, state: &mut ControllerState) {
        match state.playlist.previous_index() {
            Some(index) => self.play_track(state, index).await,
            None => trace!("Ignoring previous track, playlist is empty"),
        }
    }

    async fn engine_ended(&self, state: &mut ControllerState) {
        debug!("Engine finished the playback of the loaded source");
        if state.playlist.is_empty() {
            self.stop(state).await;
        } else {
            self.next(state).await;
        }
    }

    fn report(&self, error: Error) {
        debug!("Reporting playback error {}", error);
        self.callbacks.invoke(PlaybackEvent::Error(error));
    }

    /// Hand a new playback request to the engine without waiting for its outcome.
    fn request_playback(&self, state: &mut ControllerState, index: usize, location: String) {
        state.invalidate_request();
        let request = PlayRequest {
            id: state.request_id,
            index,
            location,
        };

        trace!("Sending playback {} to the engine", request);
        let engine = self.engine.clone();
        let command_sender = self.command_sender.clone();
        tokio::spawn(async move {
            let result = engine.play().await;
            if let Err(e) = command_sender.send(PlaybackCommand::PlayOutcome(request, result)) {
                debug!("Unable to deliver playback outcome, {}", e);
            }
        });
    }

    fn handle_play_outcome(
        &self,
        state: &mut ControllerState,
        request: PlayRequest,
        result: Result<(), PlaybackError>,
    ) {
        if request.id != state.request_id {
            debug!("Discarding outdated outcome of playback {}", request);
            return;
        }

        let title = state
            .playlist
            .get(request.index)
            .map(|e| e.title().to_string())
            .unwrap_or_default();

        match result {
            Ok(_) => {
                info!("Playing track {} ({})", title, request.location);
                self.update_state(state, PlaybackState::Playing);
                self.update_active_index(state, Some(request.index));
            }
            Err(e) => {
                error!("Failed to play track {} ({}), {}", title, request.location, e);
                state.loaded = None;
                self.update_active_index(state, None);
                self.update_state(state, PlaybackState::Stopped);
                self.report(Error::PlaybackFailure {
                    title,
                    location: request.location,
                    reason: e.to_string(),
                });
            }
        }
    }

    async fn reset_engine(&self) {
        self.engine.pause().await;
        self.engine.set_position(0).await;
    }

    fn update_state(&self, state: &mut ControllerState, new_state: PlaybackState) {
        if state.playback_state == new_state {
            return;
        }

        state.playback_state = new_state;
        debug!("Updated playback state to {}", new_state);
        self.callbacks
            .invoke(PlaybackEvent::StateChanged(new_state));
    }

    fn update_active_index(&self, state: &mut ControllerState, index: Option<usize>) {
        if state.active_index == index {
            return;
        }

        state.active_index = index;
        self.callbacks
            .invoke(PlaybackEvent::ActiveTrackChanged(index));
    }
}
