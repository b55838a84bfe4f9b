//! Playback transport — the cyclic track list behind the vinyl player.
//!
//! The transport owns the playback state and drives a [`MediaPlayer`]. It
//! knows nothing about the visualizer; the visualizer only watches the
//! element the player wraps.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PlaybackError, VisualizerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    /// Cover artwork URL.
    pub cover: String,
    /// Audio file URL.
    pub audio: String,
}

/// Non-empty, ordered and cyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaybackError> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(Playlist { tracks })
    }

    /// Parse a JSON array of tracks.
    pub fn from_json(json: &str) -> Result<Self, VisualizerError> {
        let tracks: Vec<Track> =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Playlist::new(tracks)?)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.tracks.len() - 1) % self.tracks.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub track_index: usize,
    pub is_playing: bool,
}

/// The playable element behind the transport.
pub trait MediaPlayer {
    fn set_source(&self, url: &str);
    /// Start playback. Policy rejections may also arrive later through the
    /// host; implementations log those themselves.
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
}

pub struct Transport<P: MediaPlayer> {
    playlist: Playlist,
    state: PlaybackState,
    player: P,
    /// Last state the auto-resume effect ran for.
    observed: PlaybackState,
    broken_covers: HashSet<usize>,
}

impl<P: MediaPlayer> Transport<P> {
    /// Start paused on the first track, with the player pointed at it.
    pub fn new(playlist: Playlist, player: P) -> Self {
        let state = PlaybackState::default();
        if let Some(track) = playlist.get(state.track_index) {
            player.set_source(&track.audio);
        }
        Transport {
            playlist,
            state,
            player,
            observed: state,
            broken_covers: HashSet::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn current_track(&self) -> &Track {
        // `track_index` is only ever set from a bounds-checked index.
        &self.playlist.tracks[self.state.track_index]
    }

    /// Flip play/pause. `is_playing` follows the request even if the host
    /// refuses to start audio.
    pub fn toggle(&mut self) {
        let playing = !self.state.is_playing;
        if playing {
            if let Err(e) = self.player.play() {
                log::warn!("{e}");
            }
        } else {
            self.player.pause();
        }
        self.state.is_playing = playing;
        self.observed = self.state;
    }

    pub fn next(&mut self) {
        let index = self.playlist.next_index(self.state.track_index);
        self.change_track(index);
    }

    pub fn prev(&mut self) {
        let index = self.playlist.prev_index(self.state.track_index);
        self.change_track(index);
    }

    pub fn select(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::TrackOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }
        self.change_track(index);
        Ok(())
    }

    /// Hide the current track's artwork after it failed to load.
    pub fn cover_failed(&mut self) {
        log::debug!("Cover for '{}' failed to load; hiding it", self.current_track().title);
        self.broken_covers.insert(self.state.track_index);
    }

    pub fn cover_visible(&self, index: usize) -> bool {
        index < self.playlist.len() && !self.broken_covers.contains(&index)
    }

    fn change_track(&mut self, index: usize) {
        // Reassigning `src` reloads the element even for the same URL.
        if index == self.state.track_index {
            return;
        }
        self.state.track_index = index;
        self.player.set_source(&self.playlist.tracks[index].audio);
        self.resume_if_playing();
    }

    /// Keep playing across a track change: the new source starts paused.
    fn resume_if_playing(&mut self) {
        let changed = self.observed != self.state;
        self.observed = self.state;
        if changed && self.state.is_playing {
            if let Err(e) = self.player.play() {
                log::warn!("{e}");
            }
        }
    }
}
