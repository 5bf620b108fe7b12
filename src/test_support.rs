//! Fakes shared by the unit tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{MEDIA_SOURCE_VAR, SCENE_VAR, TEXT_SOURCE_VAR};
use crate::error::ShoutoutError;
use crate::gql::ClipAccessSource;
use crate::host::{Clip, ClipWindow, Host, IndexPicker, Sleeper};
use crate::playback::PlaybackCredentials;

pub fn clip(id: &str, duration: f64) -> Clip {
    Clip {
        id: id.to_string(),
        url: format!("https://clips.twitch.tv/{}", id),
        video_id: format!("video-{}", id),
        duration,
        thumbnail_url: format!("https://thumbs/{}.jpg", id),
    }
}

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Message(String),
    ListClips { user: String, window: Option<ClipWindow> },
    Visibility { scene: String, source: String, visible: bool },
    MediaFile { scene: String, source: String, file: String },
    Text { scene: String, source: String, text: String },
    Sleep(Duration),
}

/// Host and sleeper that record every call into one shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    globals: HashMap<String, String>,
    clips: HashMap<String, Vec<Clip>>,
    recent_clips: HashMap<String, Vec<Clip>>,
    fail_scene_calls: bool,
    fail_chat: bool,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingHost {
    /// A host with the three layout globals set.
    pub fn with_layout() -> Self {
        RecordingHost::default()
            .with_global(SCENE_VAR, "Shoutout")
            .with_global(MEDIA_SOURCE_VAR, "ClipPlayer")
            .with_global(TEXT_SOURCE_VAR, "ClipName")
    }

    pub fn with_global(mut self, name: &str, value: &str) -> Self {
        self.globals.insert(name.to_string(), value.to_string());
        self
    }

    /// Clips returned for unbounded listings.
    pub fn with_clips(mut self, user: &str, clips: Vec<Clip>) -> Self {
        self.clips.insert(user.to_string(), clips);
        self
    }

    /// Clips returned for windowed listings.
    pub fn with_recent_clips(mut self, user: &str, clips: Vec<Clip>) -> Self {
        self.recent_clips.insert(user.to_string(), clips);
        self
    }

    pub fn failing_scene_calls(mut self) -> Self {
        self.fail_scene_calls = true;
        self
    }

    pub fn failing_chat(mut self) -> Self {
        self.fail_chat = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn total_sleep(&self) -> Duration {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Sleep(d) => Some(d),
                _ => None,
            })
            .sum()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn scene_call(&self, call: Call) -> Result<()> {
        if self.fail_scene_calls {
            bail!("scene {:?} does not exist", call);
        }
        self.record(call);
        Ok(())
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn global_var(&self, name: &str) -> Result<Option<String>> {
        Ok(self.globals.get(name).cloned())
    }

    async fn send_message(&self, text: &str) -> Result<()> {
        if self.fail_chat {
            bail!("chat is not connected");
        }
        self.record(Call::Message(text.to_string()));
        Ok(())
    }

    async fn clips_for_user(&self, user: &str, window: Option<ClipWindow>) -> Result<Vec<Clip>> {
        self.record(Call::ListClips {
            user: user.to_string(),
            window,
        });
        let source = if window.is_some() {
            &self.recent_clips
        } else {
            &self.clips
        };
        Ok(source.get(user).cloned().unwrap_or_default())
    }

    async fn set_source_visibility(&self, scene: &str, source: &str, visible: bool) -> Result<()> {
        self.scene_call(Call::Visibility {
            scene: scene.to_string(),
            source: source.to_string(),
            visible,
        })
    }

    async fn set_media_source_file(&self, scene: &str, source: &str, file: &str) -> Result<()> {
        self.scene_call(Call::MediaFile {
            scene: scene.to_string(),
            source: source.to_string(),
            file: file.to_string(),
        })
    }

    async fn set_text(&self, scene: &str, source: &str, text: &str) -> Result<()> {
        self.scene_call(Call::Text {
            scene: scene.to_string(),
            source: source.to_string(),
            text: text.to_string(),
        })
    }
}

#[async_trait]
impl Sleeper for RecordingHost {
    async fn sleep(&self, duration: Duration) {
        self.record(Call::Sleep(duration));
    }
}

/// Always answers with the same index and remembers the lengths it was asked about.
#[derive(Debug, Default)]
pub struct FixedPicker {
    index: usize,
    lengths: Vec<usize>,
}

impl FixedPicker {
    pub fn new(index: usize) -> Self {
        FixedPicker {
            index,
            lengths: Vec::new(),
        }
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }
}

impl IndexPicker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.lengths.push(len);
        self.index
    }
}

/// Clip access source with a canned answer.
#[derive(Debug, Clone, Default)]
pub struct CannedAccess {
    credentials: Option<PlaybackCredentials>,
    upstream_status: Option<u16>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl CannedAccess {
    pub fn returning(source_media_url: &str, access_token: &str, signature: &str) -> Self {
        CannedAccess {
            credentials: Some(PlaybackCredentials {
                source_media_url: source_media_url.to_string(),
                signature: signature.to_string(),
                access_token: access_token.to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        CannedAccess {
            upstream_status: Some(status),
            ..Default::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipAccessSource for CannedAccess {
    async fn fetch_credentials(&self, slug: &str) -> Result<PlaybackCredentials, ShoutoutError> {
        self.requested.lock().unwrap().push(slug.to_string());
        if let Some(status) = self.upstream_status {
            return Err(ShoutoutError::UpstreamRequest {
                status,
                body: "canned failure".to_string(),
            });
        }
        self.credentials
            .clone()
            .ok_or_else(|| ShoutoutError::ResponseShape("no canned credentials".to_string()))
    }
}
