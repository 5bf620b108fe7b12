use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A clip as the chat-bot host lists it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    pub url: String,
    pub video_id: String,
    /// Length in seconds.
    pub duration: f64,
    pub thumbnail_url: String,
}

/// Creation-time bounds for a clip listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ClipWindow {
    /// The window covering the `days` days leading up to `now`.
    ///
    /// A negative count puts `start` after `end`, which matches no clips.
    pub fn last_days(now: DateTime<Utc>, days: i16) -> Self {
        ClipWindow {
            start: now - ChronoDuration::days(i64::from(days)),
            end: now,
        }
    }
}

/// Everything the shout-out needs from the chat-bot host.
///
/// Errors from these calls are never handled by the shout-out itself, they
/// propagate back to whoever triggered the invocation.
#[async_trait]
pub trait Host: Send + Sync {
    /// Reads a persisted global variable. `None` when it was never set.
    async fn global_var(&self, name: &str) -> Result<Option<String>>;

    /// Posts a message to the broadcaster's chat.
    async fn send_message(&self, text: &str) -> Result<()>;

    /// Lists clips for `user`, limited to `window` when given.
    async fn clips_for_user(&self, user: &str, window: Option<ClipWindow>) -> Result<Vec<Clip>>;

    async fn set_source_visibility(&self, scene: &str, source: &str, visible: bool) -> Result<()>;

    /// Points a media source at `file`. An empty string clears it.
    async fn set_media_source_file(&self, scene: &str, source: &str, file: &str) -> Result<()>;

    async fn set_text(&self, scene: &str, source: &str, text: &str) -> Result<()>;
}

/// Blocking delay used by the presenter.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Source of the random clip index.
pub trait IndexPicker {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform pick from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl IndexPicker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}
