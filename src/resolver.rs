use chrono::{DateTime, Utc};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ShoutoutError;
use crate::host::{Clip, ClipWindow, Host, IndexPicker};

static WATCH_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?(?:clips\.twitch\.tv/|twitch\.tv/(?P<user>[^/]+)/clip/)(?P<slug>[^?\s]+)",
    )
    .unwrap()
});

/// The clip picked for a shout-out.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipReference {
    identifier: String,
    owner_user_name: String,
    duration_seconds: f64,
}

impl ClipReference {
    /// An empty identifier can never be played, so it is rejected here.
    pub fn new(
        identifier: impl Into<String>,
        owner_user_name: impl Into<String>,
        duration_seconds: f64,
    ) -> Result<Self, ShoutoutError> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(ShoutoutError::ClipNotFound { slug: identifier });
        }
        Ok(ClipReference {
            identifier,
            owner_user_name: owner_user_name.into(),
            duration_seconds,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Empty when the clip link didn't name its channel.
    pub fn owner_user_name(&self) -> &str {
        &self.owner_user_name
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

/// Slug and channel name taken from a clip link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWatchUrl {
    pub slug: String,
    pub user_name: String,
}

/// Pulls the slug (and channel, when present) out of a clip link.
///
/// Accepts `clips.twitch.tv/<slug>` and `twitch.tv/<user>/clip/<slug>`, with or
/// without scheme and `www.`. Query strings are dropped from the slug.
pub fn parse_watch_url(watch_url: &str) -> Option<ParsedWatchUrl> {
    let caps = WATCH_URL_RE.captures(watch_url)?;
    let slug = caps.name("slug")?.as_str().to_string();
    let user_name = caps
        .name("user")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Some(ParsedWatchUrl { slug, user_name })
}

/// Duration of the first clip whose id is exactly `slug`.
pub fn find_clip_duration(clips: &[Clip], slug: &str) -> Option<f64> {
    clips.iter().find(|clip| clip.id == slug).map(|clip| clip.duration)
}

/// Resolves a posted clip link to a playable clip reference.
pub async fn resolve_watch_url<H: Host + ?Sized>(
    host: &H,
    watch_url: &str,
) -> Result<ClipReference, ShoutoutError> {
    let parsed = parse_watch_url(watch_url).ok_or_else(|| {
        error!("Failed to parse watch URL: {}", watch_url);
        ShoutoutError::InputParse {
            url: watch_url.to_string(),
        }
    })?;
    info!(
        "Parsed URL - UserName: {}, Slug: {}",
        parsed.user_name, parsed.slug
    );

    let clips = host.clips_for_user(&parsed.user_name, None).await?;
    let duration = find_clip_duration(&clips, &parsed.slug).ok_or_else(|| {
        error!("Failed to find duration for clip: {}", parsed.slug);
        ShoutoutError::ClipNotFound {
            slug: parsed.slug.clone(),
        }
    })?;

    ClipReference::new(parsed.slug, parsed.user_name, duration)
}

/// Picks a random clip of `user`, preferring ones from the last `within_days` days.
pub async fn select_random_clip<H: Host + ?Sized, P: IndexPicker + ?Sized>(
    host: &H,
    picker: &mut P,
    user: &str,
    within_days: i16,
    now: DateTime<Utc>,
) -> Result<ClipReference, ShoutoutError> {
    info!("For: {}", user);

    let window = ClipWindow::last_days(now, within_days);
    let mut clips = host.clips_for_user(user, Some(window)).await?;
    if clips.is_empty() {
        clips = host.clips_for_user(user, None).await?;
    }
    info!("Clip count {}", clips.len());

    if clips.is_empty() {
        error!("No clips found for {}", user);
        return Err(ShoutoutError::NoClips {
            user: user.to_string(),
        });
    }

    let index = picker.pick(clips.len()) % clips.len();
    info!("Clip index: {}", index);
    let clip = clips.swap_remove(index);

    info!("Matched URL: {}", clip.url);
    info!("Video ID: {}", clip.video_id);
    info!("Clip ID: {}", clip.id);
    info!("Thumbnail URL: {}", clip.thumbnail_url);

    ClipReference::new(clip.id, user, clip.duration)
}
