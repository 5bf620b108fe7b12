use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ShoutoutError;
use crate::host::Host;

pub const SCENE_VAR: &str = "ShoutOutScene";
pub const MEDIA_SOURCE_VAR: &str = "ShoutOutSource";
pub const TEXT_SOURCE_VAR: &str = "ShoutOutText";
/// Set by the host when a chatter posts a clip link.
pub const WATCH_URL_VAR: &str = "twitchClipUrl";

pub const TARGET_USER_ARG: &str = "targetUser";
pub const CLIPS_WITHIN_DAYS_ARG: &str = "clipsWithinDays";

/// Scene layout and clip link, read once from host globals when an invocation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoutoutConfig {
    pub scene: String,
    pub media_source: String,
    pub text_source: String,
    #[serde(default)]
    pub watch_url: Option<String>,
}

impl ShoutoutConfig {
    /// Reads the shout-out globals from the host.
    ///
    /// The scene and both sources are required. A blank clip link counts as unset.
    pub async fn from_host<H: Host + ?Sized>(host: &H) -> Result<Self, ShoutoutError> {
        let scene = required_global(host, SCENE_VAR).await?;
        let media_source = required_global(host, MEDIA_SOURCE_VAR).await?;
        let text_source = required_global(host, TEXT_SOURCE_VAR).await?;
        let watch_url = host
            .global_var(WATCH_URL_VAR)
            .await?
            .filter(|url| !url.trim().is_empty());

        debug!(
            "Loaded shout-out config: scene={}, media={}, text={}, watch_url={:?}",
            scene, media_source, text_source, watch_url
        );

        Ok(ShoutoutConfig {
            scene,
            media_source,
            text_source,
            watch_url,
        })
    }
}

async fn required_global<H: Host + ?Sized>(host: &H, name: &str) -> Result<String, ShoutoutError> {
    match host.global_var(name).await? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            error!("Global variable {} is not set", name);
            Err(ShoutoutError::MissingGlobal(name.to_string()))
        }
    }
}

/// Arguments passed along with a shout-out trigger.
///
/// Both are optional here because a clip link makes them unnecessary; use
/// [`InvocationArgs::random_target`] when they are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationArgs {
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub clips_within_days: Option<i16>,
}

impl InvocationArgs {
    pub fn new(target_user: impl Into<String>, clips_within_days: i16) -> Self {
        InvocationArgs {
            target_user: Some(target_user.into()),
            clips_within_days: Some(clips_within_days),
        }
    }

    /// Builds the arguments from the host's raw string argument map.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Self, ShoutoutError> {
        let target_user = args
            .get(TARGET_USER_ARG)
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty());

        let clips_within_days = match args.get(CLIPS_WITHIN_DAYS_ARG) {
            Some(raw) => Some(raw.trim().parse::<i16>().map_err(|e| {
                ShoutoutError::InvalidArgument(format!("{}={:?}: {}", CLIPS_WITHIN_DAYS_ARG, raw, e))
            })?),
            None => None,
        };

        Ok(InvocationArgs {
            target_user,
            clips_within_days,
        })
    }

    /// The user and lookback window needed to pick a random clip.
    pub fn random_target(&self) -> Result<(&str, i16), ShoutoutError> {
        let user = self
            .target_user
            .as_deref()
            .filter(|user| !user.is_empty())
            .ok_or_else(|| ShoutoutError::InvalidArgument(format!("{} is required", TARGET_USER_ARG)))?;
        let days = self.clips_within_days.ok_or_else(|| {
            ShoutoutError::InvalidArgument(format!("{} is required", CLIPS_WITHIN_DAYS_ARG))
        })?;
        Ok((user, days))
    }
}
