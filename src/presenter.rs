use anyhow::Result;
use log::info;
use serde::Serialize;
use std::time::Duration;

use crate::config::ShoutoutConfig;
use crate::host::{Host, Sleeper};
use crate::resolver::ClipReference;

/// Pause between loading the media and revealing the overlay.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Everything needed to put one clip on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationRequest {
    pub scene_name: String,
    pub media_source_name: String,
    pub text_source_name: String,
    pub final_url: String,
    pub display_name: String,
    pub duration_millis: u64,
}

impl PresentationRequest {
    pub fn new(config: &ShoutoutConfig, clip: &ClipReference, final_url: String) -> Self {
        PresentationRequest {
            scene_name: config.scene.clone(),
            media_source_name: config.media_source.clone(),
            text_source_name: config.text_source.clone(),
            final_url,
            display_name: clip.owner_user_name().to_string(),
            duration_millis: seconds_to_millis(clip.duration_seconds()),
        }
    }
}

/// Whole milliseconds, rounded down.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0).floor() as u64
}

/// Shows the clip with its name overlay for the clip's length, then tears the overlay down.
///
/// Sources are hidden before their content changes to avoid flicker. Host
/// failures abort immediately and leave the scene as it is.
pub async fn present<H, S>(host: &H, sleeper: &S, request: &PresentationRequest) -> Result<()>
where
    H: Host + ?Sized,
    S: Sleeper + ?Sized,
{
    let scene = request.scene_name.as_str();
    let media = request.media_source_name.as_str();
    let text = request.text_source_name.as_str();

    info!("Final built SO URL: {}", request.final_url);

    host.set_source_visibility(scene, media, false).await?;
    host.set_source_visibility(scene, text, false).await?;
    host.set_media_source_file(scene, media, &request.final_url).await?;
    sleeper.sleep(SETTLE_DELAY).await;
    host.set_text(scene, text, &request.display_name).await?;
    host.set_source_visibility(scene, media, true).await?;
    host.set_source_visibility(scene, text, true).await?;

    sleeper
        .sleep(Duration::from_millis(request.duration_millis))
        .await;

    host.set_source_visibility(scene, media, false).await?;
    host.set_source_visibility(scene, text, false).await?;
    host.set_media_source_file(scene, media, "").await?;

    Ok(())
}
