use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ShoutoutError;
use crate::playback::PlaybackCredentials;

pub const GQL_URL: &str = "https://gql.twitch.tv/gql";
/// Public client id of the Twitch web player.
pub const CLIENT_ID: &str = "kimne78kx3ncx6brgo4mv6wki5h1ko";
pub const OPERATION_NAME: &str = "VideoAccessToken_Clip";
pub const PERSISTED_QUERY_VERSION: u32 = 1;
pub const PERSISTED_QUERY_HASH: &str =
    "36b89d2507fce29e5ca551df756d27c1cfe079e2609642b4390aa4c35796eb11";

/// Looks up playable media and access credentials for a clip slug.
#[async_trait]
pub trait ClipAccessSource: Send + Sync {
    async fn fetch_credentials(&self, slug: &str) -> Result<PlaybackCredentials, ShoutoutError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClipTokenRequest<'a> {
    operation_name: &'static str,
    variables: ClipTokenVariables<'a>,
    extensions: Extensions,
}

#[derive(Debug, Serialize)]
struct ClipTokenVariables<'a> {
    slug: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Extensions {
    persisted_query: PersistedQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedQuery {
    version: u32,
    sha256_hash: &'static str,
}

impl<'a> ClipTokenRequest<'a> {
    fn new(slug: &'a str) -> Self {
        ClipTokenRequest {
            operation_name: OPERATION_NAME,
            variables: ClipTokenVariables { slug },
            extensions: Extensions {
                persisted_query: PersistedQuery {
                    version: PERSISTED_QUERY_VERSION,
                    sha256_hash: PERSISTED_QUERY_HASH,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClipTokenResponse {
    data: Option<ClipTokenData>,
}

#[derive(Debug, Deserialize)]
struct ClipTokenData {
    clip: Option<ClipAccess>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClipAccess {
    video_qualities: Option<Vec<VideoQuality>>,
    playback_access_token: Option<PlaybackAccessToken>,
}

#[derive(Debug, Deserialize)]
struct VideoQuality {
    #[serde(default)]
    quality: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: String,
}

#[derive(Debug, Deserialize)]
struct PlaybackAccessToken {
    signature: String,
    value: String,
}

/// GraphQL client for the clip access token query.
#[derive(Debug, Clone)]
pub struct GqlClient {
    client: Client,
    endpoint: String,
}

impl Default for GqlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GqlClient {
    pub fn new() -> Self {
        Self::with_endpoint(GQL_URL)
    }

    /// Creates a client that posts to `endpoint` instead of the public GraphQL URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        GqlClient {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ClipAccessSource for GqlClient {
    async fn fetch_credentials(&self, slug: &str) -> Result<PlaybackCredentials, ShoutoutError> {
        let request = ClipTokenRequest::new(slug);
        debug!(
            "GraphQL query: {}",
            serde_json::to_string(&request).unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Client-ID", CLIENT_ID)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("GraphQL response: {}", body);

        if !status.is_success() {
            error!("GraphQL request failed with status code: {}", status);
            error!("Response content: {}", body);
            return Err(ShoutoutError::UpstreamRequest {
                status: status.as_u16(),
                body,
            });
        }

        parse_clip_response(&body)
    }
}

/// Extracts the source URL and access token from a `VideoAccessToken_Clip` response.
///
/// With more than two renditions the third one is used, otherwise the first.
pub fn parse_clip_response(body: &str) -> Result<PlaybackCredentials, ShoutoutError> {
    let response: ClipTokenResponse = serde_json::from_str(body)
        .map_err(|e| ShoutoutError::ResponseShape(e.to_string()))?;

    let clip = response
        .data
        .and_then(|data| data.clip)
        .ok_or_else(|| ShoutoutError::ResponseShape("missing data.clip".into()))?;

    let mut qualities = clip
        .video_qualities
        .ok_or_else(|| ShoutoutError::ResponseShape("missing data.clip.videoQualities".into()))?;
    if qualities.is_empty() {
        return Err(ShoutoutError::ResponseShape(
            "data.clip.videoQualities is empty".into(),
        ));
    }
    let index = if qualities.len() > 2 { 2 } else { 0 };
    let selected = qualities.swap_remove(index);
    info!(
        "Selected video source URL: {} (quality {})",
        selected.source_url,
        selected.quality.as_deref().unwrap_or("unknown")
    );

    let token = clip.playback_access_token.ok_or_else(|| {
        ShoutoutError::ResponseShape("missing data.clip.playbackAccessToken".into())
    })?;

    Ok(PlaybackCredentials {
        source_media_url: selected.source_url,
        signature: token.signature,
        access_token: token.value,
    })
}
