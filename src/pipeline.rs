use chrono::{DateTime, Utc};
use log::{error, info};

use crate::config::{InvocationArgs, ShoutoutConfig};
use crate::error::ShoutoutError;
use crate::gql::{ClipAccessSource, GqlClient};
use crate::host::{Host, IndexPicker, Sleeper, TokioSleeper};
use crate::playback::PlaybackCredentials;
use crate::presenter::{present, PresentationRequest};
use crate::resolver::{resolve_watch_url, select_random_clip, ClipReference};

/// One shout-out from trigger to teardown.
///
/// Resolves the clip, fetches its access token, builds the playback URL and
/// presents it. Steps run strictly in order and the first failure ends the run.
pub struct ShoutoutPipeline<H, A = GqlClient, S = TokioSleeper> {
    host: H,
    access: A,
    sleeper: S,
}

impl<H: Host> ShoutoutPipeline<H> {
    /// Pipeline against the public GraphQL endpoint with real sleeps.
    pub fn with_host(host: H) -> Self {
        ShoutoutPipeline::new(host, GqlClient::new(), TokioSleeper)
    }
}

impl<H, A, S> ShoutoutPipeline<H, A, S>
where
    H: Host,
    A: ClipAccessSource,
    S: Sleeper,
{
    pub fn new(host: H, access: A, sleeper: S) -> Self {
        ShoutoutPipeline {
            host,
            access,
            sleeper,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Reads the host globals and runs one invocation.
    pub async fn run<P: IndexPicker + ?Sized>(
        &self,
        args: &InvocationArgs,
        picker: &mut P,
    ) -> Result<PresentationRequest, ShoutoutError> {
        let config = ShoutoutConfig::from_host(&self.host).await?;
        self.run_with_config(&config, args, picker, Utc::now()).await
    }

    /// Runs one invocation with an already loaded config and a fixed clock.
    ///
    /// Failures with a chat message are reported to chat exactly once before
    /// being returned.
    pub async fn run_with_config<P: IndexPicker + ?Sized>(
        &self,
        config: &ShoutoutConfig,
        args: &InvocationArgs,
        picker: &mut P,
        now: DateTime<Utc>,
    ) -> Result<PresentationRequest, ShoutoutError> {
        let request = match self.prepare(config, args, picker, now).await {
            Ok(request) => request,
            Err(err) => {
                error!("Shout-out aborted: {}", err);
                if let Some(message) = err.chat_message() {
                    if let Err(send_err) = self.host.send_message(message).await {
                        error!("Failed to send chat message: {}", send_err);
                    }
                }
                return Err(err);
            }
        };

        present(&self.host, &self.sleeper, &request).await?;
        Ok(request)
    }

    async fn prepare<P: IndexPicker + ?Sized>(
        &self,
        config: &ShoutoutConfig,
        args: &InvocationArgs,
        picker: &mut P,
        now: DateTime<Utc>,
    ) -> Result<PresentationRequest, ShoutoutError> {
        let watch_url = config
            .watch_url
            .as_deref()
            .filter(|url| !url.trim().is_empty());

        let clip = match watch_url {
            Some(url) => resolve_watch_url(&self.host, url).await?,
            None => {
                let (user, days) = args.random_target()?;
                select_random_clip(&self.host, picker, user, days, now).await?
            }
        };

        let credentials = self
            .access
            .fetch_credentials(clip.identifier())
            .await
            .map_err(|e| {
                error!("Failed to retrieve clip info from GraphQL: {}", e);
                e
            })?;
        log_clip_info(&credentials, &clip);

        Ok(PresentationRequest::new(
            config,
            &clip,
            credentials.playback_url(),
        ))
    }
}

fn log_clip_info(credentials: &PlaybackCredentials, clip: &ClipReference) {
    info!("Source URL: {}", credentials.source_media_url);
    info!("Signature: {}", credentials.signature);
    info!("Token: {}", credentials.access_token);
    info!("UserName: {}", clip.owner_user_name());
    info!("Duration: {}", clip.duration_seconds());
}
