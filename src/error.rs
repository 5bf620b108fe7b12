use thiserror::Error;

/// Chat message for every "that clip doesn't exist" style failure.
pub const CLIP_NOT_FOUND_MESSAGE: &str = "I couldn't find that clip! Sadge";

/// Chat message when a streamer has no clips at all.
pub const NO_CLIPS_MESSAGE: &str = "This streamer doesn't have any clips! Sadge";

/// Every way a shout-out invocation can end early.
///
/// All variants are terminal for the invocation. See [`ShoutoutError::chat_message`]
/// for which ones are reported back to chat.
#[derive(Debug, Error)]
pub enum ShoutoutError {
    #[error("could not parse clip watch URL: {url}")]
    InputParse { url: String },

    #[error("no clip with slug {slug} in the owner's clip list")]
    ClipNotFound { slug: String },

    #[error("{user} has no clips")]
    NoClips { user: String },

    #[error("GraphQL request failed with status {status}: {body}")]
    UpstreamRequest { status: u16, body: String },

    #[error("unexpected GraphQL response shape: {0}")]
    ResponseShape(String),

    #[error("GraphQL transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("global variable {0} is not set")]
    MissingGlobal(String),

    #[error("invalid invocation argument: {0}")]
    InvalidArgument(String),

    #[error("host call failed: {0}")]
    Host(#[from] anyhow::Error),
}

impl ShoutoutError {
    /// The message shown in chat for this failure, if any.
    ///
    /// Configuration, argument and host failures are never reported to chat.
    pub fn chat_message(&self) -> Option<&'static str> {
        match self {
            ShoutoutError::NoClips { .. } => Some(NO_CLIPS_MESSAGE),
            ShoutoutError::InputParse { .. }
            | ShoutoutError::ClipNotFound { .. }
            | ShoutoutError::UpstreamRequest { .. }
            | ShoutoutError::ResponseShape(_)
            | ShoutoutError::Transport(_) => Some(CLIP_NOT_FOUND_MESSAGE),
            ShoutoutError::MissingGlobal(_)
            | ShoutoutError::InvalidArgument(_)
            | ShoutoutError::Host(_) => None,
        }
    }
}
