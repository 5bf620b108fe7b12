//! Clip shout-outs for a livestream chat bot.
//!
//! Given a streamer name or a posted clip link, pick a clip, resolve a signed
//! playback URL for it through Twitch's GraphQL endpoint and play it on an
//! overlay with the streamer's name.
//!
//! The chat-bot host is reached through [`Host`]; delays and the random clip
//! pick are injectable through [`Sleeper`] and [`IndexPicker`].

pub mod api;
pub mod config;
pub mod error;
pub mod gql;
pub mod host;
pub mod pipeline;
pub mod playback;
pub mod presenter;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use config::{InvocationArgs, ShoutoutConfig};
pub use error::ShoutoutError;
pub use gql::{ClipAccessSource, GqlClient};
pub use host::{Clip, ClipWindow, Host, IndexPicker, Sleeper, ThreadRngPicker, TokioSleeper};
pub use pipeline::ShoutoutPipeline;
pub use playback::{build_playback_url, PlaybackCredentials};
pub use presenter::{present, PresentationRequest};
pub use resolver::{parse_watch_url, ClipReference};
