use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside the RFC 3986 unreserved set gets escaped.
const TOKEN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signed access to one clip rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCredentials {
    pub source_media_url: String,
    pub signature: String,
    pub access_token: String,
}

impl PlaybackCredentials {
    pub fn playback_url(&self) -> String {
        build_playback_url(&self.source_media_url, &self.access_token, &self.signature)
    }
}

/// Joins the media URL with its access token and signature.
///
/// Only the token is percent-encoded, the signature goes in as-is.
pub fn build_playback_url(source_url: &str, token: &str, signature: &str) -> String {
    format!(
        "{}?token={}&sig={}",
        source_url,
        utf8_percent_encode(token, TOKEN_ENCODE_SET),
        signature
    )
}
