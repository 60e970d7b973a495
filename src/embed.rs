//! Music embed builder
//!
//! Turns a Spotify track URL or a SoundCloud URL into player iframe HTML
//! for the soundtrack panel. Pure string work; nothing here touches the game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Track title shown with every embed
pub const TRACK_TITLE: &str = "Root of Evil";
/// Track artist shown with every embed
pub const TRACK_ARTIST: &str = "Ras Dave";
/// Artist profile linked under SoundCloud embeds
pub const ARTIST_URL: &str = "https://soundcloud.com/rasdave1995";

const SPOTIFY_TRACK_MARKER: &str = "spotify.com/track/";

/// Embed failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Platform and URL are required")]
    MissingField,
    #[error("Could not parse URL or extract track information")]
    Unrecognized,
    #[error("Failed to process music streaming request")]
    Malformed(String),
}

impl EmbedError {
    /// HTTP status the endpoint answers with
    pub fn status(&self) -> u16 {
        match self {
            EmbedError::MissingField | EmbedError::Unrecognized => 400,
            EmbedError::Malformed(_) => 500,
        }
    }

    /// JSON error body
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            details: match self {
                EmbedError::Malformed(details) => Some(details.clone()),
                _ => None,
            },
        }
    }
}

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Spotify,
    Soundcloud,
}

impl Platform {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "spotify" => Some(Platform::Spotify),
            "soundcloud" => Some(Platform::Soundcloud),
            _ => None,
        }
    }
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Resolved track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    pub artist: String,
    pub embed_html: String,
}

/// Success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    pub success: bool,
    pub track_info: TrackInfo,
    pub embed_html: String,
    pub message: String,
}

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Extract the alphanumeric track id following `spotify.com/track/`
pub fn spotify_track_id(url: &str) -> Option<&str> {
    let start = url.find(SPOTIFY_TRACK_MARKER)? + SPOTIFY_TRACK_MARKER.len();
    let rest = &url[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// Percent-encode like `encodeURIComponent`
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted HTML attribute
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn spotify_html(track_id: &str) -> String {
    format!(
        r#"<iframe src="https://open.spotify.com/embed/track/{track_id}?utm_source=generator&theme=0" width="100%" height="152" frameBorder="0" allowfullscreen="" allow="autoplay; clipboard-write; encrypted-media; fullscreen; picture-in-picture" loading="lazy" style="border-radius:12px"></iframe>"#
    )
}

fn soundcloud_html(url: &str) -> String {
    let encoded = encode_uri_component(url);
    let href = escape_attr(url);
    format!(
        r#"<iframe width="100%" height="166" scrolling="no" frameBorder="no" allow="autoplay" src="https://w.soundcloud.com/player/?url={encoded}&color=%23ff5500&auto_play=false&hide_related=false&show_comments=true&show_user=true&show_reposts=false&show_teaser=true"></iframe>
<div style="font-size: 10px; color: #cccccc;line-break: anywhere;word-break: normal;overflow: hidden;white-space: nowrap;text-overflow: ellipsis; font-family: Interstate,Lucida Grande,Lucida Sans Unicode,Lucida Sans,Garuda,Verdana,Tahoma,sans-serif;font-weight: 100;"><a href="{ARTIST_URL}" title="{TRACK_ARTIST}" target="_blank" style="color: #cccccc; text-decoration: none;">{TRACK_ARTIST}</a> · <a href="{href}" title="{TRACK_TITLE}" target="_blank" style="color: #cccccc; text-decoration: none;">{TRACK_TITLE}</a></div>"#
    )
}

/// Build the embed for a request
pub fn build_embed(request: &EmbedRequest) -> Result<EmbedResponse, EmbedError> {
    let (Some(platform), Some(url)) = (
        request.platform.as_deref().filter(|p| !p.is_empty()),
        request.url.as_deref().filter(|u| !u.is_empty()),
    ) else {
        return Err(EmbedError::MissingField);
    };

    let track_info = match Platform::from_name(platform).ok_or(EmbedError::Unrecognized)? {
        Platform::Spotify => {
            let track_id = spotify_track_id(url).ok_or(EmbedError::Unrecognized)?;
            TrackInfo {
                platform: Platform::Spotify,
                track_id: Some(track_id.to_string()),
                url: None,
                title: TRACK_TITLE.to_string(),
                artist: TRACK_ARTIST.to_string(),
                embed_html: spotify_html(track_id),
            }
        }
        Platform::Soundcloud => TrackInfo {
            platform: Platform::Soundcloud,
            track_id: None,
            url: Some(url.to_string()),
            title: TRACK_TITLE.to_string(),
            artist: TRACK_ARTIST.to_string(),
            embed_html: soundcloud_html(url),
        },
    };

    Ok(EmbedResponse {
        success: true,
        embed_html: track_info.embed_html.clone(),
        track_info,
        message: "Embedded player generated successfully".to_string(),
    })
}

/// Serve a raw JSON request body: `(status, response JSON)`
pub fn handle_embed_request(body: &str) -> (u16, serde_json::Value) {
    let result = serde_json::from_str::<EmbedRequest>(body)
        .map_err(|e| EmbedError::Malformed(e.to_string()))
        .and_then(|req| build_embed(&req));

    match result {
        Ok(response) => (200, serde_json::to_value(response).unwrap_or_default()),
        Err(e) => {
            if e.status() >= 500 {
                log::error!("Music streaming error: {e:?}");
            }
            (e.status(), serde_json::to_value(e.body()).unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(platform: &str, url: &str) -> EmbedRequest {
        EmbedRequest {
            platform: Some(platform.to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn test_spotify_track_id() {
        assert_eq!(
            spotify_track_id("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc"),
            Some("4uLU6hMCjMI75M1A2tKUQC")
        );
        assert_eq!(spotify_track_id("https://open.spotify.com/album/123"), None);
        assert_eq!(spotify_track_id("https://open.spotify.com/track/?x"), None);
    }

    #[test]
    fn test_spotify_embed() {
        let resp = build_embed(&request("spotify", "https://open.spotify.com/track/abc123")).unwrap();
        assert!(resp.success);
        assert_eq!(resp.track_info.track_id.as_deref(), Some("abc123"));
        assert!(resp
            .embed_html
            .contains("https://open.spotify.com/embed/track/abc123?utm_source=generator"));
        assert_eq!(resp.track_info.title, TRACK_TITLE);
    }

    #[test]
    fn test_soundcloud_embed_encodes_url() {
        let url = "https://soundcloud.com/rasdave1995/root-of-evil-1";
        let resp = build_embed(&request("soundcloud", url)).unwrap();
        assert!(resp.embed_html.contains(
            "url=https%3A%2F%2Fsoundcloud.com%2Frasdave1995%2Froot-of-evil-1&color=%23ff5500"
        ));
        assert_eq!(resp.track_info.url.as_deref(), Some(url));
        assert!(resp.embed_html.contains(ARTIST_URL));
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(encode_uri_component("Az09-_.!~*'()"), "Az09-_.!~*'()");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            build_embed(&EmbedRequest::default()),
            Err(EmbedError::MissingField)
        );
        assert_eq!(
            build_embed(&request("spotify", "https://example.com/song")),
            Err(EmbedError::Unrecognized)
        );
        assert_eq!(
            build_embed(&request("bandcamp", "https://x.bandcamp.com/track/y")),
            Err(EmbedError::Unrecognized)
        );
    }

    #[test]
    fn test_handler_status_codes() {
        let (status, body) =
            handle_embed_request(r#"{"platform":"spotify","url":"https://open.spotify.com/track/xyz"}"#);
        assert_eq!(status, 200);
        assert_eq!(body["trackInfo"]["trackId"], "xyz");
        assert_eq!(body["trackInfo"]["platform"], "spotify");

        let (status, body) = handle_embed_request(r#"{"platform":"spotify"}"#);
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Platform and URL are required");

        let (status, body) = handle_embed_request("{");
        assert_eq!(status, 500);
        assert!(body["details"].is_string());
    }
}
