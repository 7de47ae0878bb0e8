use log::debug;
use serde::Deserialize;

use crate::VideoMetadata;
use crate::error::{Error, Result};

/// Literal marker YouTube places immediately before the inline player
/// response JSON in the watch-page HTML.
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";
const SCRIPT_TERMINATOR: &str = ";</script>";

#[derive(Debug, Deserialize)]
pub struct PlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
    annotations: Option<Vec<Annotation>>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
    #[serde(rename = "lengthSeconds")]
    length_seconds: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Annotation {
    #[serde(rename = "playerAnnotationsExpandedRenderer")]
    player_annotations_expanded_renderer: Option<AnnotationRenderer>,
}

#[derive(Debug, Deserialize)]
struct AnnotationRenderer {
    #[serde(rename = "featuredChannel")]
    featured_channel: Option<FeaturedChannel>,
}

#[derive(Debug, Deserialize)]
struct FeaturedChannel {
    #[serde(rename = "channelName")]
    channel_name: Option<String>,
}

/// Slice the marker-delimited JSON out of the watch-page HTML and parse it.
pub fn extract_player_response(html: &str) -> Result<PlayerResponse> {
    let start = html
        .find(PLAYER_RESPONSE_MARKER)
        .ok_or_else(|| Error::MalformedDocument("player response marker not found".to_string()))?
        + PLAYER_RESPONSE_MARKER.len();
    let end = html[start..]
        .find(SCRIPT_TERMINATOR)
        .ok_or_else(|| Error::MalformedDocument("script terminator not found".to_string()))?
        + start;

    let json = &html[start..end];
    debug!("Sliced {} bytes of player response JSON", json.len());

    Ok(serde_json::from_str(json)?)
}

/// Percent-decoded base URL of the first caption track. Track 0 is chosen
/// unconditionally; there is no language negotiation.
pub fn caption_track_url(player: &PlayerResponse) -> Result<String> {
    let tracks = player
        .captions
        .as_ref()
        .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
        .and_then(|r| r.caption_tracks.as_ref())
        .ok_or(Error::NoCaptions)?;

    let track = tracks.first().ok_or(Error::NoCaptions)?;
    decode_base_url(&track.base_url)
}

/// Percent-decode a caption base URL. Escapes for URI-reserved characters
/// (`;/?:@&=+$,#`) stay encoded so the query structure survives; everything
/// else is decoded.
fn decode_base_url(raw: &str) -> Result<String> {
    let decode = |chunk: &str| -> Result<String> {
        urlencoding::decode(chunk)
            .map(|s| s.into_owned())
            .map_err(|e| Error::MalformedDocument(format!("caption URL is not valid UTF-8: {e}")))
    };

    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut chunk_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
            && is_reserved_escape(&raw[i + 1..i + 3])
        {
            out.push_str(&decode(&raw[chunk_start..i])?);
            out.push_str(&raw[i..i + 3]);
            chunk_start = i + 3;
            i += 3;
        } else {
            i += 1;
        }
    }
    out.push_str(&decode(&raw[chunk_start..])?);
    Ok(out)
}

fn is_reserved_escape(hex: &str) -> bool {
    u8::from_str_radix(hex, 16).is_ok_and(|b| {
        matches!(b, b';' | b'/' | b'?' | b':' | b'@' | b'&' | b'=' | b'+' | b'$' | b',' | b'#')
    })
}

/// Title, duration and channel name from the player response. The channel
/// name lives behind the annotations path; when any link in that path is
/// missing it falls back to an empty string rather than failing the request.
pub fn video_metadata(player: &PlayerResponse) -> Result<VideoMetadata> {
    let details = player
        .video_details
        .as_ref()
        .ok_or_else(|| Error::MalformedDocument("videoDetails missing".to_string()))?;

    let title = details
        .title
        .clone()
        .ok_or_else(|| Error::MalformedDocument("video title missing".to_string()))?;

    let length = details
        .length_seconds
        .as_deref()
        .ok_or_else(|| Error::MalformedDocument("lengthSeconds missing".to_string()))?;
    let duration_seconds: i64 = length
        .parse()
        .map_err(|_| Error::MalformedDocument(format!("lengthSeconds is not an integer: {length:?}")))?;
    if duration_seconds < 0 {
        return Err(Error::MalformedDocument(format!(
            "lengthSeconds is negative: {duration_seconds}"
        )));
    }

    let channel_name = player
        .annotations
        .as_ref()
        .and_then(|a| a.first())
        .and_then(|a| a.player_annotations_expanded_renderer.as_ref())
        .and_then(|r| r.featured_channel.as_ref())
        .and_then(|c| c.channel_name.clone())
        .unwrap_or_default();

    Ok(VideoMetadata {
        title,
        duration_seconds,
        channel_name,
    })
}

/// Parse a timed-text caption document into a single transcript string:
/// the text payload of every `<text>` element, in document order, joined
/// with single spaces, with HTML character entities decoded.
pub fn parse_timed_text(xml: &str) -> Result<String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => in_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => in_text = false,
            Ok(Event::Text(ref e)) if in_text => {
                let raw = e
                    .unescape()
                    .map_err(|e| Error::MalformedDocument(format!("bad caption markup: {e}")))?;
                segments.push(raw.into_owned());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::MalformedDocument(format!("bad caption markup: {e}"))),
            _ => {}
        }
    }

    debug!("Parsed {} caption segments", segments.len());
    Ok(decode_entities(&segments.join(" ")))
}

/// Decode named and numeric HTML character references to their literal
/// characters. Caption payloads arrive double-escaped, so this runs after
/// the XML-level unescape.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
