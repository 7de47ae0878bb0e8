use log::{debug, info};

use crate::error::{PipelineError, Result};
use crate::fetch::Fetch;
use crate::summarize::{Complete, SummaryMode, summarize};
use crate::{SummaryRequest, SummaryResponse, VideoMetadata, duration, extract};

/// Fetch the watch page and resolve it to a decoded transcript. Two network
/// round-trips, strictly sequential: the caption URL is only known after the
/// first response is parsed.
pub async fn fetch_transcript<F: Fetch>(fetcher: &F, video_url: &str) -> Result<String> {
    let html = fetcher.fetch(video_url).await?;
    let player = extract::extract_player_response(&html)?;
    let track_url = extract::caption_track_url(&player)?;
    let xml = fetcher.fetch(&track_url).await?;
    extract::parse_timed_text(&xml)
}

/// Like [`fetch_transcript`], but also reads video metadata from the same
/// player response.
pub async fn fetch_video<F: Fetch>(fetcher: &F, video_url: &str) -> Result<(VideoMetadata, String)> {
    let html = fetcher.fetch(video_url).await?;
    let player = extract::extract_player_response(&html)?;
    let metadata = extract::video_metadata(&player)?;
    debug!("Extracted metadata for \"{}\"", metadata.title);
    let track_url = extract::caption_track_url(&player)?;
    let xml = fetcher.fetch(&track_url).await?;
    let transcript = extract::parse_timed_text(&xml)?;
    Ok((metadata, transcript))
}

/// Run the whole pipeline for one request: fetch, extract, summarize.
/// `with_metadata` selects the richer response shape with title, rendered
/// length and channel name; the minimal shape carries the summary alone.
///
/// Internal failures collapse to two outward states: everything up to and
/// including transcript extraction reports as a caption failure, the backend
/// call as a summarization failure.
pub async fn run<F: Fetch, B: Complete>(
    fetcher: &F,
    backend: &B,
    request: &SummaryRequest,
    mode: SummaryMode,
    with_metadata: bool,
) -> std::result::Result<SummaryResponse, PipelineError> {
    info!("Processing {}", request.video_url);

    let (metadata, transcript) = if with_metadata {
        let (metadata, transcript) = fetch_video(fetcher, &request.video_url)
            .await
            .map_err(PipelineError::Captions)?;
        (Some(metadata), transcript)
    } else {
        let transcript = fetch_transcript(fetcher, &request.video_url)
            .await
            .map_err(PipelineError::Captions)?;
        (None, transcript)
    };
    debug!("Transcript length: {} chars", transcript.len());

    let summary = summarize(backend, &transcript, mode)
        .await
        .map_err(PipelineError::Summarize)?;

    let (title, length, channel) = match metadata {
        Some(m) => {
            let length = duration::format_duration(m.duration_seconds).map_err(PipelineError::Captions)?;
            (Some(m.title), Some(length), Some(m.channel_name))
        }
        None => (None, None, None),
    };

    Ok(SummaryResponse {
        title,
        length,
        channel,
        summary: summary.into_text(),
    })
}
