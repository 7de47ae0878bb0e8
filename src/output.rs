use crate::SummaryResponse;

/// Render the response as plain text: metadata lines when present, then a
/// blank line, then the summary block verbatim.
pub fn render_text(response: &SummaryResponse) -> String {
    let mut out = String::new();
    if let Some(ref title) = response.title {
        out.push_str(&format!("Title: {title}\n"));
    }
    if let Some(ref length) = response.length {
        out.push_str(&format!("Length: {length}\n"));
    }
    if let Some(ref channel) = response.channel {
        if !channel.is_empty() {
            out.push_str(&format!("Channel: {channel}\n"));
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&response.summary);
    out
}

/// Render the response as pretty-printed JSON
pub fn render_json(response: &SummaryResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_default()
}
