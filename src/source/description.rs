//! Description to HTML: escaping plus clickable links and timestamps.

use crate::render::escape_html;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use url::Url;

/// URLs and `MM:SS` / `HH:MM:SS` timestamps, matched in one pass so a
/// timestamp inside a URL is never linked separately.
fn link_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?P<url>https?://[^\s<>"]+|www\.[^\s<>"]+)|(?P<ts>\b[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?\b)"#)
            .expect("Invalid regex")
    })
}

/// Trailing characters that usually end a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\''];

/// Render a plain-text description as HTML.
///
/// Everything is HTML-escaped. URLs become links (`www.` gets `https://`),
/// and timestamps link to that second of the video.
pub fn linkify_description(text: &str, video_id: &str) -> String {
    let mut html = String::with_capacity(text.len() + text.len() / 4);
    let mut last = 0;

    for caps in link_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        html.push_str(&escape_html(&text[last..whole.start()]));

        match render_match(&caps, video_id) {
            Some((link, consumed)) => {
                html.push_str(&link);
                last = whole.start() + consumed;
            }
            None => last = whole.start(),
        }
    }

    html.push_str(&escape_html(&text[last..]));
    html
}

/// HTML for one match and how many bytes of it the link covers.
fn render_match(caps: &Captures<'_>, video_id: &str) -> Option<(String, usize)> {
    if let Some(m) = caps.name("url") {
        let shown = m.as_str().trim_end_matches(URL_TRAILING);
        let href = if shown.starts_with("www.") {
            format!("https://{}", shown)
        } else {
            shown.to_string()
        };
        Url::parse(&href).ok()?;
        return Some((anchor(&href, shown), shown.len()));
    }

    let m = caps.name("ts")?;
    let seconds = timestamp_seconds(m.as_str())?.to_string();
    let href = Url::parse_with_params(
        "https://www.youtube.com/watch",
        &[("v", video_id), ("t", seconds.as_str())],
    )
    .ok()?;
    Some((anchor(href.as_str(), m.as_str()), m.len()))
}

fn anchor(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(href),
        escape_html(text)
    )
}

/// `MM:SS` or `HH:MM:SS` in seconds.
fn timestamp_seconds(timestamp: &str) -> Option<u64> {
    let parts = timestamp
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [m, s] => Some(m * 60 + s),
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        _ => None,
    }
}
