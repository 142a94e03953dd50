//! Shared HTML helpers.

use std::collections::BTreeMap;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `youtube_channel` -> `Youtube Channel`.
pub fn display_name(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Footer link buttons for the configured links, in key order.
pub fn links_html(links: &BTreeMap<String, String>) -> String {
    links
        .iter()
        .map(|(key, url)| {
            let class = if key.contains("youtube") { "link youtube" } else { "link" };
            format!(
                r#"<a href="{}" class="{}">{}</a>"#,
                escape_html(url),
                class,
                escape_html(&display_name(key))
            )
        })
        .collect()
}
