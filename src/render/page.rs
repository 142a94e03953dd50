//! Per-video page.

use super::html::{escape_html, links_html};
use crate::config::SiteSettings;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

const PAGE_STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
            color: #333;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            margin-bottom: 10px;
            font-size: 2.2em;
        }
        .date {
            color: #7f8c8d;
            font-size: 1.1em;
            margin-bottom: 30px;
            font-weight: 500;
        }
        .video-container {
            position: relative;
            width: 100%;
            height: 0;
            padding-bottom: 56.25%;
            margin-bottom: 30px;
        }
        .video-container iframe {
            position: absolute;
            top: 0;
            left: 0;
            width: 100%;
            height: 100%;
            border: none;
            border-radius: 8px;
        }
        .description, .transcript {
            background: #f8f9fa;
            padding: 20px;
            border-radius: 8px;
            margin-bottom: 30px;
            white-space: pre-wrap;
            font-size: 1em;
        }
        .description a {
            color: #3498db;
            text-decoration: none;
            font-weight: 500;
            transition: color 0.3s;
        }
        .description a:hover {
            color: #2980b9;
            text-decoration: underline;
        }
        .transcript h2, .tags h2 {
            color: #2c3e50;
            margin-top: 0;
            margin-bottom: 15px;
            font-size: 1.5em;
        }
        .tags {
            margin-bottom: 30px;
        }
        .tag {
            display: inline-block;
            background: #3498db;
            color: white;
            padding: 6px 12px;
            margin: 4px;
            border-radius: 20px;
            font-size: 0.9em;
            font-weight: 500;
        }
        .links {
            display: flex;
            gap: 20px;
            flex-wrap: wrap;
        }
        .link {
            display: inline-block;
            padding: 12px 24px;
            background: #3498db;
            color: white;
            text-decoration: none;
            border-radius: 6px;
            font-weight: 500;
            transition: background-color 0.3s;
        }
        .link:hover {
            background: #2980b9;
        }
        .link.youtube {
            background: #e74c3c;
        }
        .link.youtube:hover {
            background: #c0392b;
        }
        @media (max-width: 600px) {
            .container {
                padding: 20px;
                margin: 10px;
            }
            h1 {
                font-size: 1.8em;
            }
            .links {
                flex-direction: column;
            }
        }
"#;

/// Everything shown on one video page.
#[derive(Debug, Clone)]
pub struct PageData {
    pub title: String,
    pub date: String,
    pub video_id: String,
    /// Already HTML; inserted as-is.
    pub description_html: String,
    /// Plain text; escaped on render.
    pub transcript: String,
    pub tags: Vec<String>,
}

/// Render a complete HTML document for one video.
pub fn render_page(page: &PageData, site: &SiteSettings) -> String {
    let title = escape_html(&page.title);
    let tags_html: String = page
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="date">{date}</div>

        <div class="video-container">
            <iframe src="https://www.youtube.com/embed/{video_id}"
                    allowfullscreen
                    allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture">
            </iframe>
        </div>

        <div class="description">{description}</div>

        <div class="transcript">
            <h2>Transcript</h2>
            {transcript}
        </div>

        <div class="tags">
            <h2>Tags</h2>
            {tags}
        </div>

        <div class="links">
            {links}
        </div>
    </div>
</body>
</html>"#,
        title = title,
        style = PAGE_STYLE,
        date = escape_html(&page.date),
        video_id = escape_html(&page.video_id),
        description = page.description_html,
        transcript = escape_html(&page.transcript),
        tags = tags_html,
        links = links_html(&site.links),
    )
}

/// Writes rendered pages into the output directory.
#[derive(Debug, Clone)]
pub struct PageWriter {
    output_dir: PathBuf,
    site: SiteSettings,
}

impl PageWriter {
    pub fn new(output_dir: PathBuf, site: SiteSettings) -> Self {
        Self { output_dir, site }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `<output_dir>/<stem>.html`, replacing any existing page.
    pub async fn write(&self, stem: &str, page: &PageData) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.html", stem));
        tokio::fs::write(&path, render_page(page, &self.site)).await?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> PageData {
        PageData {
            title: "Model Merging <Explained>".to_string(),
            date: "January 15, 2024".to_string(),
            video_id: "abc123".to_string(),
            description_html: r#"See <a href="https://x.io">https://x.io</a>"#.to_string(),
            transcript: "First paragraph.\n\nSecond & last.\n\n".to_string(),
            tags: vec!["AI".to_string(), "Merging".to_string()],
        }
    }

    #[test]
    fn test_render_page() {
        let mut site = SiteSettings::default();
        site.links.insert("blog".to_string(), "https://example.com".to_string());

        let html = render_page(&sample_page(), &site);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Model Merging &lt;Explained&gt;</title>"));
        assert!(html.contains(r#"<div class="date">January 15, 2024</div>"#));
        assert!(html.contains("https://www.youtube.com/embed/abc123"));
        assert!(html.contains(r#"<div class="description">See <a href="https://x.io">"#));
        assert!(html.contains("Second &amp; last."));
        assert!(html.contains(r#"<span class="tag">AI</span><span class="tag">Merging</span>"#));
        assert!(html.contains(r#"<a href="https://example.com" class="link">Blog</a>"#));
    }

    #[tokio::test]
    async fn test_write_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PageWriter::new(dir.path().join("site"), SiteSettings::default());

        let path = writer.write("20240115_Model_Merging", &sample_page()).await.unwrap();
        assert_eq!(path, dir.path().join("site").join("20240115_Model_Merging.html"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("abc123"));
    }
}
