//! Index page listing every generated video page.

use super::html::{escape_html, links_html};
use crate::config::SiteSettings;
use crate::error::{ReelpageError, Result};
use crate::source::parse_folder_name;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

pub const INDEX_FILE: &str = "index.html";

const INDEX_STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
            color: #333;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            margin-bottom: 10px;
            font-size: 2.5em;
            text-align: center;
        }
        .subtitle {
            color: #7f8c8d;
            font-size: 1.2em;
            text-align: center;
            margin-bottom: 40px;
        }
        .video-list {
            display: grid;
            gap: 20px;
        }
        .video-item {
            border: 1px solid #e1e8ed;
            border-radius: 8px;
            padding: 20px;
            transition: transform 0.2s, box-shadow 0.2s;
        }
        .video-item:hover {
            transform: translateY(-2px);
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }
        .video-title {
            color: #2c3e50;
            font-size: 1.3em;
            font-weight: 600;
            margin-bottom: 8px;
            text-decoration: none;
        }
        .video-title:hover {
            color: #3498db;
        }
        .video-date {
            color: #7f8c8d;
            font-size: 0.95em;
            font-weight: 500;
        }
        .stats {
            text-align: center;
            color: #7f8c8d;
            font-size: 1.1em;
            margin-bottom: 30px;
            padding: 15px;
            background: #f8f9fa;
            border-radius: 6px;
        }
        .links {
            display: flex;
            gap: 20px;
            justify-content: center;
            margin-top: 40px;
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
                font-size: 2em;
            }
            .video-title {
                font-size: 1.1em;
            }
            .links {
                flex-direction: column;
                align-items: center;
            }
        }
"#;

/// One generated page as listed on the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub file_name: String,
    pub title: String,
    pub date_label: String,
    pub date: Option<NaiveDate>,
}

impl IndexEntry {
    /// Describe a page from its file name (`YYYYMMDD_Title.html`).
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.strip_suffix(".html").unwrap_or(file_name);
        let parsed = parse_folder_name(stem);
        Self {
            file_name: file_name.to_string(),
            title: parsed.title,
            date_label: parsed.date_label,
            date: parsed.date,
        }
    }
}

/// Sort newest first; undated pages go last, ties by file name.
pub fn sort_entries(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.file_name.cmp(&b.file_name)));
}

/// Every page in `output_dir` except the index itself, sorted for display.
pub fn collect_entries(output_dir: &Path) -> Result<Vec<IndexEntry>> {
    if !output_dir.is_dir() {
        return Err(ReelpageError::InvalidInput(format!(
            "Output directory '{}' does not exist",
            output_dir.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".html") && name != INDEX_FILE {
            entries.push(IndexEntry::from_file_name(&name));
        }
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// Render the index document for already sorted entries.
pub fn render_index(entries: &[IndexEntry], site: &SiteSettings) -> String {
    let items: String = entries
        .iter()
        .map(|entry| {
            format!(
                r#"            <div class="video-item">
                <a href="{}" class="video-title">{}</a>
                <div class="video-date">{}</div>
            </div>
"#,
                escape_html(&entry.file_name),
                escape_html(&entry.title),
                escape_html(&entry.date_label)
            )
        })
        .collect();

    let latest = entries
        .first()
        .map(|e| escape_html(&e.date_label))
        .unwrap_or_else(|| "N/A".to_string());
    let title = escape_html(&site.index_title);

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
        <div class="subtitle">{subtitle}</div>

        <div class="stats">
            Total Videos: {total} • Latest: {latest}
        </div>

        <div class="video-list">
{items}        </div>

        <div class="links">
            {links}
        </div>
    </div>
</body>
</html>"#,
        title = title,
        style = INDEX_STYLE,
        subtitle = escape_html(&site.index_subtitle),
        total = entries.len(),
        latest = latest,
        items = items,
        links = links_html(&site.links),
    )
}

/// Regenerate `index.html` in `output_dir`. Returns its path and the number
/// of pages listed.
pub fn write_index(output_dir: &Path, site: &SiteSettings) -> Result<(PathBuf, Vec<IndexEntry>)> {
    let entries = collect_entries(output_dir)?;
    let path = output_dir.join(INDEX_FILE);
    std::fs::write(&path, render_index(&entries, site))?;
    info!("Generated {} with {} videos", path.display(), entries.len());
    Ok((path, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_entry_from_file_name() {
        let entry = IndexEntry::from_file_name("20240115_Model_Merging.html");
        assert_eq!(entry.title, "Model Merging");
        assert_eq!(entry.date_label, "January 15, 2024");

        let undated = IndexEntry::from_file_name("notes-page.html");
        assert_eq!(undated.title, "notes page");
        assert_eq!(undated.date_label, "Unknown Date");
        assert_eq!(undated.date, None);
    }

    #[test]
    fn test_sort_newest_first_undated_last() {
        let mut entries: Vec<_> = [
            "20230101_Old.html",
            "misc.html",
            "20240301_New.html",
            "20240301_Also_New.html",
            "20241399_Bad_Date.html",
        ]
        .iter()
        .map(|n| IndexEntry::from_file_name(n))
        .collect();

        sort_entries(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "20240301_Also_New.html",
                "20240301_New.html",
                "20230101_Old.html",
                "20241399_Bad_Date.html",
                "misc.html",
            ]
        );
    }

    #[test]
    fn test_render_empty_index() {
        let html = render_index(&[], &SiteSettings::default());
        assert!(html.contains("<h1>YouTube Videos Collection</h1>"));
        assert!(html.contains("Total Videos: 0 • Latest: N/A"));
        assert!(!html.contains(r#"<div class="video-item">"#));
    }

    #[test]
    fn test_write_index_skips_itself_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20240101_First.html"), "x").unwrap();
        fs::write(dir.path().join("20240201_Second.html"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join(INDEX_FILE), "stale").unwrap();

        let (path, entries) = write_index(dir.path(), &SiteSettings::default()).unwrap();
        assert_eq!(entries.len(), 2);

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Total Videos: 2 • Latest: February 01, 2024"));
        let second = html.find("20240201_Second.html").unwrap();
        let first = html.find("20240101_First.html").unwrap();
        assert!(second < first);
        assert!(!html.contains(r#"href="index.html""#));
    }

    #[test]
    fn test_write_index_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_index(&dir.path().join("absent"), &SiteSettings::default()).is_err());
    }
}
