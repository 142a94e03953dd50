//! `YYYYMMDD_Title` folder and page names.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const UNKNOWN_DATE: &str = "Unknown Date";

fn dated_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{8})_(.+)$").expect("Invalid regex"))
}

/// Date and title decoded from a folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderName {
    /// `None` when the name carries no valid date.
    pub date: Option<NaiveDate>,
    /// Human-readable date, e.g. "January 15, 2024".
    pub date_label: String,
    pub title: String,
}

/// Decode a folder (or page file stem) name.
///
/// `20240115_Model_Merging` gives "January 15, 2024" and "Model Merging".
/// Eight digits that are not a real date are shown as-is. Names without the
/// prefix become the title as a whole, with an unknown date.
pub fn parse_folder_name(name: &str) -> FolderName {
    let Some(caps) = dated_name().captures(name) else {
        return FolderName {
            date: None,
            date_label: UNKNOWN_DATE.to_string(),
            title: name.replace(['_', '-'], " "),
        };
    };

    let raw_date = &caps[1];
    let title = caps[2].replace(['_', '-'], " ");

    match NaiveDate::parse_from_str(raw_date, "%Y%m%d") {
        Ok(date) => FolderName {
            date: Some(date),
            date_label: date.format("%B %d, %Y").to_string(),
            title,
        },
        Err(_) => FolderName {
            date: None,
            date_label: raw_date.to_string(),
            title,
        },
    }
}
