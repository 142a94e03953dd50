//! Static HTML output: one page per video plus an index.

mod html;
mod index;
mod page;

pub use html::{display_name, escape_html, links_html};
pub use index::{collect_entries, render_index, sort_entries, write_index, IndexEntry, INDEX_FILE};
pub use page::{render_page, PageData, PageWriter};
