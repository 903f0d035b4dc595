//! Feed input and report output

pub mod feeds;
pub mod report;

pub use feeds::{load_documents_json, load_feeds, parse_feed, FeedLoad};
pub use report::{export_json, render_html, write_html, ClusterExport};
