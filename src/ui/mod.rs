//! # User Interface
//!
//! Colored stderr logging with clickable links to reports and feed entries.

pub mod log;

pub use log::{debug, error, header, info, path_link, print_logo, success, truncate_middle, url_link, warn, Log};
