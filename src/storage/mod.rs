//! Raw page snapshot storage
//!
//! Fetched HTML can optionally be kept on disk next to the frontier files.
//! Snapshots are write-only from the crawler's point of view: nothing in a
//! run ever reads them back.

mod html;

pub use html::{snapshot_file_name, HtmlStore};
